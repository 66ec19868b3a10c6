//! Parent selection for the evolver.
//!
//! Every scheme maximizes fitness; an individual without fitness is treated
//! as `-inf`.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"

use super::types::Individual;
use crate::random::Randomizer;
use rand::Rng;

/// How parents are drawn from the current population.
///
/// ```
/// use u_evolve::evolver::{Individual, Selection};
/// use u_evolve::genotype::BitString;
/// use u_evolve::random::create_rng;
///
/// let population: Vec<Individual<BitString>> = [0.5, 3.0]
///     .iter()
///     .map(|&f| Individual {
///         genotypes: vec![BitString::new(4, false)],
///         fitness: Some(f),
///     })
///     .collect();
/// let mut rng = create_rng(3);
/// // A tournament as large as the population almost always finds the best.
/// let picked = Selection::Tournament(16).select(&population, &mut rng);
/// assert_eq!(picked, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Best of `k` uniform draws with replacement. `k = 0` acts as 1.
    Tournament(usize),

    /// Fitness-proportionate draw on fitness shifted by the population
    /// minimum, so negative values are allowed.
    Roulette,

    /// Linear ranking: the individual of rank `r` (best is 0) weighs `n - r`.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Index of the selected parent.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<G, R: Rng>(&self, population: &[Individual<G>], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        let fitnesses: Vec<f64> = population
            .iter()
            .map(|ind| ind.fitness.unwrap_or(f64::NEG_INFINITY))
            .collect();
        match self {
            Selection::Tournament(k) => tournament(&fitnesses, *k, rng),
            Selection::Roulette => roulette(&fitnesses, rng),
            Selection::Rank => rank(&fitnesses, rng),
        }
    }
}

fn tournament<R: Rng>(fitnesses: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitnesses.len();

    let mut best_idx = rng.roll_index(n);
    for _ in 1..k {
        let idx = rng.roll_index(n);
        if fitnesses[idx] > fitnesses[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

/// `weight_i = f_i - min(f) + eps`; unevaluated individuals get `eps`.
fn roulette<R: Rng>(fitnesses: &[f64], rng: &mut R) -> usize {
    let n = fitnesses.len();
    if n == 1 {
        return 0;
    }

    let finite = fitnesses.iter().copied().filter(|f| f.is_finite());
    let min_fitness = finite.fold(f64::INFINITY, f64::min);
    if !min_fitness.is_finite() {
        return rng.roll_index(n);
    }

    let epsilon = 1e-10;
    let weights: Vec<f64> = fitnesses
        .iter()
        .map(|&f| {
            let w = f - min_fitness + epsilon;
            if w.is_finite() && w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return rng.roll_index(n);
    }

    let threshold = rng.roll_uniform() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1
}

fn rank<R: Rng>(fitnesses: &[f64], rng: &mut R) -> usize {
    let n = fitnesses.len();
    if n == 1 {
        return 0;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        fitnesses[b]
            .partial_cmp(&fitnesses[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.roll_uniform() * total;
    let mut cumulative = 0.0;

    for (rank, &original_idx) in order.iter().enumerate() {
        cumulative += (n - rank) as f64;
        if cumulative > threshold {
            return original_idx;
        }
    }

    order[n - 1]
}
