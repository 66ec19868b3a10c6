//! Evolver configuration.
//!
//! [`EvolverConfig`] holds all parameters that control the generational loop.

use super::selection::Selection;
use crate::error::{check_probability, Error, Result};

/// Parameters of the generational [`Evolver`](super::Evolver).
///
/// ```
/// use u_evolve::evolver::{EvolverConfig, Selection};
///
/// let config = EvolverConfig::default()
///     .with_population_size(64)
///     .with_genotypes_per_individual(2)
///     .with_selection(Selection::Rank)
///     .with_mutation_pb(0.3);
/// assert_eq!(config.elite_count(), 6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolverConfig {
    pub population_size: usize,

    /// Generations run unless stagnation or cancellation stops earlier.
    pub max_generations: usize,

    /// Number of genotypes in each individual's bag.
    pub genotypes_per_individual: usize,

    pub selection: Selection,

    /// Share of the best individuals kept as-is, with their fitness, in
    /// the next generation.
    pub elite_ratio: f64,

    /// Probability of mating a pair of selected parents (0.0–1.0).
    ///
    /// When a pair is not mated, the parents pass on as clones.
    pub crossover_pb: f64,

    /// Probability of mutating an offspring (0.0–1.0).
    ///
    /// A mutated offspring has the mutation applied to each of its
    /// genotypes.
    pub mutation_pb: f64,

    /// Consecutive generations without a strictly better best individual
    /// after which the run stops. 0 never stops early.
    pub stagnation_limit: usize,

    /// Evaluate on the rayon pool. Has no effect without the `parallel`
    /// feature.
    pub parallel: bool,

    /// Seed of the breeding stream; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for EvolverConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            genotypes_per_individual: 1,
            selection: Selection::default(),
            elite_ratio: 0.1,
            crossover_pb: 0.9,
            mutation_pb: 0.1,
            stagnation_limit: 50,
            parallel: true,
            seed: None,
        }
    }
}

impl EvolverConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_genotypes_per_individual(mut self, n: usize) -> Self {
        self.genotypes_per_individual = n;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the elite ratio, clamped to `[0, 1]`.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover probability, clamped to `[0, 1]`.
    pub fn with_crossover_pb(mut self, pb: f64) -> Self {
        self.crossover_pb = pb.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probability, clamped to `[0, 1]`.
    pub fn with_mutation_pb(mut self, pb: f64) -> Self {
        self.mutation_pb = pb.clamp(0.0, 1.0);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Shorthand for `with_selection(Selection::Tournament(size))`.
    pub fn with_tournament_size(self, size: usize) -> Self {
        self.with_selection(Selection::Tournament(size))
    }

    /// Number of elites carried over each generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio) as usize
    }

    /// # Errors
    /// [`Error::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::parameter(
                "population_size",
                format!("{} cannot hold a pair of parents", self.population_size),
            ));
        }
        if self.max_generations == 0 {
            return Err(Error::parameter("max_generations", "must be at least 1"));
        }
        if self.genotypes_per_individual == 0 {
            return Err(Error::parameter(
                "genotypes_per_individual",
                "must be at least 1",
            ));
        }
        if self.elite_count() >= self.population_size {
            return Err(Error::parameter(
                "elite_ratio",
                "elites fill entire population",
            ));
        }
        check_probability("crossover_pb", self.crossover_pb)?;
        check_probability("mutation_pb", self.mutation_pb)
    }
}
