//! Generational loop execution.
//!
//! [`Evolver`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat.

use super::config::EvolverConfig;
use super::types::{Evaluator, Individual};
use crate::error::Result;
use crate::genotype::Genotype;
use crate::ops::{Crossover, Initializer, Mutation};
use crate::random::{create_rng, Randomizer};
use log::{debug, info, trace};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of an evolver run.
///
/// Contains the best individual found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone)]
pub struct EvolverResult<G> {
    /// The best individual found during the entire run.
    pub best: Individual<G>,

    /// Best fitness value (same as `best.fitness`).
    pub best_fitness: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Number of evaluator calls.
    pub evaluations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness at the end of each generation, initial population first.
    pub fitness_history: Vec<f64>,
}

/// A generational evolutionary algorithm assembled from operators.
///
/// Each individual holds `genotypes_per_individual` genotypes, all created
/// by `initializer`. Mating pairs genotypes slot by slot; a mutated
/// individual has `mutation` applied to every slot. Individuals whose
/// genotypes did not change keep their fitness and are not re-evaluated.
///
/// # Usage
///
/// ```
/// use u_evolve::evolver::{Evolver, EvolverConfig, Individual};
/// use u_evolve::genotype::BitString;
/// use u_evolve::ops::bit_string::{FlipBitMutation, InitBitString};
/// use u_evolve::ops::generic::TwoPointsCrossover;
///
/// let evolver = Evolver::new(
///     EvolverConfig::default().with_max_generations(20).with_seed(42),
///     InitBitString::new(16),
///     FlipBitMutation::new(0.05),
///     TwoPointsCrossover,
/// );
/// let onemax = |ind: &Individual<BitString>| ind.genotypes[0].count_ones() as f64;
/// let result = evolver.run(&onemax).unwrap();
/// assert!(result.best_fitness >= 8.0);
/// ```
#[derive(Debug, Clone)]
pub struct Evolver<I, M, C> {
    pub config: EvolverConfig,
    pub initializer: I,
    pub mutation: M,
    pub crossover: C,
}

impl<I, M, C> Evolver<I, M, C> {
    pub fn new(config: EvolverConfig, initializer: I, mutation: M, crossover: C) -> Self {
        Self {
            config,
            initializer,
            mutation,
            crossover,
        }
    }

    /// Runs the evolutionary loop.
    ///
    /// # Errors
    /// Configuration errors from [`EvolverConfig::validate`] or any
    /// operator's `validate`, and errors returned by the operators.
    pub fn run<G, E>(&self, evaluator: &E) -> Result<EvolverResult<G>>
    where
        G: Genotype,
        I: Initializer<G>,
        M: Mutation<G>,
        C: Crossover<G>,
        E: Evaluator<G>,
    {
        self.run_with_cancel(evaluator, None)
    }

    /// Runs the loop with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// at the start of the next generation and returns the best individual
    /// found so far.
    pub fn run_with_cancel<G, E>(
        &self,
        evaluator: &E,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolverResult<G>>
    where
        G: Genotype,
        I: Initializer<G>,
        M: Mutation<G>,
        C: Crossover<G>,
        E: Evaluator<G>,
    {
        let config = &self.config;
        config.validate()?;
        self.initializer.validate()?;
        self.mutation.validate()?;
        self.crossover.validate()?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        info!(
            "evolver: {} individuals x {} genotype(s) of {}, up to {} generations",
            config.population_size,
            config.genotypes_per_individual,
            G::TYPE_NAME,
            config.max_generations
        );

        // 1. Initialize population
        let mut population = Vec::with_capacity(config.population_size);
        for _ in 0..config.population_size {
            let genotypes = (0..config.genotypes_per_individual)
                .map(|_| self.initializer.initialize(&mut rng))
                .collect::<Result<Vec<G>>>()?;
            population.push(Individual::new(genotypes));
        }

        // 2. Evaluate initial population
        let mut evaluations = evaluate_population(evaluator, &mut population, config.parallel);

        // 3. Track best
        let mut best = find_best(&population).clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness_or_worst());

        let mut stagnation_counter = 0usize;
        let mut generations = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;
        let elite_count = config.elite_count();

        // 4. Evolutionary loop
        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Sort population by fitness (descending = best first)
            population.sort_by(|a, b| {
                b.fitness_or_worst()
                    .partial_cmp(&a.fitness_or_worst())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut next_gen: Vec<Individual<G>> = population[..elite_count].to_vec();

            while next_gen.len() < config.population_size {
                let p1_idx = config.selection.select(&population, &mut rng);
                let p2_idx = config.selection.select(&population, &mut rng);
                let mut children = [population[p1_idx].clone(), population[p2_idx].clone()];

                if rng.roll_uniform() < config.crossover_pb {
                    self.mate(&mut children, &mut rng)?;
                }

                for mut child in children {
                    if next_gen.len() >= config.population_size {
                        break;
                    }
                    if rng.roll_uniform() < config.mutation_pb {
                        self.mutate(&mut child, &mut rng)?;
                    }
                    next_gen.push(child);
                }
            }

            evaluations += evaluate_population(evaluator, &mut next_gen, config.parallel);
            population = next_gen;
            generations = gen + 1;

            let gen_best = find_best(&population);
            if gen_best.fitness_or_worst() > best.fitness_or_worst() {
                best = gen_best.clone();
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            let best_fitness = best.fitness_or_worst();
            fitness_history.push(best_fitness);
            trace!("generation {generations}: best fitness {best_fitness}");
            evaluator.on_generation(generations, best_fitness);

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                debug!("evolver: no improvement for {stagnation_counter} generations, stopping");
                stagnated = true;
                break;
            }
        }

        let best_fitness = best.fitness_or_worst();
        info!(
            "evolver: finished after {generations} generations, {evaluations} evaluations, best fitness {best_fitness}"
        );
        Ok(EvolverResult {
            best,
            best_fitness,
            generations,
            evaluations,
            stagnated,
            cancelled,
            fitness_history,
        })
    }

    /// Mates two individuals slot by slot.
    fn mate<G, R>(&self, pair: &mut [Individual<G>; 2], rng: &mut R) -> Result<()>
    where
        G: Genotype,
        C: Crossover<G>,
        R: Rng,
    {
        let [first, second] = pair;
        let mut changed = false;
        for (a, b) in first.genotypes.iter_mut().zip(second.genotypes.iter_mut()) {
            changed |= self.crossover.mate(a, b, rng)?;
        }
        if changed {
            first.invalidate();
            second.invalidate();
        }
        Ok(())
    }

    /// Mutates every genotype of an individual.
    fn mutate<G, R>(&self, individual: &mut Individual<G>, rng: &mut R) -> Result<()>
    where
        G: Genotype,
        M: Mutation<G>,
        R: Rng,
    {
        let mut changed = false;
        for genotype in &mut individual.genotypes {
            changed |= self.mutation.mutate(genotype, rng)?;
        }
        if changed {
            individual.invalidate();
        }
        Ok(())
    }
}

/// Evaluates every individual lacking a fitness, returning how many were
/// evaluated.
fn evaluate_population<G, E>(
    evaluator: &E,
    population: &mut [Individual<G>],
    parallel: bool,
) -> usize
where
    G: Genotype,
    E: Evaluator<G>,
{
    let count = population.iter().filter(|ind| !ind.is_evaluated()).count();
    if parallel {
        evaluate_parallel(evaluator, population);
    } else {
        evaluate_sequential(evaluator, population);
    }
    count
}

fn evaluate_sequential<G: Genotype, E: Evaluator<G>>(evaluator: &E, population: &mut [Individual<G>]) {
    for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
        let f = evaluator.evaluate(ind);
        ind.fitness = Some(f);
    }
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<G: Genotype, E: Evaluator<G>>(evaluator: &E, population: &mut [Individual<G>]) {
    population
        .par_iter_mut()
        .filter(|ind| !ind.is_evaluated())
        .for_each(|ind| {
            let f = evaluator.evaluate(ind);
            ind.fitness = Some(f);
        });
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<G: Genotype, E: Evaluator<G>>(evaluator: &E, population: &mut [Individual<G>]) {
    evaluate_sequential(evaluator, population);
}

/// Find the individual with the best (highest) fitness.
fn find_best<G>(population: &[Individual<G>]) -> &Individual<G> {
    let mut best = &population[0];
    for ind in &population[1..] {
        if ind.fitness.unwrap_or(f64::NEG_INFINITY) > best.fitness.unwrap_or(f64::NEG_INFINITY) {
            best = ind;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
