//! Individuals and the evaluation contract.
//!
//! An [`Individual`] is a bag of one or more genotypes plus an optional
//! fitness. The [`Evaluator`] is the problem-specific part: it scores an
//! individual, and the evolver does the rest.

use crate::genotype::Genotype;

/// A candidate solution: one or more genotypes and their fitness.
///
/// `fitness` is `None` until the individual is evaluated, and is reset to
/// `None` whenever an operator changes one of its genotypes. Higher fitness
/// is better.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual<G> {
    pub genotypes: Vec<G>,
    pub fitness: Option<f64>,
}

impl<G: Genotype> Individual<G> {
    /// Creates an unevaluated individual.
    pub fn new(genotypes: Vec<G>) -> Self {
        Self {
            genotypes,
            fitness: None,
        }
    }

    /// Fitness for ranking; unevaluated individuals rank last.
    pub fn fitness_or_worst(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Marks the fitness as stale.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}

/// Scores individuals.
///
/// `Evaluator` must be `Send + Sync` because the evolver may evaluate
/// individuals in parallel using rayon. Higher values are better.
///
/// Closures `Fn(&Individual<G>) -> f64` implement it directly.
pub trait Evaluator<G>: Send + Sync {
    /// Evaluates an individual and returns its fitness.
    ///
    /// This is typically the most expensive operation.
    fn evaluate(&self, individual: &Individual<G>) -> f64;

    /// Called at the end of each generation with the current best fitness.
    ///
    /// The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}

impl<G, F> Evaluator<G> for F
where
    F: Fn(&Individual<G>) -> f64 + Send + Sync,
{
    fn evaluate(&self, individual: &Individual<G>) -> f64 {
        self(individual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::BitString;

    #[test]
    fn test_new_is_unevaluated() {
        let ind = Individual::new(vec![BitString::new(3, true)]);
        assert!(!ind.is_evaluated());
        assert_eq!(ind.fitness_or_worst(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_invalidate() {
        let mut ind = Individual::new(vec![BitString::new(3, true)]);
        ind.fitness = Some(3.0);
        assert_eq!(ind.fitness_or_worst(), 3.0);
        ind.invalidate();
        assert!(!ind.is_evaluated());
    }

    #[test]
    fn test_closure_evaluator() {
        let onemax = |ind: &Individual<BitString>| ind.genotypes[0].count_ones() as f64;
        let ind = Individual::new(vec![BitString::from(vec![true, false, true])]);
        assert_eq!(onemax.evaluate(&ind), 2.0);
    }
}
