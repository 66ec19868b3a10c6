//! One-fifth success rule step-size control.
//!
//! [`OneFifthRule`] tracks how often breeding produces a child strictly
//! better than its parent and adapts a mutation's step size accordingly:
//! when more than a fifth of the trials succeed the step sizes grow, when
//! fewer succeed they shrink.
//!
//! [`run_one_plus_one`] drives the classic (1+1)-ES with it.
//!
//! # References
//!
//! - Rechenberg (1973), "Evolutionsstrategie"
//! - Beyer & Schwefel (2002), "Evolution strategies: A comprehensive introduction"

use super::types::{Evaluator, Individual};
use crate::error::{Error, Result};
use crate::genotype::Genotype;
use crate::ops::{Initializer, Mutation, StepSize};
use log::{debug, info};
use rand::Rng;

/// Target success rate.
pub const TARGET_SUCCESS_RATE: f64 = 0.2;

/// What happens to the success and trial counters after an adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CounterPolicy {
    /// Counters keep accumulating; once the first period has elapsed every
    /// further trial triggers an adaptation on the cumulative rate.
    #[default]
    Accumulate,
    /// Counters restart after each adaptation, so every period is judged on
    /// its own trials.
    ResetAfterAdaptation,
}

/// One-fifth success rule.
///
/// ```
/// use u_evolve::evolver::OneFifthRule;
/// use u_evolve::ops::float::GaussianMutation;
/// use u_evolve::ops::PerIndex;
///
/// let mut rule = OneFifthRule::new(5, 0.5);
/// let mut mutation = GaussianMutation::new(1.0, PerIndex::splat(1.0));
/// for success in [true, true, false, false, false] {
///     rule.record(if success { 1.0 } else { 0.0 }, 0.5);
/// }
/// // 2 of 5 successful: step size grows.
/// assert_eq!(rule.adapt(&mut mutation), Some(0.4));
/// assert_eq!(mutation.sigma.get(0), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OneFifthRule {
    /// Trials to collect before adapting.
    pub adaptation_period: usize,
    /// Step-size factor in `(0, 1]`: step sizes are divided by it on
    /// success and multiplied by it on failure.
    pub adapt_factor: f64,
    pub policy: CounterPolicy,
    successes: usize,
    trials: usize,
}

impl Default for OneFifthRule {
    fn default() -> Self {
        Self::new(10, 0.85)
    }
}

impl OneFifthRule {
    pub fn new(adaptation_period: usize, adapt_factor: f64) -> Self {
        Self {
            adaptation_period,
            adapt_factor,
            policy: CounterPolicy::default(),
            successes: 0,
            trials: 0,
        }
    }

    pub fn with_policy(mut self, policy: CounterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.adaptation_period == 0 {
            return Err(Error::parameter("adaptation_period", "must be at least 1"));
        }
        if !(self.adapt_factor > 0.0 && self.adapt_factor <= 1.0) {
            return Err(Error::parameter(
                "adapt_factor",
                format!("{} is outside (0, 1]", self.adapt_factor),
            ));
        }
        Ok(())
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Records one trial; a success is a child strictly fitter than its
    /// parent. Returns whether it succeeded.
    pub fn record(&mut self, child_fitness: f64, parent_fitness: f64) -> bool {
        let success = child_fitness > parent_fitness;
        self.trials += 1;
        if success {
            self.successes += 1;
        }
        success
    }

    /// Adapts `mutation` once the period has elapsed.
    ///
    /// Returns the success rate used, or `None` when fewer than
    /// `adaptation_period` trials have been recorded.
    pub fn adapt<S: StepSize + ?Sized>(&mut self, mutation: &mut S) -> Option<f64> {
        if self.trials == 0 || self.trials < self.adaptation_period {
            return None;
        }
        let rate = self.successes as f64 / self.trials as f64;
        if rate > TARGET_SUCCESS_RATE {
            mutation.scale_step_size(1.0 / self.adapt_factor);
            debug!("one-fifth rule: success rate {rate:.3}, increasing step size");
        } else if rate < TARGET_SUCCESS_RATE {
            mutation.scale_step_size(self.adapt_factor);
            debug!("one-fifth rule: success rate {rate:.3}, decreasing step size");
        }
        if self.policy == CounterPolicy::ResetAfterAdaptation {
            self.successes = 0;
            self.trials = 0;
        }
        Some(rate)
    }

    /// Breeds one child from an evaluated parent and applies the rule.
    ///
    /// The child is a mutated, evaluated copy of `parent`. Its fitness is
    /// compared with the parent's, the trial recorded, and `mutation`
    /// adapted when the period is reached.
    pub fn breed<G, M, E, R>(
        &mut self,
        parent: &Individual<G>,
        mutation: &mut M,
        evaluator: &E,
        rng: &mut R,
    ) -> Result<Individual<G>>
    where
        G: Genotype,
        M: Mutation<G> + StepSize,
        E: Evaluator<G>,
        R: Rng,
    {
        let mut child = parent.clone();
        for genotype in &mut child.genotypes {
            mutation.mutate(genotype, rng)?;
        }
        let fitness = evaluator.evaluate(&child);
        child.fitness = Some(fitness);

        self.record(fitness, parent.fitness_or_worst());
        self.adapt(mutation);
        Ok(child)
    }
}

/// Result of [`run_one_plus_one`].
#[derive(Debug, Clone)]
pub struct OnePlusOneResult<G> {
    pub best: Individual<G>,
    /// Parent fitness after each generation, initial parent first.
    pub fitness_history: Vec<f64>,
}

/// Runs a (1+1)-ES for `generations` generations.
///
/// Each generation breeds one child through [`OneFifthRule::breed`]; the
/// child replaces the parent when it is at least as fit.
pub fn run_one_plus_one<G, I, M, E, R>(
    initializer: &I,
    mutation: &mut M,
    rule: &mut OneFifthRule,
    evaluator: &E,
    generations: usize,
    rng: &mut R,
) -> Result<OnePlusOneResult<G>>
where
    G: Genotype,
    I: Initializer<G>,
    M: Mutation<G> + StepSize,
    E: Evaluator<G>,
    R: Rng,
{
    rule.validate()?;
    initializer.validate()?;
    mutation.validate()?;

    let mut parent = Individual::new(vec![initializer.initialize(rng)?]);
    parent.fitness = Some(evaluator.evaluate(&parent));
    info!("(1+1)-ES: {generations} generations on {}", G::TYPE_NAME);

    let mut fitness_history = Vec::with_capacity(generations + 1);
    fitness_history.push(parent.fitness_or_worst());
    for generation in 1..=generations {
        let child = rule.breed(&parent, mutation, evaluator, rng)?;
        if child.fitness_or_worst() >= parent.fitness_or_worst() {
            parent = child;
        }
        fitness_history.push(parent.fitness_or_worst());
        evaluator.on_generation(generation, parent.fitness_or_worst());
    }

    info!("(1+1)-ES: best fitness {}", parent.fitness_or_worst());
    Ok(OnePlusOneResult {
        best: parent,
        fitness_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::FloatVector;
    use crate::ops::float::{GaussianMutation, InitUniform};
    use crate::ops::PerIndex;
    use crate::random::create_rng;

    fn sigma_after(outcomes: &[bool], rule: &mut OneFifthRule) -> (Option<f64>, f64) {
        let mut mutation = GaussianMutation::new(1.0, PerIndex::splat(1.0));
        for &success in outcomes {
            rule.record(if success { 1.0 } else { 0.0 }, 0.5);
        }
        let rate = rule.adapt(&mut mutation);
        (rate, mutation.sigma.get(0))
    }

    // ---- adaptation ----

    #[test]
    fn test_high_success_increases_sigma() {
        let mut rule = OneFifthRule::new(5, 0.5);
        let (rate, sigma) = sigma_after(&[true, true, true, false, false], &mut rule);
        assert_eq!(rate, Some(0.6));
        assert_eq!(sigma, 2.0);
    }

    #[test]
    fn test_low_success_decreases_sigma() {
        let mut rule = OneFifthRule::new(5, 0.5);
        let (rate, sigma) = sigma_after(&[false; 5], &mut rule);
        assert_eq!(rate, Some(0.0));
        assert_eq!(sigma, 0.5);
    }

    #[test]
    fn test_exactly_one_fifth_leaves_sigma() {
        let mut rule = OneFifthRule::new(5, 0.5);
        let (rate, sigma) = sigma_after(&[true, false, false, false, false], &mut rule);
        assert_eq!(rate, Some(0.2));
        assert_eq!(sigma, 1.0);
    }

    #[test]
    fn test_no_adaptation_before_period() {
        let mut rule = OneFifthRule::new(5, 0.5);
        let (rate, sigma) = sigma_after(&[true, true], &mut rule);
        assert_eq!(rate, None);
        assert_eq!(sigma, 1.0);
    }

    #[test]
    fn test_equal_fitness_is_not_success() {
        let mut rule = OneFifthRule::default();
        assert!(!rule.record(1.0, 1.0));
        assert!(rule.record(1.5, 1.0));
        assert_eq!((rule.successes(), rule.trials()), (1, 2));
    }

    #[test]
    fn test_accumulate_keeps_counters() {
        let mut rule = OneFifthRule::new(2, 0.5);
        sigma_after(&[true, true], &mut rule);
        assert_eq!(rule.trials(), 2);
        // Third trial already adapts, on the cumulative rate 2/3.
        let (rate, _) = sigma_after(&[false], &mut rule);
        assert_eq!(rule.trials(), 3);
        assert_eq!(rate, Some(2.0 / 3.0));
    }

    #[test]
    fn test_reset_after_adaptation() {
        let mut rule = OneFifthRule::new(2, 0.5).with_policy(CounterPolicy::ResetAfterAdaptation);
        sigma_after(&[true, true], &mut rule);
        assert_eq!((rule.successes(), rule.trials()), (0, 0));
        let (rate, _) = sigma_after(&[false], &mut rule);
        assert_eq!(rate, None);
    }

    #[test]
    fn test_validate() {
        assert!(OneFifthRule::default().validate().is_ok());
        assert!(OneFifthRule::new(0, 0.5).validate().is_err());
        assert!(OneFifthRule::new(5, 1.5).validate().is_err());
        assert!(OneFifthRule::new(5, 0.0).validate().is_err());
    }

    // ---- breeding ----

    fn sphere(ind: &Individual<FloatVector>) -> f64 {
        -ind.genotypes[0].as_slice().iter().map(|x| x * x).sum::<f64>()
    }

    #[test]
    fn test_breed_records_trial() {
        let mut rng = create_rng(42);
        let mut rule = OneFifthRule::new(100, 0.85);
        let mut mutation = GaussianMutation::new(1.0, PerIndex::splat(0.1));
        let mut parent = Individual::new(vec![FloatVector::from(vec![1.0, 1.0])]);
        parent.fitness = Some(sphere(&parent));

        let child = rule.breed(&parent, &mut mutation, &sphere, &mut rng).unwrap();

        assert_eq!(rule.trials(), 1);
        assert!(child.is_evaluated());
        assert_ne!(child.genotypes, parent.genotypes);
    }

    #[test]
    fn test_one_plus_one_sphere() {
        let mut rng = create_rng(42);
        let init = InitUniform::new(5, PerIndex::splat(-5.0), PerIndex::splat(5.0));
        let mut mutation = GaussianMutation::new(1.0, PerIndex::splat(1.0));
        let mut rule = OneFifthRule::new(10, 0.85).with_policy(CounterPolicy::ResetAfterAdaptation);

        let result =
            run_one_plus_one(&init, &mut mutation, &mut rule, &sphere, 2000, &mut rng).unwrap();

        assert_eq!(result.fitness_history.len(), 2001);
        for window in result.fitness_history.windows(2) {
            assert!(window[1] >= window[0]);
        }
        let best = result.best.fitness_or_worst();
        assert!(best > -1e-3, "expected near-optimal sphere, got {best}");
        // Step size shrank while closing in.
        assert!(mutation.sigma.get(0) < 0.1);
    }
}
