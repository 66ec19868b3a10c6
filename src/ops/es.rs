//! Evolution strategy operators.
//!
//! - [`InitEs`]: values uniform in bounds, every strategy set to a fixed
//!   initial step size
//! - [`EsMutation`]: self-adaptive log-normal mutation, where each gene's
//!   step size evolves along with its value
//!
//! Step-size control by success rate (the one-fifth rule) lives in
//! [`crate::evolver::one_fifth`].
//!
//! # References
//!
//! - Schwefel (1995), "Evolution and Optimum Seeking"
//! - Beyer & Schwefel (2002), "Evolution strategies: A comprehensive introduction"

use super::float::clamp;
use super::{check_size, Initializer, Mutation, PerIndex};
use crate::error::{Error, Result};
use crate::genotype::{EsPair, EsVector};
use crate::random::Randomizer;
use rand::Rng;

/// Creates ES vectors with values uniform in `[min[j], max[j]]` and
/// strategy `init_strategy[j]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitEs {
    pub size: usize,
    pub min: PerIndex<f64>,
    pub max: PerIndex<f64>,
    pub init_strategy: PerIndex<f64>,
}

impl InitEs {
    /// Initial strategy 1.0.
    pub fn new(size: usize, min: PerIndex<f64>, max: PerIndex<f64>) -> Self {
        Self {
            size,
            min,
            max,
            init_strategy: PerIndex::splat(1.0),
        }
    }

    pub fn with_init_strategy(mut self, init_strategy: PerIndex<f64>) -> Self {
        self.init_strategy = init_strategy;
        self
    }
}

impl Initializer<EsVector> for InitEs {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<EsVector> {
        check_size(self.size, "ESVector")?;
        let pairs = (0..self.size)
            .map(|j| {
                EsPair::new(
                    rng.roll_uniform_range(self.min.get(j), self.max.get(j)),
                    self.init_strategy.get(j),
                )
            })
            .collect::<Vec<_>>();
        Ok(EsVector::from(pairs))
    }

    fn validate(&self) -> Result<()> {
        check_size(self.size, "ESVector")?;
        let span = self
            .min
            .as_slice()
            .len()
            .max(self.max.as_slice().len())
            .max(self.init_strategy.as_slice().len());
        for j in 0..span {
            if !(self.min.get(j) <= self.max.get(j)) {
                return Err(Error::parameter(
                    "min/max",
                    format!("min {} exceeds max {} at index {j}", self.min.get(j), self.max.get(j)),
                ));
            }
            if !(self.init_strategy.get(j) >= 0.0) {
                return Err(Error::parameter(
                    "init_strategy",
                    format!("{} is negative", self.init_strategy.get(j)),
                ));
            }
        }
        Ok(())
    }
}

/// Self-adaptive log-normal mutation.
///
/// For a vector of length `n`, with learning rates `τ' = 1/sqrt(2n)` and
/// `τ = 1/sqrt(2·sqrt(n))`, one global deviate `N` is drawn per call and
/// each gene is updated as
///
/// ```text
/// s_i = max(s_i · exp(τ'·N + τ·N_i), min_strategy)
/// x_i = clamp(x_i + s_i · N'_i, min_i, max_i)
/// ```
///
/// The step size is updated before the value it drives.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EsMutation {
    /// Lower bound on every strategy parameter.
    pub min_strategy: f64,
    pub min: PerIndex<f64>,
    pub max: PerIndex<f64>,
}

impl Default for EsMutation {
    fn default() -> Self {
        Self {
            min_strategy: 1e-10,
            min: PerIndex::splat(f64::MIN),
            max: PerIndex::splat(f64::MAX),
        }
    }
}

impl EsMutation {
    pub fn new(min_strategy: f64) -> Self {
        Self {
            min_strategy,
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, min: PerIndex<f64>, max: PerIndex<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl Mutation<EsVector> for EsMutation {
    fn mutate<R: Rng>(&self, genotype: &mut EsVector, rng: &mut R) -> Result<bool> {
        let n = genotype.as_slice().len();
        if n == 0 {
            return Ok(false);
        }
        let n = n as f64;
        let tau_global = 1.0 / (2.0 * n).sqrt();
        let tau_local = 1.0 / (2.0 * n.sqrt()).sqrt();
        let global = tau_global * rng.roll_gaussian(0.0, 1.0);

        let mut changed = false;
        for (j, pair) in genotype.as_mut_slice().iter_mut().enumerate() {
            let before = *pair;
            let local = tau_local * rng.roll_gaussian(0.0, 1.0);
            pair.strategy = (pair.strategy * (global + local).exp()).max(self.min_strategy);
            pair.value = clamp(
                pair.value + rng.roll_gaussian(0.0, pair.strategy),
                self.min.get(j),
                self.max.get(j),
            );
            changed |= *pair != before;
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_strategy >= 0.0) {
            return Err(Error::parameter(
                "min_strategy",
                format!("{} is negative", self.min_strategy),
            ));
        }
        Ok(())
    }
}
