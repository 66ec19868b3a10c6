//! Random number capability consumed by every stochastic operator.
//!
//! Operators never own a generator. They receive one by `&mut` reference and
//! draw from it through the [`Randomizer`] extension trait, which is
//! implemented for every [`rand::Rng`]. Concurrent workers must each hold
//! their own stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Creates a seeded, reproducible generator.
///
/// The same seed always yields the same sequence on a given platform.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws used by the genetic operators.
///
/// Blanket-implemented for all [`Rng`] types, so any generator can be
/// passed where a randomizer is expected.
pub trait Randomizer {
    /// Uniform real in `[0, 1)`.
    fn roll_uniform(&mut self) -> f64;

    /// Uniform real in `[lo, hi)`. Returns `lo` when the range is empty.
    fn roll_uniform_range(&mut self, lo: f64, hi: f64) -> f64;

    /// Uniform integer in `[lo, hi]` (both inclusive). Returns `lo` when
    /// `hi < lo`.
    fn roll_integer(&mut self, lo: i64, hi: i64) -> i64;

    /// Uniform index in `[0, n)`. `n` must be positive.
    fn roll_index(&mut self, n: usize) -> usize;

    /// Normal deviate with the given mean and standard deviation.
    fn roll_gaussian(&mut self, mean: f64, stdev: f64) -> f64;
}

impl<R: Rng> Randomizer for R {
    fn roll_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn roll_uniform_range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            lo + (hi - lo) * self.random::<f64>()
        } else {
            lo
        }
    }

    fn roll_integer(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            lo
        } else {
            self.random_range(lo..=hi)
        }
    }

    fn roll_index(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }

    fn roll_gaussian(&mut self, mean: f64, stdev: f64) -> f64 {
        let z: f64 = self.sample(StandardNormal);
        mean + stdev * z
    }
}
