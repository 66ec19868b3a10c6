//! Low-discrepancy (quasi-random) vector generator.
//!
//! Produces points of a Halton sequence, one prime base per dimension, with a
//! random Cranley-Patterson shift chosen at [`reset`](QuasiRandom::reset).
//! Consecutive points cover the unit hypercube far more evenly than
//! independent uniform draws, which helps initialization and mutation of
//! small populations.
//!
//! The generator must be dimensioned before first use. Operators sharing one
//! instance reset it to their vector size when they find it undimensioned.
//!
//! # References
//!
//! - Halton (1960), "On the efficiency of certain quasi-random sequences of
//!   points in evaluating multi-dimensional integrals"
//! - Cranley & Patterson (1976), "Randomization of Number Theoretic Methods
//!   for Multiple Integration"
//! - Acklam (2003), "An algorithm for computing the inverse normal
//!   cumulative distribution function"

use crate::error::{Error, Result};
use crate::ops::PerIndex;
use crate::random::Randomizer;
use log::debug;
use rand::Rng;

/// Shifted Halton sequence generator.
#[derive(Debug, Clone, Default)]
pub struct QuasiRandom {
    bases: Vec<u64>,
    shifts: Vec<f64>,
    index: u64,
}

impl QuasiRandom {
    /// Creates an undimensioned generator. Call [`reset`](Self::reset) first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator already dimensioned to `dimensionality`.
    pub fn with_dimensionality<R: Rng>(dimensionality: usize, rng: &mut R) -> Self {
        let mut qr = Self::new();
        qr.reset(dimensionality, rng);
        qr
    }

    /// Number of coordinates per generated point; 0 when undimensioned.
    pub fn dimensionality(&self) -> usize {
        self.bases.len()
    }

    /// Restarts the sequence with a new dimensionality and random shift.
    pub fn reset<R: Rng>(&mut self, dimensionality: usize, rng: &mut R) {
        self.bases = first_primes(dimensionality);
        self.shifts = (0..dimensionality).map(|_| rng.roll_uniform()).collect();
        self.index = 0;
        debug!("quasi-random sequence reset to {dimensionality} dimensions");
    }

    /// Fills `out` with the next point, each coordinate in `[0, 1)`.
    ///
    /// # Errors
    /// [`Error::LengthMismatch`] if `out` does not match the dimensionality.
    pub fn uniform_vector(&mut self, out: &mut [f64]) -> Result<()> {
        self.check_dimension(out.len())?;
        self.index += 1;
        for ((slot, &base), &shift) in out.iter_mut().zip(&self.bases).zip(&self.shifts) {
            *slot = (radical_inverse(self.index, base) + shift).fract();
        }
        Ok(())
    }

    /// Fills `out` with the next point mapped through the standard normal
    /// inverse CDF.
    pub fn gaussian_vector(&mut self, out: &mut [f64]) -> Result<()> {
        self.uniform_vector(out)?;
        for slot in out.iter_mut() {
            *slot = inverse_normal_cdf(*slot);
        }
        Ok(())
    }

    /// Fills `out` with the next point mapped onto integers in
    /// `[mins[j], maxs[j]]`.
    pub fn integer_sequence(
        &mut self,
        out: &mut [i64],
        mins: &PerIndex<i64>,
        maxs: &PerIndex<i64>,
    ) -> Result<()> {
        let mut point = vec![0.0; out.len()];
        self.uniform_vector(&mut point)?;
        for (j, (slot, u)) in out.iter_mut().zip(point).enumerate() {
            let (lo, hi) = (i128::from(mins.get(j)), i128::from(maxs.get(j)));
            let span = (hi - lo + 1).max(1) as f64;
            *slot = (lo + (u * span).floor() as i128).min(hi.max(lo)) as i64;
        }
        Ok(())
    }

    fn check_dimension(&self, len: usize) -> Result<()> {
        if len != self.dimensionality() {
            return Err(Error::LengthMismatch {
                left: len,
                right: self.dimensionality(),
            });
        }
        Ok(())
    }
}

/// Van der Corput radical inverse of `i` in `base`.
fn radical_inverse(mut i: u64, base: u64) -> f64 {
    let inv = 1.0 / base as f64;
    let mut factor = inv;
    let mut result = 0.0;
    while i > 0 {
        result += (i % base) as f64 * factor;
        i /= base;
        factor *= inv;
    }
    result
}

fn first_primes(n: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(n);
    let mut candidate = 2u64;
    while primes.len() < n {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// Standard normal quantile function (Acklam's rational approximation,
/// relative error below 1.2e-9).
pub fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    // Keep the tails finite: the sequence never yields exactly 0 but the
    // shifted fract can.
    let p = p.clamp(1e-12, 1.0 - 1e-12);

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_starts_undimensioned() {
        let mut qr = QuasiRandom::new();
        assert_eq!(qr.dimensionality(), 0);
        let mut out = [0.0; 2];
        assert!(qr.uniform_vector(&mut out).is_err());
    }

    #[test]
    fn test_reset_sets_dimensionality() {
        let mut rng = create_rng(42);
        let mut qr = QuasiRandom::new();
        qr.reset(5, &mut rng);
        assert_eq!(qr.dimensionality(), 5);
        assert_eq!(qr.bases, vec![2, 3, 5, 7, 11]);
    }

    #[test]
    fn test_uniform_in_unit_cube() {
        let mut rng = create_rng(42);
        let mut qr = QuasiRandom::with_dimensionality(4, &mut rng);
        let mut out = [0.0; 4];
        for _ in 0..500 {
            qr.uniform_vector(&mut out).unwrap();
            assert!(out.iter().all(|&u| (0.0..1.0).contains(&u)), "{out:?}");
        }
    }

    #[test]
    fn test_low_discrepancy_in_first_dimension() {
        let mut rng = create_rng(3);
        let mut qr = QuasiRandom::with_dimensionality(1, &mut rng);
        let mut out = [0.0];
        let mut below_half = 0;
        for _ in 0..1024 {
            qr.uniform_vector(&mut out).unwrap();
            if out[0] < 0.5 {
                below_half += 1;
            }
        }
        // Base-2 van der Corput points split exactly evenly, a shift moves
        // at most one point across the boundary.
        assert!((511..=513).contains(&below_half), "got {below_half}");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = QuasiRandom::with_dimensionality(3, &mut create_rng(9));
        let mut b = QuasiRandom::with_dimensionality(3, &mut create_rng(9));
        let (mut x, mut y) = ([0.0; 3], [0.0; 3]);
        for _ in 0..10 {
            a.uniform_vector(&mut x).unwrap();
            b.uniform_vector(&mut y).unwrap();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_inverse_normal_cdf_known_points() {
        assert!(inverse_normal_cdf(0.5).abs() < 1e-9);
        assert!((inverse_normal_cdf(0.975) - 1.959_963_985).abs() < 1e-6);
        assert!((inverse_normal_cdf(0.025) + 1.959_963_985).abs() < 1e-6);
        assert!((inverse_normal_cdf(0.001) + 3.090_232_306).abs() < 1e-6);
        assert!(inverse_normal_cdf(0.0).is_finite());
        assert!(inverse_normal_cdf(1.0).is_finite());
    }

    #[test]
    fn test_gaussian_vector_moments() {
        let mut rng = create_rng(42);
        let mut qr = QuasiRandom::with_dimensionality(2, &mut rng);
        let mut out = [0.0; 2];
        let n = 4096;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for _ in 0..n {
            qr.gaussian_vector(&mut out).unwrap();
            sum += out[0];
            sum_sq += out[0] * out[0];
        }
        let mean = sum / n as f64;
        let var = sum_sq / n as f64 - mean * mean;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.1, "var {var}");
    }

    #[test]
    fn test_integer_sequence_bounds() {
        let mut rng = create_rng(42);
        let mut qr = QuasiRandom::with_dimensionality(3, &mut rng);
        let mins = PerIndex::new(vec![0, -5]).unwrap();
        let maxs = PerIndex::new(vec![3, 5]).unwrap();
        let mut out = [0i64; 3];
        let mut hit_max = false;
        for _ in 0..200 {
            qr.integer_sequence(&mut out, &mins, &maxs).unwrap();
            assert!((0..=3).contains(&out[0]));
            assert!((-5..=5).contains(&out[1]));
            assert!((-5..=5).contains(&out[2]));
            hit_max |= out[0] == 3;
        }
        assert!(hit_max);
    }

    #[test]
    fn test_integer_sequence_full_i64_range() {
        let mut rng = create_rng(42);
        let mut qr = QuasiRandom::with_dimensionality(2, &mut rng);
        let mins = PerIndex::new(vec![i64::MIN, i64::MAX]).unwrap();
        let maxs = PerIndex::splat(i64::MAX);
        let mut out = [0i64; 2];
        let mut saw_negative = false;
        for _ in 0..50 {
            qr.integer_sequence(&mut out, &mins, &maxs).unwrap();
            assert_eq!(out[1], i64::MAX);
            saw_negative |= out[0] < 0;
        }
        assert!(saw_negative);
    }
}
