//! Real-valued vector operators.
//!
//! # Initialization
//!
//! - [`InitUniform`] / [`InitUniformQr`]: uniform in `[min, max]`
//! - [`InitGaussian`] / [`InitGaussianQr`]: `Normal(mean, stdev)`, clamped
//!
//! # Mutation
//!
//! - [`GaussianMutation`] / [`GaussianMutationQr`]: add `Normal(mu, sigma)`
//!   noise to each element with probability `mutate_float_pb`
//!
//! # Crossover
//!
//! - [`BlendCrossover`] (BLX-α): Eshelman & Schaffer (1993)
//! - [`SbxCrossover`] (SBX): Deb & Agrawal (1995)
//!
//! Every per-element parameter is a [`PerIndex`]. Values may be snapped to
//! multiples of an increment `inc`; increments of magnitude at most
//! [`INC_EPSILON`] disable snapping. Initializers and mutations correct a
//! snap that leaves the bounds by one increment and clamp what remains
//! outside ([`snap_within`]); BLX-α snaps without that correction and clamps
//! afterwards.
//!
//! The `Qr` variants take their uniform or Gaussian draws from a
//! [`SharedQuasiRandom`] sequence instead of the pseudo-random source.
//!
//! # References
//!
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and Interval-Schemata"
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"

use super::{
    check_size, with_quasi_random, Crossover, Initializer, Mutation, PerIndex,
    SharedQuasiRandom, StepSize,
};
use crate::error::{check_probability, Error, Result};
use crate::genotype::FloatVector;
use crate::random::Randomizer;
use rand::Rng;

/// Increments at or below this magnitude disable snapping.
pub const INC_EPSILON: f64 = 1e-12;

/// Rounds `value` to the nearest multiple of `inc`.
pub fn snap(value: f64, inc: f64) -> f64 {
    if inc.abs() > INC_EPSILON {
        inc * (value / inc).round()
    } else {
        value
    }
}

/// [`snap`], then moves a result that left `[min, max]` back by one
/// increment `|inc|`.
///
/// When no multiple of `inc` lies within one step of the bounds (an
/// increment wider than `max - min`) the corrected value is clamped, so the
/// result is always inside `[min, max]`.
pub fn snap_within(value: f64, inc: f64, min: f64, max: f64) -> f64 {
    let step = inc.abs();
    if step <= INC_EPSILON {
        return value;
    }
    let mut snapped = snap(value, step);
    if snapped > max {
        snapped -= step;
    }
    if snapped < min {
        snapped += step;
    }
    clamp(snapped, min, max)
}

/// Restricts `value` to `[min, max]`.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// BLX-α recombination of one pair for a given uniform draw `u`.
///
/// `gamma = (1 + 2α)u - α`; the children are `(1-gamma)x1 + gamma·x2` and
/// `gamma·x1 + (1-gamma)x2`.
pub fn blend_pair(x1: f64, x2: f64, alpha: f64, u: f64) -> (f64, f64) {
    let gamma = (1.0 + 2.0 * alpha) * u - alpha;
    (
        (1.0 - gamma) * x1 + gamma * x2,
        gamma * x1 + (1.0 - gamma) * x2,
    )
}

/// SBX spread factor for a uniform draw `u` and distribution index `nu`.
pub fn sbx_beta(u: f64, nu: f64) -> f64 {
    let exponent = 1.0 / (nu + 1.0);
    if u <= 0.5 {
        (2.0 * u).powf(exponent)
    } else {
        (1.0 / (2.0 * (1.0 - u))).powf(exponent)
    }
}

/// SBX recombination of one pair for a given spread factor.
pub fn sbx_pair(x1: f64, x2: f64, beta: f64) -> (f64, f64) {
    (
        0.5 * ((1.0 + beta) * x1 + (1.0 - beta) * x2),
        0.5 * ((1.0 - beta) * x1 + (1.0 + beta) * x2),
    )
}

fn check_bounds(min: &PerIndex<f64>, max: &PerIndex<f64>) -> Result<()> {
    let span = min.as_slice().len().max(max.as_slice().len());
    for j in 0..span {
        let (lo, hi) = (min.get(j), max.get(j));
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(Error::parameter(
                "min/max",
                format!("invalid bounds [{lo}, {hi}] at index {j}"),
            ));
        }
    }
    Ok(())
}

fn check_non_negative(name: &'static str, values: &PerIndex<f64>) -> Result<()> {
    match values.as_slice().iter().find(|v| !(**v >= 0.0)) {
        Some(v) => Err(Error::parameter(name, format!("{v} is negative"))),
        None => Ok(()),
    }
}

fn unbounded() -> (PerIndex<f64>, PerIndex<f64>) {
    (PerIndex::splat(f64::MIN), PerIndex::splat(f64::MAX))
}

// ============================================================================
// Initialization
// ============================================================================

/// Creates float vectors with values uniform in `[min[j], max[j]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitUniform {
    pub size: usize,
    pub min: PerIndex<f64>,
    pub max: PerIndex<f64>,
    /// Snapping increment (0 disables).
    pub inc: PerIndex<f64>,
}

impl InitUniform {
    pub fn new(size: usize, min: PerIndex<f64>, max: PerIndex<f64>) -> Self {
        Self {
            size,
            min,
            max,
            inc: PerIndex::splat(0.0),
        }
    }

    pub fn with_inc(mut self, inc: PerIndex<f64>) -> Self {
        self.inc = inc;
        self
    }

    /// Maps a uniform draw `u` in `[0, 1)` onto element `j`.
    fn element(&self, j: usize, u: f64) -> f64 {
        let (lo, hi) = (self.min.get(j), self.max.get(j));
        snap_within(lo + u * (hi - lo), self.inc.get(j), lo, hi)
    }
}

impl Initializer<FloatVector> for InitUniform {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<FloatVector> {
        check_size(self.size, "FloatVector")?;
        let values = (0..self.size)
            .map(|j| self.element(j, rng.roll_uniform()))
            .collect::<Vec<_>>();
        Ok(FloatVector::from(values))
    }

    fn validate(&self) -> Result<()> {
        check_size(self.size, "FloatVector")?;
        check_bounds(&self.min, &self.max)
    }
}

/// [`InitUniform`] drawing from a quasi-random sequence.
#[derive(Debug, Clone)]
pub struct InitUniformQr {
    pub settings: InitUniform,
    pub qr: SharedQuasiRandom,
}

impl InitUniformQr {
    pub fn new(settings: InitUniform, qr: SharedQuasiRandom) -> Self {
        Self { settings, qr }
    }
}

impl Initializer<FloatVector> for InitUniformQr {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<FloatVector> {
        let size = self.settings.size;
        check_size(size, "FloatVector")?;
        let mut point = vec![0.0; size];
        with_quasi_random(&self.qr, size, rng, |qr| qr.uniform_vector(&mut point))?;
        for (j, v) in point.iter_mut().enumerate() {
            *v = self.settings.element(j, *v);
        }
        Ok(FloatVector::from(point))
    }

    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

/// Creates float vectors with values drawn from `Normal(mean[j], stdev[j])`
/// and clamped to `[min[j], max[j]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitGaussian {
    pub size: usize,
    pub mean: PerIndex<f64>,
    pub stdev: PerIndex<f64>,
    pub min: PerIndex<f64>,
    pub max: PerIndex<f64>,
    pub inc: PerIndex<f64>,
}

impl InitGaussian {
    /// Unbounded, unsnapped initializer.
    pub fn new(size: usize, mean: PerIndex<f64>, stdev: PerIndex<f64>) -> Self {
        let (min, max) = unbounded();
        Self {
            size,
            mean,
            stdev,
            min,
            max,
            inc: PerIndex::splat(0.0),
        }
    }

    pub fn with_bounds(mut self, min: PerIndex<f64>, max: PerIndex<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_inc(mut self, inc: PerIndex<f64>) -> Self {
        self.inc = inc;
        self
    }

    /// Maps a standard normal draw `z` onto element `j`.
    fn element(&self, j: usize, z: f64) -> f64 {
        let (lo, hi) = (self.min.get(j), self.max.get(j));
        let value = clamp(self.mean.get(j) + self.stdev.get(j) * z, lo, hi);
        snap_within(value, self.inc.get(j), lo, hi)
    }
}

impl Initializer<FloatVector> for InitGaussian {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<FloatVector> {
        check_size(self.size, "FloatVector")?;
        let values = (0..self.size)
            .map(|j| self.element(j, rng.roll_gaussian(0.0, 1.0)))
            .collect::<Vec<_>>();
        Ok(FloatVector::from(values))
    }

    fn validate(&self) -> Result<()> {
        check_size(self.size, "FloatVector")?;
        check_non_negative("stdev", &self.stdev)?;
        check_bounds(&self.min, &self.max)
    }
}

/// [`InitGaussian`] drawing from a quasi-random sequence.
#[derive(Debug, Clone)]
pub struct InitGaussianQr {
    pub settings: InitGaussian,
    pub qr: SharedQuasiRandom,
}

impl InitGaussianQr {
    pub fn new(settings: InitGaussian, qr: SharedQuasiRandom) -> Self {
        Self { settings, qr }
    }
}

impl Initializer<FloatVector> for InitGaussianQr {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<FloatVector> {
        let size = self.settings.size;
        check_size(size, "FloatVector")?;
        let mut point = vec![0.0; size];
        with_quasi_random(&self.qr, size, rng, |qr| qr.gaussian_vector(&mut point))?;
        for (j, v) in point.iter_mut().enumerate() {
            *v = self.settings.element(j, *v);
        }
        Ok(FloatVector::from(point))
    }

    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Adds `Normal(mu[j], sigma[j])` noise to each element with probability
/// `mutate_float_pb`, then clamps and snaps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaussianMutation {
    /// Per-element mutation probability.
    pub mutate_float_pb: f64,
    pub mu: PerIndex<f64>,
    pub sigma: PerIndex<f64>,
    pub min: PerIndex<f64>,
    pub max: PerIndex<f64>,
    pub inc: PerIndex<f64>,
}

impl Default for GaussianMutation {
    fn default() -> Self {
        let (min, max) = unbounded();
        Self {
            mutate_float_pb: 0.1,
            mu: PerIndex::splat(0.0),
            sigma: PerIndex::splat(0.1),
            min,
            max,
            inc: PerIndex::splat(0.0),
        }
    }
}

impl GaussianMutation {
    pub fn new(mutate_float_pb: f64, sigma: PerIndex<f64>) -> Self {
        Self {
            mutate_float_pb,
            sigma,
            ..Self::default()
        }
    }

    pub fn with_mu(mut self, mu: PerIndex<f64>) -> Self {
        self.mu = mu;
        self
    }

    pub fn with_bounds(mut self, min: PerIndex<f64>, max: PerIndex<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_inc(mut self, inc: PerIndex<f64>) -> Self {
        self.inc = inc;
        self
    }

    /// Applies a standard normal draw `z` to `value` at element `j`.
    fn perturb(&self, j: usize, value: f64, z: f64) -> f64 {
        let (lo, hi) = (self.min.get(j), self.max.get(j));
        let moved = clamp(value + self.mu.get(j) + self.sigma.get(j) * z, lo, hi);
        snap_within(moved, self.inc.get(j), lo, hi)
    }

    fn check(&self) -> Result<()> {
        check_probability("mutate_float_pb", self.mutate_float_pb)?;
        check_non_negative("sigma", &self.sigma)?;
        check_bounds(&self.min, &self.max)
    }
}

impl Mutation<FloatVector> for GaussianMutation {
    fn mutate<R: Rng>(&self, genotype: &mut FloatVector, rng: &mut R) -> Result<bool> {
        let mut changed = false;
        for (j, value) in genotype.as_mut_slice().iter_mut().enumerate() {
            if rng.roll_uniform() < self.mutate_float_pb {
                let moved = self.perturb(j, *value, rng.roll_gaussian(0.0, 1.0));
                changed |= moved != *value;
                *value = moved;
            }
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        self.check()
    }
}

impl StepSize for GaussianMutation {
    fn scale_step_size(&mut self, factor: f64) {
        self.sigma.map_in_place(|s| s * factor);
    }
}

/// [`GaussianMutation`] drawing its noise from a quasi-random sequence.
///
/// Each call consumes one full point of the sequence; the elements selected
/// for mutation use their coordinate of that point.
#[derive(Debug, Clone)]
pub struct GaussianMutationQr {
    pub settings: GaussianMutation,
    pub qr: SharedQuasiRandom,
}

impl GaussianMutationQr {
    pub fn new(settings: GaussianMutation, qr: SharedQuasiRandom) -> Self {
        Self { settings, qr }
    }
}

impl Mutation<FloatVector> for GaussianMutationQr {
    fn mutate<R: Rng>(&self, genotype: &mut FloatVector, rng: &mut R) -> Result<bool> {
        let size = genotype.as_slice().len();
        if size == 0 {
            return Ok(false);
        }
        let mut noise = vec![0.0; size];
        with_quasi_random(&self.qr, size, rng, |qr| qr.gaussian_vector(&mut noise))?;

        let mut changed = false;
        for (j, value) in genotype.as_mut_slice().iter_mut().enumerate() {
            if rng.roll_uniform() < self.settings.mutate_float_pb {
                let moved = self.settings.perturb(j, *value, noise[j]);
                changed |= moved != *value;
                *value = moved;
            }
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        self.settings.check()
    }
}

impl StepSize for GaussianMutationQr {
    fn scale_step_size(&mut self, factor: f64) {
        self.settings.scale_step_size(factor);
    }
}

// ============================================================================
// Crossover
// ============================================================================

/// Blend crossover (BLX-α).
///
/// Each pair of elements is recombined by [`blend_pair`] with a fresh
/// uniform draw, then snapped to `inc` and clamped to the bounds. With
/// `alpha = 0` the children lie on the segment between the parents; larger
/// values let them extend beyond it. Only the shared prefix takes part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendCrossover {
    pub alpha: f64,
    pub min: PerIndex<f64>,
    pub max: PerIndex<f64>,
    pub inc: PerIndex<f64>,
}

impl Default for BlendCrossover {
    fn default() -> Self {
        let (min, max) = unbounded();
        Self {
            alpha: 0.5,
            min,
            max,
            inc: PerIndex::splat(0.0),
        }
    }
}

impl BlendCrossover {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, min: PerIndex<f64>, max: PerIndex<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_inc(mut self, inc: PerIndex<f64>) -> Self {
        self.inc = inc;
        self
    }
}

impl Crossover<FloatVector> for BlendCrossover {
    fn mate<R: Rng>(&self, first: &mut FloatVector, second: &mut FloatVector, rng: &mut R) -> Result<bool> {
        let n = first.as_slice().len().min(second.as_slice().len());
        let mut changed = false;
        for j in 0..n {
            let (x1, x2) = (first[j], second[j]);
            let (y1, y2) = blend_pair(x1, x2, self.alpha, rng.roll_uniform());
            let (lo, hi, inc) = (self.min.get(j), self.max.get(j), self.inc.get(j));
            first[j] = clamp(snap(y1, inc), lo, hi);
            second[j] = clamp(snap(y2, inc), lo, hi);
            changed |= first[j] != x1 || second[j] != x2;
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        if !(self.alpha >= 0.0) {
            return Err(Error::parameter("alpha", format!("{} is negative", self.alpha)));
        }
        check_bounds(&self.min, &self.max)
    }
}

/// Simulated binary crossover (SBX).
///
/// Each pair of elements is spread by [`sbx_beta`] with a fresh uniform
/// draw and clamped to the bounds. Larger `nu` keeps children closer to
/// their parents. The pair's mean is preserved before clamping. Only the
/// shared prefix takes part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SbxCrossover {
    /// Distribution index.
    pub nu: f64,
    pub min: PerIndex<f64>,
    pub max: PerIndex<f64>,
}

impl Default for SbxCrossover {
    fn default() -> Self {
        let (min, max) = unbounded();
        Self { nu: 2.0, min, max }
    }
}

impl SbxCrossover {
    pub fn new(nu: f64) -> Self {
        Self {
            nu,
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, min: PerIndex<f64>, max: PerIndex<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

impl Crossover<FloatVector> for SbxCrossover {
    fn mate<R: Rng>(&self, first: &mut FloatVector, second: &mut FloatVector, rng: &mut R) -> Result<bool> {
        let n = first.as_slice().len().min(second.as_slice().len());
        let mut changed = false;
        for j in 0..n {
            let (x1, x2) = (first[j], second[j]);
            let (y1, y2) = sbx_pair(x1, x2, sbx_beta(rng.roll_uniform(), self.nu));
            let (lo, hi) = (self.min.get(j), self.max.get(j));
            first[j] = clamp(y1, lo, hi);
            second[j] = clamp(y2, lo, hi);
            changed |= first[j] != x1 || second[j] != x2;
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        if !(self.nu >= 0.0) {
            return Err(Error::parameter("nu", format!("{} is negative", self.nu)));
        }
        check_bounds(&self.min, &self.max)
    }
}
