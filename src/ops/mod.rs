//! Genetic operators.
//!
//! Operators are small configuration structs implementing one of three
//! capability traits:
//!
//! - [`Initializer`]: creates a genotype from scratch
//! - [`Mutation`]: perturbs one genotype in place
//! - [`Crossover`]: recombines two genotypes in place (both are modified)
//!
//! Operators hold only read-only configuration and receive the random
//! source explicitly, so a single operator can be shared by every
//! individual of a population. Per-individual application probabilities
//! (how often an individual is mutated or a pair is mated) belong to the
//! caller, see [`crate::evolver`]. Per-element probabilities belong to the
//! operators.
//!
//! # Submodules
//!
//! - [`generic`]: one-point, two-point, uniform crossover and shuffle
//!   mutation for any [`Genotype`]
//! - [`bit_string`]: bit string initialization and bit-flip mutation
//! - [`integer`]: integer vector initialization and mutations
//! - [`permutation`]: permutation-preserving crossovers (CX, PMX, OX, NWOX,
//!   UPMX, non-Abelian) and the indices crossover
//! - [`float`]: real vector initialization, Gaussian mutation, BLX-α and SBX
//!   crossovers, and their quasi-random variants
//! - [`es`]: evolution strategy initialization and self-adaptive mutation

pub mod bit_string;
pub mod es;
pub mod float;
pub mod generic;
pub mod integer;
pub mod permutation;

use crate::error::{Error, Result};
use crate::genotype::Genotype;
use crate::quasi_random::QuasiRandom;
use crate::random::Randomizer;
use rand::Rng;
use std::sync::{Arc, Mutex};

/// Creates genotypes.
pub trait Initializer<G: Genotype> {
    /// Creates one genotype.
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<G>;

    /// Checks the operator's configuration.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Perturbs a genotype in place.
pub trait Mutation<G: Genotype> {
    /// Mutates `genotype` and returns whether any element changed.
    fn mutate<R: Rng>(&self, genotype: &mut G, rng: &mut R) -> Result<bool>;

    /// Checks the operator's configuration.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Recombines two genotypes in place.
pub trait Crossover<G: Genotype> {
    /// Mates `first` with `second`, modifying both, and returns whether
    /// either changed.
    fn mate<R: Rng>(&self, first: &mut G, second: &mut G, rng: &mut R) -> Result<bool>;

    /// Checks the operator's configuration.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A mutation whose perturbation scale can be adapted during a run.
pub trait StepSize {
    /// Multiplies every step size (standard deviation) by `factor`.
    fn scale_step_size(&mut self, factor: f64);
}

/// A per-element parameter with last-value broadcast.
///
/// Index `j` reads `values[j]` when `j < values.len()` and the last value
/// otherwise, so a single value applies to every element. Never empty.
///
/// ```
/// use u_evolve::ops::PerIndex;
///
/// let max = PerIndex::new(vec![10.0, 5.0]).unwrap();
/// assert_eq!(max.get(0), 10.0);
/// assert_eq!(max.get(1), 5.0);
/// assert_eq!(max.get(7), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<T>", into = "Vec<T>", bound = "T: Copy + serde::Serialize + serde::de::DeserializeOwned")
)]
pub struct PerIndex<T> {
    values: Vec<T>,
}

impl<T: Copy> PerIndex<T> {
    /// Wraps `values`.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if `values` is empty.
    pub fn new(values: Vec<T>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::parameter(
                "per-index parameter",
                "at least one value is required",
            ));
        }
        Ok(Self { values })
    }

    /// The same value for every index.
    pub fn splat(value: T) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// Value for element `j`, broadcasting the last value.
    pub fn get(&self, j: usize) -> T {
        self.values[j.min(self.values.len() - 1)]
    }

    /// The stored values.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Applies `f` to every stored value.
    pub fn map_in_place(&mut self, f: impl Fn(T) -> T) {
        for v in &mut self.values {
            *v = f(*v);
        }
    }
}

impl<T: Copy> From<T> for PerIndex<T> {
    fn from(value: T) -> Self {
        Self::splat(value)
    }
}

impl<T: Copy> TryFrom<Vec<T>> for PerIndex<T> {
    type Error = Error;

    fn try_from(values: Vec<T>) -> Result<Self> {
        Self::new(values)
    }
}

impl<T> From<PerIndex<T>> for Vec<T> {
    fn from(p: PerIndex<T>) -> Self {
        p.values
    }
}

/// A [`QuasiRandom`] generator shared between operators.
pub type SharedQuasiRandom = Arc<Mutex<QuasiRandom>>;

/// Creates an undimensioned shared generator.
pub fn shared_quasi_random() -> SharedQuasiRandom {
    Arc::new(Mutex::new(QuasiRandom::new()))
}

/// Locks `qr`, dimensions it to `size` if it has never been dimensioned,
/// and hands it to `f`.
pub(crate) fn with_quasi_random<R: Rng, T>(
    qr: &SharedQuasiRandom,
    size: usize,
    rng: &mut R,
    f: impl FnOnce(&mut QuasiRandom) -> Result<T>,
) -> Result<T> {
    let mut guard = qr.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if guard.dimensionality() == 0 {
        guard.reset(size, rng);
    }
    f(&mut guard)
}

/// Checks that a genotype size is usable for initialization.
pub(crate) fn check_size(size: usize, what: &'static str) -> Result<()> {
    if size == 0 {
        Err(Error::EmptyGenotype(what))
    } else {
        Ok(())
    }
}

/// Checks that two operands have the same length.
pub(crate) fn check_same_len(left: usize, right: usize) -> Result<()> {
    if left != right {
        Err(Error::LengthMismatch { left, right })
    } else {
        Ok(())
    }
}

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
pub(crate) fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.roll_index(n);
    let b = rng.roll_index(n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
