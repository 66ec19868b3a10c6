//! Bit string operators.

use super::{check_size, Initializer, Mutation};
use crate::error::{check_probability, Result};
use crate::genotype::{BitString, Genotype};
use crate::random::Randomizer;
use rand::Rng;

/// Creates bit strings whose bits are independently set with probability
/// `one_pb`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitBitString {
    /// Number of bits.
    pub size: usize,
    /// Probability of each bit being `1`.
    pub one_pb: f64,
}

impl InitBitString {
    /// Fair bits (`one_pb = 0.5`).
    pub fn new(size: usize) -> Self {
        Self { size, one_pb: 0.5 }
    }

    pub fn with_one_pb(mut self, pb: f64) -> Self {
        self.one_pb = pb;
        self
    }
}

impl Initializer<BitString> for InitBitString {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<BitString> {
        check_size(self.size, "BitString")?;
        let bits = (0..self.size)
            .map(|_| rng.roll_uniform() < self.one_pb)
            .collect::<Vec<_>>();
        Ok(BitString::from(bits))
    }

    fn validate(&self) -> Result<()> {
        check_size(self.size, "BitString")?;
        check_probability("one_pb", self.one_pb)
    }
}

/// Flips each bit independently with probability `flip_pb`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipBitMutation {
    pub flip_pb: f64,
}

impl Default for FlipBitMutation {
    fn default() -> Self {
        Self { flip_pb: 0.01 }
    }
}

impl FlipBitMutation {
    pub fn new(flip_pb: f64) -> Self {
        Self { flip_pb }
    }
}

impl Mutation<BitString> for FlipBitMutation {
    fn mutate<R: Rng>(&self, genotype: &mut BitString, rng: &mut R) -> Result<bool> {
        let mut changed = false;
        for j in 0..genotype.len() {
            if rng.roll_uniform() < self.flip_pb {
                genotype[j] = !genotype[j];
                changed = true;
            }
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        check_probability("flip_pb", self.flip_pb)
    }
}
