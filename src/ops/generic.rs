//! Representation-independent operators.
//!
//! These work on any [`Genotype`] through its allele slice, exchanging or
//! relocating elements without looking at their values. When the operands
//! differ in length only the shared prefix takes part.

use super::{Crossover, Mutation};
use crate::error::{check_probability, Result};
use crate::genotype::Genotype;
use crate::random::Randomizer;
use rand::Rng;

/// Exchanges `first[range]` and `second[range]`, returning whether any
/// exchanged pair differed.
fn exchange<G: Genotype>(first: &mut G, second: &mut G, range: std::ops::Range<usize>) -> bool {
    let a = &mut first.alleles_mut()[range.clone()];
    let b = &mut second.alleles_mut()[range];
    let changed = a.iter().zip(b.iter()).any(|(x, y)| x != y);
    a.swap_with_slice(b);
    changed
}

/// One-point crossover: tails after a random cut are exchanged.
///
/// The cut lies in `[1, n-1]` where `n` is the shared length, so each child
/// keeps at least one element of its own. Operands shorter than two
/// elements are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OnePointCrossover;

impl<G: Genotype> Crossover<G> for OnePointCrossover {
    fn mate<R: Rng>(&self, first: &mut G, second: &mut G, rng: &mut R) -> Result<bool> {
        let n = first.len().min(second.len());
        if n < 2 {
            return Ok(false);
        }
        let cut = rng.roll_integer(1, n as i64 - 1) as usize;
        Ok(exchange(first, second, cut..n))
    }
}

/// Two-point crossover: the segment between two random cuts is exchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TwoPointsCrossover;

impl<G: Genotype> Crossover<G> for TwoPointsCrossover {
    fn mate<R: Rng>(&self, first: &mut G, second: &mut G, rng: &mut R) -> Result<bool> {
        let n = first.len().min(second.len());
        if n < 2 {
            return Ok(false);
        }
        let a = rng.roll_integer(0, n as i64) as usize;
        let b = rng.roll_integer(0, n as i64) as usize;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Ok(exchange(first, second, lo..hi))
    }
}

/// Uniform crossover: each position is exchanged independently with
/// probability `distrib_pb`.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformCrossover {
    /// Per-position exchange probability.
    pub distrib_pb: f64,
}

impl Default for UniformCrossover {
    fn default() -> Self {
        Self { distrib_pb: 0.5 }
    }
}

impl UniformCrossover {
    pub fn new(distrib_pb: f64) -> Self {
        Self { distrib_pb }
    }
}

impl<G: Genotype> Crossover<G> for UniformCrossover {
    fn mate<R: Rng>(&self, first: &mut G, second: &mut G, rng: &mut R) -> Result<bool> {
        let n = first.len().min(second.len());
        let mut changed = false;
        for j in 0..n {
            if rng.roll_uniform() < self.distrib_pb {
                changed |= exchange(first, second, j..j + 1);
            }
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        check_probability("distrib_pb", self.distrib_pb)
    }
}

/// Shuffle mutation: each position, with probability `shuffle_pb`, is
/// swapped with a uniformly chosen position.
///
/// Only relocates elements, so permutations stay permutations.
#[derive(Debug, Clone, PartialEq)]
pub struct ShuffleMutation {
    /// Per-position swap probability.
    pub shuffle_pb: f64,
}

impl Default for ShuffleMutation {
    fn default() -> Self {
        Self { shuffle_pb: 0.1 }
    }
}

impl ShuffleMutation {
    pub fn new(shuffle_pb: f64) -> Self {
        Self { shuffle_pb }
    }
}

impl<G: Genotype> Mutation<G> for ShuffleMutation {
    fn mutate<R: Rng>(&self, genotype: &mut G, rng: &mut R) -> Result<bool> {
        let n = genotype.len();
        if n < 2 {
            return Ok(false);
        }
        let mut changed = false;
        for j in 0..n {
            if rng.roll_uniform() < self.shuffle_pb {
                let k = rng.roll_index(n);
                let alleles = genotype.alleles_mut();
                changed |= alleles[j] != alleles[k];
                alleles.swap(j, k);
            }
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        check_probability("shuffle_pb", self.shuffle_pb)
    }
}
