//! Integer vector initialization and mutation operators.
//!
//! # Initialization
//!
//! - [`InitIntegerUniform`]: each value uniform in `[min, max]`
//! - [`InitIntegerQr`]: same bounds, drawn from a quasi-random sequence
//! - [`InitPermutation`]: a uniformly random permutation of `0..n`
//!
//! # Mutation
//!
//! - [`UniformIntMutation`]: per-element redraw within bounds
//! - [`ReverseSequenceMutation`]: reverse a random segment (2-opt) — O(n)
//! - [`MoveSequenceMutation`]: relocate a random block, keeping the order of
//!   everything else — O(n)
//!
//! The last two only relocate values and therefore preserve permutations.

use super::{
    check_size, random_segment, with_quasi_random, Initializer, Mutation, PerIndex,
    SharedQuasiRandom,
};
use crate::error::{check_probability, Error, Result};
use crate::genotype::IntegerVector;
use crate::random::Randomizer;
use rand::seq::SliceRandom;
use rand::Rng;

fn check_bounds(min: &PerIndex<i64>, max: &PerIndex<i64>) -> Result<()> {
    let span = min.as_slice().len().max(max.as_slice().len());
    for j in 0..span {
        if min.get(j) > max.get(j) {
            return Err(Error::parameter(
                "min/max",
                format!("min {} exceeds max {} at index {j}", min.get(j), max.get(j)),
            ));
        }
    }
    Ok(())
}

/// Creates integer vectors with values uniform in `[min[j], max[j]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitIntegerUniform {
    pub size: usize,
    /// Inclusive lower bounds, broadcast from the last value.
    pub min: PerIndex<i64>,
    /// Inclusive upper bounds, broadcast from the last value.
    pub max: PerIndex<i64>,
}

impl InitIntegerUniform {
    pub fn new(size: usize, min: PerIndex<i64>, max: PerIndex<i64>) -> Self {
        Self { size, min, max }
    }
}

impl Initializer<IntegerVector> for InitIntegerUniform {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<IntegerVector> {
        check_size(self.size, "IntegerVector")?;
        let values = (0..self.size)
            .map(|j| rng.roll_integer(self.min.get(j), self.max.get(j)))
            .collect::<Vec<_>>();
        Ok(IntegerVector::from(values))
    }

    fn validate(&self) -> Result<()> {
        check_size(self.size, "IntegerVector")?;
        check_bounds(&self.min, &self.max)
    }
}

/// Creates integer vectors from consecutive points of a shared
/// quasi-random sequence, mapped onto `[min[j], max[j]]`.
#[derive(Debug, Clone)]
pub struct InitIntegerQr {
    pub size: usize,
    pub min: PerIndex<i64>,
    pub max: PerIndex<i64>,
    pub qr: SharedQuasiRandom,
}

impl InitIntegerQr {
    pub fn new(size: usize, min: PerIndex<i64>, max: PerIndex<i64>, qr: SharedQuasiRandom) -> Self {
        Self {
            size,
            min,
            max,
            qr,
        }
    }
}

impl Initializer<IntegerVector> for InitIntegerQr {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<IntegerVector> {
        check_size(self.size, "IntegerVector")?;
        let mut values = vec![0; self.size];
        with_quasi_random(&self.qr, self.size, rng, |qr| {
            qr.integer_sequence(&mut values, &self.min, &self.max)
        })?;
        Ok(IntegerVector::from(values))
    }

    fn validate(&self) -> Result<()> {
        check_size(self.size, "IntegerVector")?;
        check_bounds(&self.min, &self.max)
    }
}

/// Creates uniformly random permutations of `0..size`.
#[derive(Debug, Clone, PartialEq)]
pub struct InitPermutation {
    pub size: usize,
}

impl InitPermutation {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Initializer<IntegerVector> for InitPermutation {
    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<IntegerVector> {
        check_size(self.size, "IntegerVector")?;
        let mut values: Vec<i64> = (0..self.size as i64).collect();
        values.shuffle(rng);
        Ok(IntegerVector::from(values))
    }

    fn validate(&self) -> Result<()> {
        check_size(self.size, "IntegerVector")
    }
}

/// Redraws each element, with probability `int_mutate_pb`, uniformly in
/// `[min[j], max[j]]`.
///
/// The redrawn value may equal the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformIntMutation {
    /// Per-element redraw probability.
    pub int_mutate_pb: f64,
    pub min: PerIndex<i64>,
    pub max: PerIndex<i64>,
}

impl UniformIntMutation {
    pub fn new(int_mutate_pb: f64, min: PerIndex<i64>, max: PerIndex<i64>) -> Self {
        Self {
            int_mutate_pb,
            min,
            max,
        }
    }
}

impl Mutation<IntegerVector> for UniformIntMutation {
    fn mutate<R: Rng>(&self, genotype: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        let mut changed = false;
        for j in 0..genotype.as_slice().len() {
            if rng.roll_uniform() < self.int_mutate_pb {
                let value = rng.roll_integer(self.min.get(j), self.max.get(j));
                changed |= genotype[j] != value;
                genotype[j] = value;
            }
        }
        Ok(changed)
    }

    fn validate(&self) -> Result<()> {
        check_probability("int_mutate_pb", self.int_mutate_pb)?;
        check_bounds(&self.min, &self.max)
    }
}

/// Reverses the closed range between two random indices.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReverseSequenceMutation;

impl Mutation<IntegerVector> for ReverseSequenceMutation {
    fn mutate<R: Rng>(&self, genotype: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        let n = genotype.as_slice().len();
        if n < 2 {
            return Ok(false);
        }
        let (start, end) = random_segment(n, rng);
        let segment = &mut genotype.as_mut_slice()[start..=end];
        let changed = segment.iter().ne(segment.iter().rev());
        segment.reverse();
        Ok(changed)
    }
}

/// Moves a random block `[a, b]` so that it starts at a random position
/// `c`, shifting the displaced elements to the other side of the block.
///
/// Both the block and the displaced elements keep their relative order.
/// The move is a single rotation of the range spanning the old and the new
/// block positions. Nothing happens when `c == a` or when the block covers
/// the whole vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveSequenceMutation;

impl MoveSequenceMutation {
    /// Moves `[a, b]` to start at `c`. `c + (b - a)` must stay in bounds.
    fn apply(values: &mut [i64], a: usize, b: usize, c: usize) -> bool {
        let len = b - a + 1;
        if c < a {
            let range = &mut values[c..=b];
            let before = range.to_vec();
            range.rotate_left(a - c);
            before != range
        } else if c > a {
            let range = &mut values[a..c + len];
            let before = range.to_vec();
            range.rotate_left(len);
            before != range
        } else {
            false
        }
    }
}

impl Mutation<IntegerVector> for MoveSequenceMutation {
    fn mutate<R: Rng>(&self, genotype: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        let n = genotype.as_slice().len();
        if n < 2 {
            return Ok(false);
        }
        let (a, b) = random_segment(n, rng);
        let len = b - a + 1;
        if len == n {
            return Ok(false);
        }
        let c = rng.roll_integer(0, (n - len) as i64) as usize;
        Ok(Self::apply(genotype.as_mut_slice(), a, b, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::shared_quasi_random;
    use crate::random::create_rng;

    #[test]
    fn test_init_uniform_bounds_broadcast() {
        let mut rng = create_rng(42);
        let op = InitIntegerUniform::new(
            6,
            PerIndex::new(vec![0, 10]).unwrap(),
            PerIndex::new(vec![1, 12]).unwrap(),
        );
        for _ in 0..100 {
            let g = op.initialize(&mut rng).unwrap();
            assert!((0..=1).contains(&g[0]));
            for j in 1..6 {
                assert!((10..=12).contains(&g[j]), "g[{j}] = {}", g[j]);
            }
        }
    }

    #[test]
    fn test_init_uniform_validate() {
        assert!(InitIntegerUniform::new(3, PerIndex::splat(5), PerIndex::splat(4)).validate().is_err());
        assert!(InitIntegerUniform::new(0, PerIndex::splat(0), PerIndex::splat(4)).validate().is_err());
        assert!(InitIntegerUniform::new(3, PerIndex::splat(0), PerIndex::splat(4)).validate().is_ok());
    }

    #[test]
    fn test_init_permutation() {
        let mut rng = create_rng(42);
        let op = InitPermutation::new(12);
        let first = op.initialize(&mut rng).unwrap();
        assert!(first.is_permutation());
        let distinct = (0..20)
            .map(|_| op.initialize(&mut rng).unwrap())
            .any(|g| g != first);
        assert!(distinct);
        assert!(InitPermutation::new(0).initialize(&mut rng).is_err());
    }

    #[test]
    fn test_init_qr_bounds() {
        let mut rng = create_rng(42);
        let qr = shared_quasi_random();
        let op = InitIntegerQr::new(4, PerIndex::splat(-2), PerIndex::splat(2), qr.clone());
        for _ in 0..50 {
            let g = op.initialize(&mut rng).unwrap();
            assert!(g.as_slice().iter().all(|v| (-2..=2).contains(v)));
        }
        assert_eq!(qr.lock().unwrap().dimensionality(), 4);
    }

    #[test]
    fn test_uniform_mutation_bounds() {
        let mut rng = create_rng(42);
        let op = UniformIntMutation::new(1.0, PerIndex::new(vec![0]).unwrap(), PerIndex::splat(9));
        for _ in 0..100 {
            let mut g = IntegerVector::new(10, 100);
            assert!(op.mutate(&mut g, &mut rng).unwrap());
            assert!(g.as_slice().iter().all(|v| (0..=9).contains(v)), "{g:?}");
        }
    }

    #[test]
    fn test_uniform_mutation_zero_probability() {
        let mut rng = create_rng(42);
        let op = UniformIntMutation::new(0.0, PerIndex::splat(0), PerIndex::splat(9));
        let mut g = IntegerVector::new(10, 100);
        assert!(!op.mutate(&mut g, &mut rng).unwrap());
        assert_eq!(g, IntegerVector::new(10, 100));
    }

    #[test]
    fn test_reverse_preserves_permutation() {
        let mut rng = create_rng(42);
        let mut changed_once = false;
        for _ in 0..100 {
            let mut g = IntegerVector::identity(10);
            changed_once |= ReverseSequenceMutation.mutate(&mut g, &mut rng).unwrap();
            assert!(g.is_permutation());
        }
        assert!(changed_once);
    }

    #[test]
    fn test_reverse_is_a_single_reversal() {
        let mut rng = create_rng(5);
        for _ in 0..50 {
            let mut g = IntegerVector::identity(8);
            ReverseSequenceMutation.mutate(&mut g, &mut rng).unwrap();
            let moved: Vec<usize> = (0..8).filter(|&j| g[j] != j as i64).collect();
            if let (Some(&lo), Some(&hi)) = (moved.first(), moved.last()) {
                for j in lo..=hi {
                    assert_eq!(g[j], (lo + hi - j) as i64);
                }
            }
        }
    }

    #[test]
    fn test_move_block_left() {
        let mut v = vec![0, 1, 2, 3, 4, 5];
        // Block [3, 4] moved to start at 1.
        assert!(MoveSequenceMutation::apply(&mut v, 3, 4, 1));
        assert_eq!(v, vec![0, 3, 4, 1, 2, 5]);
    }

    #[test]
    fn test_move_block_right() {
        let mut v = vec![0, 1, 2, 3, 4, 5];
        // Block [1, 2] moved to start at 3.
        assert!(MoveSequenceMutation::apply(&mut v, 1, 2, 3));
        assert_eq!(v, vec![0, 3, 4, 1, 2, 5]);
    }

    #[test]
    fn test_move_to_same_position_is_noop() {
        let mut v = vec![0, 1, 2, 3];
        assert!(!MoveSequenceMutation::apply(&mut v, 1, 2, 1));
        assert_eq!(v, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_move_preserves_permutation() {
        let mut rng = create_rng(42);
        for _ in 0..200 {
            let mut g = IntegerVector::identity(9);
            MoveSequenceMutation.mutate(&mut g, &mut rng).unwrap();
            assert!(g.is_permutation(), "{g:?}");
        }
    }

    #[test]
    fn test_short_vectors_unchanged() {
        let mut rng = create_rng(42);
        let mut g = IntegerVector::from(vec![7]);
        assert!(!ReverseSequenceMutation.mutate(&mut g, &mut rng).unwrap());
        assert!(!MoveSequenceMutation.mutate(&mut g, &mut rng).unwrap());
        assert_eq!(g.as_slice(), &[7]);
    }
}
