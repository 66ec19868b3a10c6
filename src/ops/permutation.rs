//! Permutation-preserving crossover operators.
//!
//! Operators for permutation-encoded [`IntegerVector`]s. Both operands are
//! recombined in place. Given two valid permutations of `0..n` every
//! operator here yields two valid permutations. Inputs that are not
//! permutations are **not** checked: values outside `0..n` make the
//! position-table operators (CX, PMX, OX, NWOX, UPMX, non-Abelian) panic on
//! an out-of-bounds index, and other invalid inputs give unspecified
//! results.
//!
//! # Operators
//!
//! - [`cycle_crossover`] (CX): Oliver et al. (1987) — preserves absolute positions
//! - [`pmx_crossover`] (PMX): Goldberg & Lingle (1985) — exchanges a segment via value mapping
//! - [`order_crossover`] (OX): Davis (1985) — preserves relative order, wraps after the segment
//! - [`nwox_crossover`] (NWOX): Cicirello (2006) — OX without wrap-around
//! - [`upmx_crossover`] (UPMX): Cicirello & Smith (2000) — PMX on random positions
//! - [`non_abelian_crossover`]: functional composition of the two permutations
//!
//! [`IndicesCrossover`] is not permutation-specific: it redistributes the
//! values of two index sets between two children.
//!
//! # References
//!
//! - Oliver, Smith & Holland (1987), "A Study of Permutation Crossover Operators on the TSP"
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Cicirello (2006), "Non-Wrapping Order Crossover: An Order Preserving Crossover Operator
//!   that Respects Absolute Position"
//! - Cicirello & Smith (2000), "Modeling GA Performance for Control Parameter Optimization"

use super::{check_same_len, random_segment, Crossover};
use crate::error::{check_probability, Result};
use crate::genotype::IntegerVector;
use crate::random::Randomizer;
use rand::Rng;
use std::collections::HashSet;

// ============================================================================
// Crossover algorithms on slices
// ============================================================================

/// Cycle Crossover (CX).
///
/// # Algorithm
///
/// 1. Starting at position 0, trace the cycle `j -> position in first of second[j]`
///    until it closes
/// 2. Positions on the cycle keep their values
/// 3. All other positions exchange values between the two operands
///
/// # Complexity
/// O(n) time, O(n) space
pub fn cycle_crossover(first: &mut [i64], second: &mut [i64]) -> bool {
    let n = first.len();
    if n == 0 {
        return false;
    }

    let mut position = vec![0usize; n];
    for (i, &v) in first.iter().enumerate() {
        position[v as usize] = i;
    }

    let mut on_cycle = vec![false; n];
    let mut j = 0;
    while !on_cycle[j] {
        on_cycle[j] = true;
        j = position[second[j] as usize];
    }

    let mut changed = false;
    for j in (0..n).filter(|&j| !on_cycle[j]) {
        changed |= first[j] != second[j];
        std::mem::swap(&mut first[j], &mut second[j]);
    }
    changed
}

/// Partially Matched Crossover (PMX) with random cuts.
///
/// See [`pmx_with_cuts`].
pub fn pmx_crossover<R: Rng>(first: &mut [i64], second: &mut [i64], rng: &mut R) -> bool {
    let n = first.len();
    if n < 2 {
        return false;
    }
    let (start, end) = random_segment(n, rng);
    pmx_with_cuts(first, second, start, end)
}

/// Partially Matched Crossover (PMX) over the segment `[start, end]`.
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// For each position `j` of the segment, with `x` and `y` the values the
/// parents originally held at `j`, the values `x` and `y` exchange places
/// inside `first`, and likewise inside `second`. Every step is a swap, so
/// both operands stay permutations.
///
/// # Complexity
/// O(n) time with inverse-position tables, O(n) space
pub fn pmx_with_cuts(first: &mut [i64], second: &mut [i64], start: usize, end: usize) -> bool {
    let segment: Vec<(i64, i64)> = (start..=end).map(|j| (first[j], second[j])).collect();
    let mut swapper = MatchedSwapper::new(first, second);
    let mut changed = false;
    for (x, y) in segment {
        changed |= swapper.exchange_values(first, second, x, y);
    }
    changed
}

/// Uniform Partially Matched Crossover (UPMX).
///
/// At each position `j`, independently with probability `distrib_pb`, the
/// values currently held at `j` exchange places inside both operands, so
/// `first[j]` and `second[j]` are swapped while both stay permutations.
pub fn upmx_crossover<R: Rng>(
    first: &mut [i64],
    second: &mut [i64],
    distrib_pb: f64,
    rng: &mut R,
) -> bool {
    let mut swapper = MatchedSwapper::new(first, second);
    let mut changed = false;
    for j in 0..first.len() {
        if rng.roll_uniform() < distrib_pb {
            let (x, y) = (first[j], second[j]);
            changed |= swapper.exchange_values(first, second, x, y);
        }
    }
    changed
}

/// Inverse-position tables for both operands of a PMX-style exchange.
struct MatchedSwapper {
    position_first: Vec<usize>,
    position_second: Vec<usize>,
}

impl MatchedSwapper {
    fn new(first: &[i64], second: &[i64]) -> Self {
        let n = first.len();
        let mut position_first = vec![0; n];
        let mut position_second = vec![0; n];
        for i in 0..n {
            position_first[first[i] as usize] = i;
            position_second[second[i] as usize] = i;
        }
        Self {
            position_first,
            position_second,
        }
    }

    /// Exchanges the positions of `x` and `y` inside both operands.
    fn exchange_values(&mut self, first: &mut [i64], second: &mut [i64], x: i64, y: i64) -> bool {
        if x == y {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        first.swap(self.position_first[x], self.position_first[y]);
        second.swap(self.position_second[x], self.position_second[y]);
        self.position_first.swap(x, y);
        self.position_second.swap(x, y);
        true
    }
}

/// Order Crossover (OX) with random cuts.
///
/// See [`ox_with_cuts`].
pub fn order_crossover<R: Rng>(first: &mut [i64], second: &mut [i64], rng: &mut R) -> bool {
    let n = first.len();
    if n < 2 {
        return false;
    }
    let (start, end) = random_segment(n, rng);
    ox_with_cuts(first, second, start, end)
}

/// Order Crossover (OX) over the segment `[start, end]`.
///
/// # Algorithm (Davis, 1985)
///
/// 1. The segments `[start, end]` are exchanged between the operands
/// 2. Each operand's remaining positions, starting right after `end` and
///    wrapping around, are filled with its own values in their original
///    order (also read from `end + 1`, wrapping), skipping those now present
///    in the received segment
///
/// # Complexity
/// O(n) time, O(n) space
pub fn ox_with_cuts(first: &mut [i64], second: &mut [i64], start: usize, end: usize) -> bool {
    let child1 = ox_build_child(second, first, start, end);
    let child2 = ox_build_child(first, second, start, end);
    commit(first, second, child1, child2)
}

/// Build one OX child: copy segment from `template`, fill from `donor`.
fn ox_build_child(template: &[i64], donor: &[i64], start: usize, end: usize) -> Vec<i64> {
    let n = template.len();
    let mut child = template.to_vec();
    let mut in_segment = vec![false; n];

    // Step 1: Segment from template is already in place
    for &v in &template[start..=end] {
        in_segment[v as usize] = true;
    }

    // Step 2: Fill from donor, starting after segment end, wrapping around
    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let val = donor[(end + 1 + offset) % n];
        if !in_segment[val as usize] {
            child[pos] = val;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Non-Wrapping Order Crossover (NWOX) with random cuts.
///
/// See [`nwox_with_cuts`].
pub fn nwox_crossover<R: Rng>(first: &mut [i64], second: &mut [i64], rng: &mut R) -> bool {
    let n = first.len();
    if n < 2 {
        return false;
    }
    let (start, end) = random_segment(n, rng);
    nwox_with_cuts(first, second, start, end)
}

/// Non-Wrapping Order Crossover (NWOX) over the segment `[start, end]`.
///
/// # Algorithm (Cicirello, 2006)
///
/// Like OX, but each operand's own values (minus the received segment) are
/// laid out left to right from position 0, skipping the segment, so values
/// tend to keep their absolute positions.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn nwox_with_cuts(first: &mut [i64], second: &mut [i64], start: usize, end: usize) -> bool {
    let child1 = nwox_build_child(second, first, start, end);
    let child2 = nwox_build_child(first, second, start, end);
    commit(first, second, child1, child2)
}

fn nwox_build_child(template: &[i64], donor: &[i64], start: usize, end: usize) -> Vec<i64> {
    let n = template.len();
    let mut child = template.to_vec();
    let mut in_segment = vec![false; n];
    for &v in &template[start..=end] {
        in_segment[v as usize] = true;
    }

    let holes = (0..start).chain(end + 1..n);
    let kept = donor.iter().filter(|&&v| !in_segment[v as usize]);
    for (pos, &val) in holes.zip(kept) {
        child[pos] = val;
    }
    child
}

/// Non-Abelian group crossover.
///
/// Treats both operands as functions on `0..n` and replaces them with
/// their compositions: `first' = second ∘ first` and
/// `second' = first ∘ second`.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn non_abelian_crossover(first: &mut [i64], second: &mut [i64]) -> bool {
    let child1: Vec<i64> = first.iter().map(|&v| second[v as usize]).collect();
    let child2: Vec<i64> = second.iter().map(|&v| first[v as usize]).collect();
    commit(first, second, child1, child2)
}

/// Writes the children back, reporting whether anything changed.
fn commit(first: &mut [i64], second: &mut [i64], child1: Vec<i64>, child2: Vec<i64>) -> bool {
    let changed = first != child1.as_slice() || second != child2.as_slice();
    first.copy_from_slice(&child1);
    second.copy_from_slice(&child2);
    changed
}

// ============================================================================
// Operator structs
// ============================================================================

/// [`Crossover`] wrapper for [`cycle_crossover`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleCrossover;

impl Crossover<IntegerVector> for CycleCrossover {
    fn mate<R: Rng>(&self, first: &mut IntegerVector, second: &mut IntegerVector, _rng: &mut R) -> Result<bool> {
        check_same_len(first.as_slice().len(), second.as_slice().len())?;
        Ok(cycle_crossover(first.as_mut_slice(), second.as_mut_slice()))
    }
}

/// [`Crossover`] wrapper for [`pmx_crossover`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PmxCrossover;

impl Crossover<IntegerVector> for PmxCrossover {
    fn mate<R: Rng>(&self, first: &mut IntegerVector, second: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        check_same_len(first.as_slice().len(), second.as_slice().len())?;
        Ok(pmx_crossover(first.as_mut_slice(), second.as_mut_slice(), rng))
    }
}

/// [`Crossover`] wrapper for [`order_crossover`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderCrossover;

impl Crossover<IntegerVector> for OrderCrossover {
    fn mate<R: Rng>(&self, first: &mut IntegerVector, second: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        check_same_len(first.as_slice().len(), second.as_slice().len())?;
        Ok(order_crossover(first.as_mut_slice(), second.as_mut_slice(), rng))
    }
}

/// [`Crossover`] wrapper for [`nwox_crossover`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NwoxCrossover;

impl Crossover<IntegerVector> for NwoxCrossover {
    fn mate<R: Rng>(&self, first: &mut IntegerVector, second: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        check_same_len(first.as_slice().len(), second.as_slice().len())?;
        Ok(nwox_crossover(first.as_mut_slice(), second.as_mut_slice(), rng))
    }
}

/// [`Crossover`] wrapper for [`upmx_crossover`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpmxCrossover {
    /// Probability of exchanging each position.
    pub distrib_pb: f64,
}

impl Default for UpmxCrossover {
    fn default() -> Self {
        Self { distrib_pb: 0.25 }
    }
}

impl UpmxCrossover {
    pub fn new(distrib_pb: f64) -> Self {
        Self { distrib_pb }
    }
}

impl Crossover<IntegerVector> for UpmxCrossover {
    fn mate<R: Rng>(&self, first: &mut IntegerVector, second: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        check_same_len(first.as_slice().len(), second.as_slice().len())?;
        Ok(upmx_crossover(
            first.as_mut_slice(),
            second.as_mut_slice(),
            self.distrib_pb,
            rng,
        ))
    }

    fn validate(&self) -> Result<()> {
        check_probability("distrib_pb", self.distrib_pb)
    }
}

/// [`Crossover`] wrapper for [`non_abelian_crossover`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NonAbelianCrossover;

impl Crossover<IntegerVector> for NonAbelianCrossover {
    fn mate<R: Rng>(&self, first: &mut IntegerVector, second: &mut IntegerVector, _rng: &mut R) -> Result<bool> {
        check_same_len(first.as_slice().len(), second.as_slice().len())?;
        Ok(non_abelian_crossover(first.as_mut_slice(), second.as_mut_slice()))
    }
}

/// Redistributes the values of two index sets between two children.
///
/// Values are drawn one at a time from the unconsumed remainder of either
/// parent, choosing a parent with probability proportional to its
/// remaining length. A value held by both parents is given to both
/// children the first time it is drawn and skipped the second time. Any
/// other value goes to a child that does not hold it yet and has room
/// left after reserving a slot for every shared value still to come, by
/// coin flip when both qualify. Children keep their parents' sizes, and
/// together they hold exactly the values of both parents.
///
/// Parents are expected to hold no duplicates. Under that precondition the
/// children hold no duplicates either; otherwise a repeated value may land
/// twice in the same child.
///
/// Parents may differ in length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicesCrossover;

impl IndicesCrossover {
    /// Marks the first occurrence of every value that `other` also holds.
    fn shared_mask(values: &[i64], other: &HashSet<i64>) -> Vec<bool> {
        let mut seen = HashSet::with_capacity(values.len());
        values
            .iter()
            .map(|v| other.contains(v) && seen.insert(*v))
            .collect()
    }

    fn merge<R: Rng>(first: &[i64], second: &[i64], rng: &mut R) -> (Vec<i64>, Vec<i64>) {
        let (n1, n2) = (first.len(), second.len());
        let parents = [first, second];
        let shared = [
            Self::shared_mask(first, &second.iter().copied().collect()),
            Self::shared_mask(second, &first.iter().copied().collect()),
        ];
        // Slots both children keep free for shared values not yet placed.
        let mut pending = shared[0].iter().filter(|&&s| s).count();

        let capacity = [n1, n2];
        let mut children = [Vec::with_capacity(n1), Vec::with_capacity(n2)];
        let mut held = [HashSet::with_capacity(n1), HashSet::with_capacity(n2)];
        let mut next = [0, 0];
        while next[0] < n1 || next[1] < n2 {
            let (rest1, rest2) = (n1 - next[0], n2 - next[1]);
            let p = if rng.roll_uniform() * ((rest1 + rest2) as f64) < rest1 as f64 {
                0
            } else {
                1
            };
            let i = next[p];
            next[p] += 1;
            let value = parents[p][i];

            if shared[p][i] {
                if !held[0].contains(&value) || !held[1].contains(&value) {
                    for k in 0..2 {
                        children[k].push(value);
                        held[k].insert(value);
                    }
                    pending -= 1;
                }
                continue;
            }

            let room = [0, 1].map(|k| children[k].len() + pending < capacity[k]);
            let fits = [0, 1].map(|k| room[k] && !held[k].contains(&value));
            let k = match fits {
                [true, true] => usize::from(rng.roll_uniform() >= 0.5),
                [true, false] => 0,
                [false, true] => 1,
                [false, false] => usize::from(!room[0]),
            };
            children[k].push(value);
            held[k].insert(value);
        }
        let [child1, child2] = children;
        (child1, child2)
    }
}

impl Crossover<IntegerVector> for IndicesCrossover {
    fn mate<R: Rng>(&self, first: &mut IntegerVector, second: &mut IntegerVector, rng: &mut R) -> Result<bool> {
        let (child1, child2) = Self::merge(first.as_slice(), second.as_slice(), rng);
        let changed = child1 != first.as_slice() || child2 != second.as_slice();
        first.as_mut_slice().copy_from_slice(&child1);
        second.as_mut_slice().copy_from_slice(&child2);
        Ok(changed)
    }
}

// ============================================================================
// Tests
// ============================================================================
