//! Integer vector genotype, also used for permutations.

use super::codec;
use super::Genotype;
use crate::error::Result;
use std::ops::{Index, IndexMut};

/// A fixed-length vector of integers.
///
/// When every value of `0..n` appears exactly once the vector is a
/// permutation and can be recombined with the operators of
/// [`crate::ops::permutation`]. Those operators assume the property; use
/// [`is_permutation`](IntegerVector::is_permutation) to check it.
///
/// Encoded content is `;`-delimited decimal integers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegerVector {
    values: Vec<i64>,
}

impl IntegerVector {
    /// Creates a vector of `size` copies of `fill`.
    pub fn new(size: usize, fill: i64) -> Self {
        Self {
            values: vec![fill; size],
        }
    }

    /// The identity permutation `[0, 1, ..., n-1]`.
    pub fn identity(n: usize) -> Self {
        Self {
            values: (0..n as i64).collect(),
        }
    }

    /// The values, in order.
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }

    /// Mutable access to the values.
    pub fn as_mut_slice(&mut self) -> &mut [i64] {
        &mut self.values
    }

    /// Consumes the genotype and returns its values.
    pub fn into_inner(self) -> Vec<i64> {
        self.values
    }

    /// Returns `true` if the vector is a bijection on `{0, ..., n-1}`.
    pub fn is_permutation(&self) -> bool {
        let n = self.values.len();
        let mut seen = vec![false; n];
        for &v in &self.values {
            if v < 0 || v as usize >= n || seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        true
    }
}

impl Genotype for IntegerVector {
    type Allele = i64;

    const TYPE_NAME: &'static str = "IntegerVector";

    fn alleles(&self) -> &[i64] {
        &self.values
    }

    fn alleles_mut(&mut self) -> &mut [i64] {
        &mut self.values
    }

    fn from_alleles(alleles: Vec<i64>) -> Self {
        Self { values: alleles }
    }

    fn encode_content(&self) -> String {
        codec::join(&self.values)
    }

    fn decode_content(content: &str) -> Result<Self> {
        Ok(Self {
            values: codec::split_parse(content, "integer")?,
        })
    }
}

impl From<Vec<i64>> for IntegerVector {
    fn from(values: Vec<i64>) -> Self {
        Self { values }
    }
}

impl Index<usize> for IntegerVector {
    type Output = i64;

    fn index(&self, index: usize) -> &i64 {
        &self.values[index]
    }
}

impl IndexMut<usize> for IntegerVector {
    fn index_mut(&mut self, index: usize) -> &mut i64 {
        &mut self.values[index]
    }
}
