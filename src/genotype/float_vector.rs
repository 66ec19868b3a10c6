//! Real-valued vector genotype.

use super::codec;
use super::Genotype;
use crate::error::Result;
use std::ops::{Index, IndexMut};

/// A fixed-length vector of reals.
///
/// Encoded content is `;`-delimited numbers written in their shortest
/// round-trip form.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatVector {
    values: Vec<f64>,
}

impl FloatVector {
    /// Creates a vector of `size` copies of `fill`.
    pub fn new(size: usize, fill: f64) -> Self {
        Self {
            values: vec![fill; size],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl Genotype for FloatVector {
    type Allele = f64;

    const TYPE_NAME: &'static str = "FloatVector";

    fn alleles(&self) -> &[f64] {
        &self.values
    }

    fn alleles_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    fn from_alleles(alleles: Vec<f64>) -> Self {
        Self { values: alleles }
    }

    fn encode_content(&self) -> String {
        codec::join(&self.values)
    }

    fn decode_content(content: &str) -> Result<Self> {
        Ok(Self {
            values: codec::split_parse(content, "real")?,
        })
    }
}

impl From<Vec<f64>> for FloatVector {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl Index<usize> for FloatVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl IndexMut<usize> for FloatVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.values[index]
    }
}
