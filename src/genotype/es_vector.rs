//! Evolution strategy vector: reals paired with their own mutation step sizes.

use super::codec;
use super::Genotype;
use crate::error::{Error, Result};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One gene of an [`EsVector`]: a value and its mutation step size.
///
/// Pairs order by `value` first, then by `strategy`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EsPair {
    pub value: f64,
    /// Standard deviation used when mutating `value`. Never negative.
    pub strategy: f64,
}

impl EsPair {
    pub fn new(value: f64, strategy: f64) -> Self {
        Self { value, strategy }
    }
}

impl fmt::Display for EsPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.strategy)
    }
}

impl FromStr for EsPair {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        let (value, strategy) = s.split_once('/').ok_or(())?;
        let value = value.trim().parse().map_err(|_| ())?;
        let strategy: f64 = strategy.trim().parse().map_err(|_| ())?;
        if strategy < 0.0 || strategy.is_nan() {
            return Err(());
        }
        Ok(Self { value, strategy })
    }
}

/// A fixed-length vector of [`EsPair`]s.
///
/// Encoded content is `value/strategy` pairs joined by `;`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EsVector {
    pairs: Vec<EsPair>,
}

impl EsVector {
    /// Creates a vector of `size` copies of `fill`.
    pub fn new(size: usize, fill: EsPair) -> Self {
        Self {
            pairs: vec![fill; size],
        }
    }

    pub fn as_slice(&self) -> &[EsPair] {
        &self.pairs
    }

    pub fn as_mut_slice(&mut self) -> &mut [EsPair] {
        &mut self.pairs
    }

    /// The object-variable part, without strategy parameters.
    pub fn values(&self) -> Vec<f64> {
        self.pairs.iter().map(|p| p.value).collect()
    }
}

impl Genotype for EsVector {
    type Allele = EsPair;

    const TYPE_NAME: &'static str = "ESVector";

    fn alleles(&self) -> &[EsPair] {
        &self.pairs
    }

    fn alleles_mut(&mut self) -> &mut [EsPair] {
        &mut self.pairs
    }

    fn from_alleles(alleles: Vec<EsPair>) -> Self {
        Self { pairs: alleles }
    }

    fn encode_content(&self) -> String {
        codec::join(&self.pairs)
    }

    fn decode_content(content: &str) -> Result<Self> {
        let pairs = codec::split_parse::<EsPair>(content, "ES pair").map_err(|e| match e {
            Error::MalformedContent {
                position, token, ..
            } => Error::MalformedContent {
                kind: "ES pair (value/strategy, strategy >= 0)",
                position,
                token,
            },
            other => other,
        })?;
        Ok(Self { pairs })
    }
}

impl From<Vec<EsPair>> for EsVector {
    fn from(pairs: Vec<EsPair>) -> Self {
        Self { pairs }
    }
}

impl Index<usize> for EsVector {
    type Output = EsPair;

    fn index(&self, index: usize) -> &EsPair {
        &self.pairs[index]
    }
}

impl IndexMut<usize> for EsVector {
    fn index_mut(&mut self, index: usize) -> &mut EsPair {
        &mut self.pairs[index]
    }
}
