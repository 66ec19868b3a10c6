//! Bit string genotype.

use super::{FloatVector, Genotype};
use crate::decoding::{self, DecodingKey};
use crate::error::{Error, Result};
use std::ops::{Index, IndexMut};

/// A fixed-length vector of bits.
///
/// Encoded content is one `'0'` or `'1'` character per bit. Bit strings can
/// be decoded into a [`FloatVector`] through a slice of [`DecodingKey`]s,
/// either as plain binary or as Gray code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    /// Creates a bit string of `size` bits, all equal to `fill`.
    pub fn new(size: usize, fill: bool) -> Self {
        Self {
            bits: vec![fill; size],
        }
    }

    /// The bits, in order.
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Consumes the genotype and returns its bits.
    pub fn into_inner(self) -> Vec<bool> {
        self.bits
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Decodes the bits as plain binary segments.
    ///
    /// # Errors
    /// Fails if a key is invalid or if the key widths do not sum to the
    /// length of the bit string.
    pub fn decode(&self, keys: &[DecodingKey]) -> Result<FloatVector> {
        decoding::decode(keys, &self.bits).map(FloatVector::from)
    }

    /// Decodes the bits as Gray-coded segments.
    pub fn decode_gray(&self, keys: &[DecodingKey]) -> Result<FloatVector> {
        decoding::decode_gray(keys, &self.bits).map(FloatVector::from)
    }
}

impl Genotype for BitString {
    type Allele = bool;

    const TYPE_NAME: &'static str = "BitString";

    fn alleles(&self) -> &[bool] {
        &self.bits
    }

    fn alleles_mut(&mut self) -> &mut [bool] {
        &mut self.bits
    }

    fn from_alleles(alleles: Vec<bool>) -> Self {
        Self { bits: alleles }
    }

    fn encode_content(&self) -> String {
        self.bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    fn decode_content(content: &str) -> Result<Self> {
        let bits = content
            .trim()
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(Error::MalformedContent {
                    kind: "bit",
                    position,
                    token: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bits })
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl Index<usize> for BitString {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.bits[index]
    }
}

impl IndexMut<usize> for BitString {
    fn index_mut(&mut self, index: usize) -> &mut bool {
        &mut self.bits[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::codec;

    #[test]
    fn test_new_and_fill() {
        let g = BitString::new(5, true);
        assert_eq!(g.len(), 5);
        assert_eq!(g.count_ones(), 5);
        assert_eq!(BitString::new(3, false).count_ones(), 0);
    }

    #[test]
    fn test_content_round_trip() {
        let g = BitString::from(vec![true, false, false, true]);
        assert_eq!(g.encode_content(), "1001");
        assert_eq!(BitString::decode_content("1001").unwrap(), g);
    }

    #[test]
    fn test_rejects_non_bit_characters() {
        let err = BitString::decode_content("10a1").unwrap_err();
        assert_eq!(
            err,
            Error::MalformedContent {
                kind: "bit",
                position: 2,
                token: "a".into()
            }
        );
        assert!(BitString::decode_content("1 0").is_err());
    }

    #[test]
    fn test_tagged_round_trip() {
        let g = BitString::from(vec![false, true, true]);
        let text = codec::encode(&g);
        assert_eq!(text, r#"<Genotype type="BitString" size="3">011</Genotype>"#);
        assert_eq!(codec::decode::<BitString>(&text).unwrap(), g);
    }

    #[test]
    fn test_decode_to_float_vector() {
        let keys = [DecodingKey::new(0.0, 3.0, 2), DecodingKey::new(-1.0, 1.0, 1)];
        let g = BitString::from(vec![true, true, false]);
        let v = g.decode(&keys).unwrap();
        assert_eq!(v.as_slice(), &[3.0, -1.0]);
    }

    #[test]
    fn test_decode_gray_to_float_vector() {
        // Gray 10 -> binary 11 -> 3
        let keys = [DecodingKey::new(0.0, 3.0, 2)];
        let g = BitString::from(vec![true, false]);
        assert_eq!(g.decode_gray(&keys).unwrap().as_slice(), &[3.0]);
        assert_eq!(g.decode(&keys).unwrap().as_slice(), &[2.0]);
    }

    #[test]
    fn test_decode_length_mismatch() {
        let keys = [DecodingKey::new(0.0, 1.0, 4)];
        let g = BitString::new(3, false);
        assert!(matches!(
            g.decode(&keys),
            Err(Error::BitCountMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }
}
