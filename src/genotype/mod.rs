//! Genotype representations.
//!
//! Every representation is a fixed-length sequence of one allele kind and
//! implements [`Genotype`], which gives generic operators uniform access to
//! size, element swap, equality, lexicographic ordering, and the encoded
//! string form.
//!
//! | Type | Allele | Type name |
//! |---|---|---|
//! | [`BitString`] | `bool` | `BitString` |
//! | [`IntegerVector`] | `i64` | `IntegerVector` |
//! | [`FloatVector`] | `f64` | `FloatVector` |
//! | [`EsVector`] | [`EsPair`] | `ESVector` |
//!
//! [`AnyGenotype`] is the closed sum of the four, used where the concrete
//! representation is only known at read time.

mod bit_string;
pub mod codec;
mod es_vector;
mod float_vector;
mod integer_vector;

pub use bit_string::BitString;
pub use es_vector::{EsPair, EsVector};
pub use float_vector::FloatVector;
pub use integer_vector::IntegerVector;

use crate::error::{Error, Result};
use std::fmt::Debug;

/// Uniform capability set of a genotype.
///
/// Implementors only provide slice access, construction from alleles, and
/// the content codec; the rest has default implementations shared by all
/// representations.
pub trait Genotype: Clone + Debug + PartialEq + Send + Sync {
    /// The element kind.
    type Allele: Copy + PartialOrd + Debug + Send + Sync;

    /// Registered type name, written in the `type` attribute.
    const TYPE_NAME: &'static str;

    /// Read access to the elements.
    fn alleles(&self) -> &[Self::Allele];

    /// Write access to the elements. The length cannot change through it.
    fn alleles_mut(&mut self) -> &mut [Self::Allele];

    /// Builds a genotype owning `alleles`.
    fn from_alleles(alleles: Vec<Self::Allele>) -> Self;

    /// Writes the elements as representation-specific content.
    fn encode_content(&self) -> String;

    /// Parses content produced by [`encode_content`](Genotype::encode_content).
    fn decode_content(content: &str) -> Result<Self>;

    /// Number of elements.
    fn len(&self) -> usize {
        self.alleles().len()
    }

    /// Returns `true` when the genotype has no elements.
    fn is_empty(&self) -> bool {
        self.alleles().is_empty()
    }

    /// Exchanges the elements at `i` and `j`.
    ///
    /// # Errors
    /// [`Error::IndexOutOfBounds`] if either index is past the end.
    fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let len = self.len();
        for index in [i, j] {
            if index >= len {
                return Err(Error::IndexOutOfBounds { index, len });
            }
        }
        self.alleles_mut().swap(i, j);
        Ok(())
    }

    /// Element-wise equality. Genotypes of different sizes are never equal.
    fn is_equal(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .alleles()
                .iter()
                .zip(other.alleles())
                .all(|(a, b)| a == b)
    }

    /// Lexicographic order over the shared prefix.
    ///
    /// When the shared prefix is equal the result is `false`, whatever the
    /// sizes.
    fn is_less(&self, other: &Self) -> bool {
        for (a, b) in self.alleles().iter().zip(other.alleles()) {
            if a < b {
                return true;
            }
            if b < a {
                return false;
            }
        }
        false
    }
}

/// A genotype of any supported representation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnyGenotype {
    BitString(BitString),
    IntegerVector(IntegerVector),
    FloatVector(FloatVector),
    EsVector(EsVector),
}

impl AnyGenotype {
    /// Registered type name of the wrapped representation.
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyGenotype::BitString(_) => BitString::TYPE_NAME,
            AnyGenotype::IntegerVector(_) => IntegerVector::TYPE_NAME,
            AnyGenotype::FloatVector(_) => FloatVector::TYPE_NAME,
            AnyGenotype::EsVector(_) => EsVector::TYPE_NAME,
        }
    }

    /// Number of elements of the wrapped genotype.
    pub fn len(&self) -> usize {
        match self {
            AnyGenotype::BitString(g) => g.len(),
            AnyGenotype::IntegerVector(g) => g.len(),
            AnyGenotype::FloatVector(g) => g.len(),
            AnyGenotype::EsVector(g) => g.len(),
        }
    }

    /// Returns `true` when the wrapped genotype has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swaps two elements of the wrapped genotype.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        match self {
            AnyGenotype::BitString(g) => g.swap(i, j),
            AnyGenotype::IntegerVector(g) => g.swap(i, j),
            AnyGenotype::FloatVector(g) => g.swap(i, j),
            AnyGenotype::EsVector(g) => g.swap(i, j),
        }
    }

    /// Encodes the wrapped genotype as a tagged element.
    pub fn encode(&self) -> String {
        match self {
            AnyGenotype::BitString(g) => codec::encode(g),
            AnyGenotype::IntegerVector(g) => codec::encode(g),
            AnyGenotype::FloatVector(g) => codec::encode(g),
            AnyGenotype::EsVector(g) => codec::encode(g),
        }
    }

    /// Reads a tagged element, dispatching on its `type` attribute.
    ///
    /// Unlike [`codec::decode`], the attribute is mandatory here since it is
    /// the only way to pick the representation.
    pub fn decode(text: &str) -> Result<Self> {
        let element = codec::parse_element(text)?;
        let type_name = element
            .type_name
            .ok_or_else(|| Error::MalformedElement("missing `type` attribute".into()))?;
        if type_name == BitString::TYPE_NAME {
            codec::decode::<BitString>(text).map(AnyGenotype::BitString)
        } else if type_name == IntegerVector::TYPE_NAME {
            codec::decode::<IntegerVector>(text).map(AnyGenotype::IntegerVector)
        } else if type_name == FloatVector::TYPE_NAME {
            codec::decode::<FloatVector>(text).map(AnyGenotype::FloatVector)
        } else if type_name == EsVector::TYPE_NAME {
            codec::decode::<EsVector>(text).map(AnyGenotype::EsVector)
        } else {
            Err(Error::TypeMismatch {
                expected: "a registered genotype type".into(),
                found: type_name.to_string(),
            })
        }
    }
}

impl From<BitString> for AnyGenotype {
    fn from(g: BitString) -> Self {
        AnyGenotype::BitString(g)
    }
}

impl From<IntegerVector> for AnyGenotype {
    fn from(g: IntegerVector) -> Self {
        AnyGenotype::IntegerVector(g)
    }
}

impl From<FloatVector> for AnyGenotype {
    fn from(g: FloatVector) -> Self {
        AnyGenotype::FloatVector(g)
    }
}

impl From<EsVector> for AnyGenotype {
    fn from(g: EsVector) -> Self {
        AnyGenotype::EsVector(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_bounds_checked() {
        let mut g = IntegerVector::from(vec![1, 2, 3]);
        g.swap(0, 2).unwrap();
        assert_eq!(g.as_slice(), &[3, 2, 1]);
        assert_eq!(
            g.swap(1, 3),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_equality_requires_same_size() {
        let a = FloatVector::from(vec![1.0, 2.0]);
        let b = FloatVector::from(vec![1.0, 2.0, 3.0]);
        assert!(!a.is_equal(&b));
        assert!(a.is_equal(&a.clone()));
    }

    #[test]
    fn test_ordering_over_shared_prefix() {
        let a = IntegerVector::from(vec![1, 2, 3]);
        let b = IntegerVector::from(vec![1, 3]);
        assert!(a.is_less(&b));
        assert!(!b.is_less(&a));

        // Equal prefix: neither is less, even with different sizes.
        let c = IntegerVector::from(vec![1, 2]);
        assert!(!a.is_less(&c));
        assert!(!c.is_less(&a));
    }

    #[test]
    fn test_bitstring_ordering() {
        let a = BitString::from(vec![false, true]);
        let b = BitString::from(vec![true, false]);
        assert!(a.is_less(&b));
        assert!(!b.is_less(&a));
    }

    #[test]
    fn test_any_genotype_round_trip_dispatch() {
        let genotypes: Vec<AnyGenotype> = vec![
            BitString::from(vec![true, false, true]).into(),
            IntegerVector::from(vec![3, -1, 4]).into(),
            FloatVector::from(vec![0.5, -2.25]).into(),
            EsVector::from(vec![EsPair::new(1.5, 0.1)]).into(),
        ];
        for g in genotypes {
            let text = g.encode();
            let back = AnyGenotype::decode(&text).unwrap();
            assert_eq!(back, g, "round trip failed for {text}");
            assert_eq!(back.type_name(), g.type_name());
        }
    }

    #[test]
    fn test_any_genotype_requires_type() {
        let err = AnyGenotype::decode(r#"<Genotype size="2">01</Genotype>"#).unwrap_err();
        assert!(matches!(err, Error::MalformedElement(_)));

        let err = AnyGenotype::decode(r#"<Genotype type="Tree" size="0"></Genotype>"#)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_any_genotype_swap_and_len() {
        let mut g: AnyGenotype = BitString::from(vec![true, false]).into();
        assert_eq!(g.len(), 2);
        g.swap(0, 1).unwrap();
        assert_eq!(g, AnyGenotype::BitString(BitString::from(vec![false, true])));
        assert!(g.swap(0, 5).is_err());
    }
}
