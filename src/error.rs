//! Error types shared by every module of the crate.
//!
//! Errors fall into two families:
//!
//! - **Validation**: malformed configuration or inputs detected eagerly
//!   (bad decoding keys, bit-count mismatches, empty genotypes, out-of-range
//!   parameters).
//! - **I/O**: failures while reading an encoded genotype (type tag mismatch,
//!   wrong size, malformed content).
//!
//! Neither family is recovered from locally. A genotype whose read failed is
//! left in an unspecified state and must be discarded by the caller.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors produced by genotypes, operators, and the evolver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A decoding key has inverted bounds or an unsupported bit width.
    #[error("decoding key {index} is invalid: {reason}")]
    InvalidDecodingKey { index: usize, reason: String },

    /// The summed key widths do not match the bit string length.
    #[error("decoding keys expect {expected} bits but the bit string has {actual}")]
    BitCountMismatch { expected: usize, actual: usize },

    /// A zero-sized genotype was requested where at least one element is needed.
    #[error("{0} must contain at least one element")]
    EmptyGenotype(&'static str),

    /// An operator or configuration parameter is out of its legal range.
    #[error("parameter `{name}` is invalid: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// An element index lies outside the genotype.
    #[error("index {index} is out of bounds for a genotype of size {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Two genotypes that must share a length do not.
    #[error("genotype lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// The `type` attribute of an encoded genotype is not the expected one.
    #[error("expected genotype of type `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },

    /// The `size` attribute disagrees with the decoded content.
    #[error("genotype declares size {declared} but its content holds {found} elements")]
    SizeMismatch { declared: usize, found: usize },

    /// The content of an encoded genotype cannot be parsed.
    #[error("malformed {kind} content at element {position}: `{token}`")]
    MalformedContent {
        kind: &'static str,
        position: usize,
        token: String,
    },

    /// The tagged element surrounding the content is malformed.
    #[error("malformed genotype element: {0}")]
    MalformedElement(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors raised while reading encoded genotypes.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. }
                | Error::SizeMismatch { .. }
                | Error::MalformedContent { .. }
                | Error::MalformedElement(_)
        )
    }
}

/// Checks that `value` is a probability in `[0, 1]`.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::parameter(
            name,
            format!("probability must lie in [0, 1], got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = Error::BitCountMismatch {
            expected: 12,
            actual: 10,
        };
        assert_eq!(
            err.to_string(),
            "decoding keys expect 12 bits but the bit string has 10"
        );

        let err = Error::TypeMismatch {
            expected: "BitString".into(),
            found: "FloatVector".into(),
        };
        assert!(err.to_string().contains("BitString"));
        assert!(err.to_string().contains("FloatVector"));
    }

    #[test]
    fn test_io_classification() {
        assert!(Error::MalformedElement("x".into()).is_io());
        assert!(!Error::EmptyGenotype("BitString").is_io());
    }

    #[test]
    fn test_check_probability() {
        assert!(check_probability("pb", 0.0).is_ok());
        assert!(check_probability("pb", 1.0).is_ok());
        assert!(check_probability("pb", 1.5).is_err());
        assert!(check_probability("pb", f64::NAN).is_err());
    }
}
