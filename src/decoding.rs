//! Binary and Gray-code decoding of bit strings into bounded reals.
//!
//! A bit string is split into contiguous segments, one per [`DecodingKey`].
//! Each segment is read most-significant bit first as an unsigned integer
//! `g` and mapped linearly onto the key's interval:
//!
//! ```text
//! value = lower + g / (2^bits - 1) * (upper - lower)
//! ```
//!
//! Gray-coded strings are first reflected back to plain binary, segment by
//! segment. The reflection never crosses key boundaries.
//!
//! # References
//!
//! - Gray (1953), "Pulse Code Communication", US Patent 2,632,058
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*, ch. 3

use crate::error::{Error, Result};

/// Width of the machine word the segments are accumulated into.
pub const WORD_BITS: u32 = u64::BITS;

/// Describes how one fixed-width bit segment maps onto a bounded real.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodingKey {
    /// Value decoded from an all-zero segment.
    pub lower_bound: f64,
    /// Value decoded from an all-one segment. Must exceed `lower_bound`.
    pub upper_bound: f64,
    /// Segment width, in `[1, WORD_BITS - 1]`.
    pub encoding_bits: u32,
}

impl DecodingKey {
    /// Creates a key without validating it.
    ///
    /// Keys are validated when they are used; see [`DecodingKey::validate`].
    pub fn new(lower_bound: f64, upper_bound: f64, encoding_bits: u32) -> Self {
        Self {
            lower_bound,
            upper_bound,
            encoding_bits,
        }
    }

    /// Checks the bounds ordering and the encoding width.
    ///
    /// `index` is only used to locate the key in the error message.
    pub fn validate(&self, index: usize) -> Result<()> {
        if !(self.lower_bound < self.upper_bound) {
            return Err(Error::InvalidDecodingKey {
                index,
                reason: format!(
                    "lower bound {} must be below upper bound {}",
                    self.lower_bound, self.upper_bound
                ),
            });
        }
        if self.encoding_bits < 1 || self.encoding_bits > WORD_BITS - 1 {
            return Err(Error::InvalidDecodingKey {
                index,
                reason: format!(
                    "encoding width {} is outside [1, {}]",
                    self.encoding_bits,
                    WORD_BITS - 1
                ),
            });
        }
        Ok(())
    }

    /// Largest integer representable by the segment, `2^bits - 1`.
    fn max_code(&self) -> u64 {
        (1u64 << self.encoding_bits) - 1
    }
}

/// Total number of bits consumed by `keys`.
pub fn total_bits(keys: &[DecodingKey]) -> usize {
    keys.iter().map(|k| k.encoding_bits as usize).sum()
}

/// Decodes a plain binary bit sequence into one real per key.
///
/// Every key is validated before any bit is read. Keys consume bits in
/// order; bits beyond the summed key widths are ignored, and a sequence
/// that is too short is reported as a [`Error::BitCountMismatch`].
pub fn convert_bin_to_dec(keys: &[DecodingKey], bits: &[bool]) -> Result<Vec<f64>> {
    for (i, key) in keys.iter().enumerate() {
        key.validate(i)?;
    }
    let needed = total_bits(keys);
    if bits.len() < needed {
        return Err(Error::BitCountMismatch {
            expected: needed,
            actual: bits.len(),
        });
    }

    let mut values = Vec::with_capacity(keys.len());
    let mut offset = 0;
    for key in keys {
        let width = key.encoding_bits as usize;
        let code = bits[offset..offset + width]
            .iter()
            .fold(0u64, |acc, &b| (acc << 1) | u64::from(b));
        let ratio = code as f64 / key.max_code() as f64;
        values.push(key.lower_bound + ratio * (key.upper_bound - key.lower_bound));
        offset += width;
    }
    Ok(values)
}

/// Converts a Gray-coded bit sequence to plain binary, segment by segment.
///
/// Within each key's segment the first bit is copied, and every following
/// bit is the XOR of its Gray bit with the previously converted binary bit.
pub fn convert_gray_to_bin(keys: &[DecodingKey], gray: &[bool]) -> Result<Vec<bool>> {
    let needed = total_bits(keys);
    if gray.len() < needed {
        return Err(Error::BitCountMismatch {
            expected: needed,
            actual: gray.len(),
        });
    }

    let mut bin = gray.to_vec();
    let mut offset = 0;
    for key in keys {
        let width = key.encoding_bits as usize;
        for i in offset + 1..offset + width {
            bin[i] = gray[i] ^ bin[i - 1];
        }
        offset += width;
    }
    Ok(bin)
}

/// Converts a plain binary sequence to Gray code, segment by segment.
///
/// Inverse of [`convert_gray_to_bin`] for the same keys.
pub fn convert_bin_to_gray(keys: &[DecodingKey], bin: &[bool]) -> Result<Vec<bool>> {
    let needed = total_bits(keys);
    if bin.len() < needed {
        return Err(Error::BitCountMismatch {
            expected: needed,
            actual: bin.len(),
        });
    }

    let mut gray = bin.to_vec();
    let mut offset = 0;
    for key in keys {
        let width = key.encoding_bits as usize;
        for i in offset + 1..offset + width {
            gray[i] = bin[i] ^ bin[i - 1];
        }
        offset += width;
    }
    Ok(gray)
}

/// Decodes a binary bit string whose length must equal the summed key widths.
pub fn decode(keys: &[DecodingKey], bits: &[bool]) -> Result<Vec<f64>> {
    check_length(keys, bits)?;
    convert_bin_to_dec(keys, bits)
}

/// Decodes a Gray-coded bit string whose length must equal the summed key widths.
pub fn decode_gray(keys: &[DecodingKey], bits: &[bool]) -> Result<Vec<f64>> {
    check_length(keys, bits)?;
    let bin = convert_gray_to_bin(keys, bits)?;
    convert_bin_to_dec(keys, &bin)
}

fn check_length(keys: &[DecodingKey], bits: &[bool]) -> Result<()> {
    let expected = total_bits(keys);
    if expected != bits.len() {
        return Err(Error::BitCountMismatch {
            expected,
            actual: bits.len(),
        });
    }
    Ok(())
}
