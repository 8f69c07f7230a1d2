//! Bitstream quantization.
//!
//! Raw entropy arrives as an ordered sequence of binary digits.  The
//! [`BitQuantizer`] packs fixed-width groups most-significant-bit first and
//! rescales each group onto `[0, domain_limit)` with
//! `floor(group * domain_limit / 2^bits)`.  The pass is a single lazy
//! left-to-right read; bits left over after the last complete group are
//! dropped and never carried into another pass.

use crate::error::ScatterError;

/// Widest supported group; keeps `2^bits` representable in a `u64`.
pub const MAX_BITS_PER_NUMBER: u32 = 63;

/// Quantization settings for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationParams {
    bits_per_number: u32,
    domain_limit: u64,
    count_needed: usize,
}

impl QuantizationParams {
    /// Validates and builds a parameter set.
    ///
    /// Fails when `bits_per_number` is outside `1..=63`, when `domain_limit`
    /// is zero, or when `2^bits_per_number < domain_limit` (too coarse to
    /// cover the domain without systematic bias).
    pub fn new(
        bits_per_number: u32,
        domain_limit: u64,
        count_needed: usize,
    ) -> Result<Self, ScatterError> {
        if bits_per_number == 0 || bits_per_number > MAX_BITS_PER_NUMBER {
            return Err(ScatterError::InvalidParameter(format!(
                "bits per number must be in 1..={MAX_BITS_PER_NUMBER}, got {bits_per_number}"
            )));
        }
        if domain_limit == 0 {
            return Err(ScatterError::InvalidParameter(
                "domain limit must be positive".to_string(),
            ));
        }
        if (1u64 << bits_per_number) < domain_limit {
            return Err(ScatterError::InvalidParameter(format!(
                "2^{bits_per_number} is smaller than domain limit {domain_limit}"
            )));
        }
        Ok(Self {
            bits_per_number,
            domain_limit,
            count_needed,
        })
    }

    /// Width of each packed group.
    pub fn bits_per_number(&self) -> u32 {
        self.bits_per_number
    }

    /// Exclusive upper bound of emitted values.
    pub fn domain_limit(&self) -> u64 {
        self.domain_limit
    }

    /// Number of values a pass must produce.
    pub fn count_needed(&self) -> usize {
        self.count_needed
    }

    /// Total number of bits a pass consumes: `count_needed * bits_per_number`.
    pub fn required_bits(&self) -> Result<usize, ScatterError> {
        self.count_needed
            .checked_mul(self.bits_per_number as usize)
            .ok_or_else(|| {
                ScatterError::InvalidParameter(format!(
                    "{} values of {} bits overflow the bit count",
                    self.count_needed, self.bits_per_number
                ))
            })
    }
}

/// Converts a bitstream into bounded integers.
#[derive(Debug, Clone)]
pub struct BitQuantizer {
    params: QuantizationParams,
}

impl BitQuantizer {
    /// Creates a quantizer for the given parameters.
    pub fn new(params: QuantizationParams) -> Self {
        Self { params }
    }

    /// Returns the quantizer parameters.
    pub fn params(&self) -> &QuantizationParams {
        &self.params
    }

    #[inline]
    fn scale(&self, group: u64) -> u64 {
        ((group as u128 * self.params.domain_limit as u128) >> self.params.bits_per_number) as u64
    }

    /// Quantizes exactly `count_needed` values from `bits`.
    ///
    /// The iterator is consumed at most up to `count_needed * bits_per_number`
    /// items.  When it ends early the pass fails with
    /// [`ScatterError::InsufficientEntropy`] and no values are returned.
    pub fn quantize_all<I>(&self, bits: I) -> Result<Vec<u64>, ScatterError>
    where
        I: IntoIterator<Item = bool>,
    {
        let needed = self.params.count_needed;
        let width = self.params.bits_per_number;
        let mut out = Vec::with_capacity(needed);
        if needed == 0 {
            return Ok(out);
        }
        let mut group = 0u64;
        let mut filled = 0u32;
        for bit in bits {
            group = (group << 1) | bit as u64;
            filled += 1;
            if filled == width {
                out.push(self.scale(group));
                group = 0;
                filled = 0;
                if out.len() == needed {
                    return Ok(out);
                }
            }
        }
        Err(ScatterError::InsufficientEntropy {
            needed,
            produced: out.len(),
        })
    }

    /// Quantizes a textual bitstream of `'0'` and `'1'` characters.
    ///
    /// Whitespace is ignored; any other character is rejected.
    pub fn quantize_text(&self, text: &str) -> Result<Vec<u64>, ScatterError> {
        let bits = parse_bits(text)?;
        self.quantize_all(bits)
    }
}

/// Parses a textual shot record into bits.
pub fn parse_bits(text: &str) -> Result<Vec<bool>, ScatterError> {
    parse_bit_prefix(text, usize::MAX)
}

/// Parses at most `limit` bits from the front of a textual shot record.
///
/// Characters after the `limit`-th bit are never inspected.
pub fn parse_bit_prefix(text: &str, limit: usize) -> Result<Vec<bool>, ScatterError> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .take(limit)
        .enumerate()
        .map(|(idx, c)| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(ScatterError::InvalidInput(format!(
                "unexpected character {other:?} at bit {idx}"
            ))),
        })
        .collect()
}
