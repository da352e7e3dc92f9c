//! Validated input sequences.

use crate::error::TaleScanError;
use bio::alphabets::Alphabet;

/// Shortest sequence accepted for a search.
pub const MIN_SEQUENCE_LENGTH: usize = 100;
/// Longest sequence accepted for a search.
pub const MAX_SEQUENCE_LENGTH: usize = 100_000;

/// An uppercase DNA sequence over `{A, C, G, T}` whose length lies in
/// `[MIN_SEQUENCE_LENGTH, MAX_SEQUENCE_LENGTH]`.
///
/// Construction is the only place input errors are raised; nothing
/// downstream re-checks the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    bases: Vec<u8>,
}

impl Sequence {
    /// Validate a sequence string.
    ///
    /// No repair is attempted: lowercase letters, `N`, whitespace and any
    /// other byte are reported as invalid symbols.
    ///
    /// # Errors
    ///
    /// * `TaleScanError::InvalidSequenceLength` if the length is out of range.
    /// * `TaleScanError::InvalidSymbol` for the first byte outside `ACGT`.
    pub fn new(seq: &str) -> Result<Self, TaleScanError> {
        Self::from_bytes(seq.as_bytes().to_vec())
    }

    /// Validate an owned byte buffer.
    pub fn from_bytes(bases: Vec<u8>) -> Result<Self, TaleScanError> {
        let length = bases.len();
        if !(MIN_SEQUENCE_LENGTH..=MAX_SEQUENCE_LENGTH).contains(&length) {
            return Err(TaleScanError::InvalidSequenceLength {
                length,
                min: MIN_SEQUENCE_LENGTH,
                max: MAX_SEQUENCE_LENGTH,
            });
        }

        let alphabet = Alphabet::new(b"ACGT");
        if !alphabet.is_word(&bases) {
            if let Some(position) = bases.iter().position(|b| !alphabet.is_word([*b])) {
                return Err(TaleScanError::InvalidSymbol {
                    position,
                    symbol: char::from(bases[position]),
                });
            }
        }

        Ok(Sequence { bases })
    }

    /// The sequence bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bases
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.bases
    }
}
