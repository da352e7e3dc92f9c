//! Strand-related utilities: reverse complement and strand coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two strands of a double-stranded sequence.
///
/// The reverse strand is always read 5' to 3', i.e. as the reverse
/// complement of the forward sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strand {
    /// The sequence as given (`+`).
    #[serde(rename = "+")]
    Forward,
    /// The reverse complement (`-`).
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    /// Both strands, forward first.
    pub const BOTH: [Strand; 2] = [Strand::Forward, Strand::Reverse];

    /// The strand sign byte (`+` or `-`).
    pub fn sign(self) -> u8 {
        match self {
            Strand::Forward => b'+',
            Strand::Reverse => b'-',
        }
    }

    /// The other strand.
    pub fn opposite(self) -> Strand {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    /// Map a span given in this strand's own coordinates onto the forward
    /// sequence and return its leftmost forward position.
    ///
    /// # Arguments
    ///
    /// * `offset` - 0-based start of the span on this strand.
    /// * `length` - Span length.
    /// * `seq_len` - Length of the whole sequence.
    #[inline]
    pub fn forward_start(self, offset: usize, length: usize, seq_len: usize) -> usize {
        match self {
            Strand::Forward => offset,
            Strand::Reverse => seq_len - offset - length,
        }
    }

    /// Map a single position on this strand onto the forward sequence.
    #[inline]
    pub fn forward_position(self, offset: usize, seq_len: usize) -> usize {
        self.forward_start(offset, 1, seq_len)
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign() as char)
    }
}

/// Compute the complement of a single uppercase DNA byte.
///
/// `A ↔ T`, `C ↔ G`. Other bytes are returned unchanged; validated
/// sequences never contain them.
#[inline]
pub fn complement(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        other => other,
    }
}

/// Compute the reverse complement of a DNA byte slice.
///
/// # Examples
///
/// ```
/// use tale_scan::strand::revcomp;
/// assert_eq!(revcomp(b"ACGT"), b"ACGT");  // palindrome
/// assert_eq!(revcomp(b"AAAC"), b"GTTT");
/// ```
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
