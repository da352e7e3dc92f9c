//! Search configuration.
//!
//! A [`SearchConfig`] is immutable for the duration of one search and is
//! validated before any strand data is touched.

use crate::error::ConfigError;
use crate::strand::Strand;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortest site length a configuration may request.
pub const MIN_SITE_LENGTH: usize = 10;
/// Longest site length a configuration may request.
pub const MAX_SITE_LENGTH: usize = 30;
/// Smallest spacer bound a configuration may request.
pub const MIN_SPACER: usize = 1;
/// Largest spacer bound a configuration may request.
pub const MAX_SPACER: usize = 100;

/// The RVD assigned to guanine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GuanineCode {
    /// `NH`: more specific for G, weaker binding.
    #[default]
    #[serde(rename = "NH")]
    Nh,
    /// `NN`: stronger binding, also tolerates A.
    #[serde(rename = "NN")]
    Nn,
}

impl FromStr for GuanineCode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NH" => Ok(GuanineCode::Nh),
            "NN" => Ok(GuanineCode::Nn),
            other => Err(ConfigError::InvalidGuanineCode(other.to_string())),
        }
    }
}

impl fmt::Display for GuanineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GuanineCode::Nh => "NH",
            GuanineCode::Nn => "NN",
        })
    }
}

/// Strand layout of a pair, left site first in forward coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOrientation {
    /// Left on `+`, right on `-`: the two sites face each other.
    Convergent,
    /// Left on `-`, right on `+`: the two sites face away.
    Divergent,
    /// Both sites on `+`.
    TandemForward,
    /// Both sites on `-`.
    TandemReverse,
}

impl PairOrientation {
    pub const ALL: [PairOrientation; 4] = [
        PairOrientation::Convergent,
        PairOrientation::Divergent,
        PairOrientation::TandemForward,
        PairOrientation::TandemReverse,
    ];

    /// `(left strand, right strand)`.
    pub fn strands(self) -> (Strand, Strand) {
        match self {
            PairOrientation::Convergent => (Strand::Forward, Strand::Reverse),
            PairOrientation::Divergent => (Strand::Reverse, Strand::Forward),
            PairOrientation::TandemForward => (Strand::Forward, Strand::Forward),
            PairOrientation::TandemReverse => (Strand::Reverse, Strand::Reverse),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PairOrientation::Convergent => "convergent",
            PairOrientation::Divergent => "divergent",
            PairOrientation::TandemForward => "tandem_forward",
            PairOrientation::TandemReverse => "tandem_reverse",
        }
    }

    /// Parse an orientation selection; `"any"` selects all four.
    pub fn parse_selection(s: &str) -> Result<Vec<PairOrientation>, ConfigError> {
        if s == "any" {
            return Ok(Self::ALL.to_vec());
        }
        s.parse().map(|o| vec![o])
    }
}

impl FromStr for PairOrientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidOrientation(s.to_string()))
    }
}

impl fmt::Display for PairOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which strands a site-only search scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrandSelection {
    #[default]
    Both,
    Forward,
    Reverse,
}

impl StrandSelection {
    pub fn strands(self) -> &'static [Strand] {
        match self {
            StrandSelection::Both => &[Strand::Forward, Strand::Reverse],
            StrandSelection::Forward => &[Strand::Forward],
            StrandSelection::Reverse => &[Strand::Reverse],
        }
    }
}

/// A half-open interval `[start, end)` of forward-sequence positions.
///
/// A candidate is scanned when its anchor base (offset 0 on its own
/// strand) falls inside the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRegion {
    pub start: usize,
    pub end: usize,
}

impl ScanRegion {
    pub fn new(start: usize, end: usize) -> Self {
        ScanRegion { start, end }
    }

    /// `position ± radius`, clamped to a sequence of `seq_len` bases.
    pub fn around(position: usize, radius: usize, seq_len: usize) -> Self {
        ScanRegion {
            start: position.saturating_sub(radius),
            end: position.saturating_add(radius).min(seq_len),
        }
    }

    /// Check the region against a sequence of `seq_len` bases.
    pub fn validate(&self, seq_len: usize) -> Result<(), ConfigError> {
        if self.start >= self.end {
            return Err(ConfigError::EmptyRegion {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > seq_len {
            return Err(ConfigError::RegionOutOfBounds {
                end: self.end,
                length: seq_len,
            });
        }
        Ok(())
    }

    /// Anchor offsets on `strand` whose forward position lies in the region.
    pub fn strand_offsets(&self, strand: Strand, seq_len: usize) -> std::ops::Range<usize> {
        match strand {
            Strand::Forward => self.start..self.end,
            Strand::Reverse => (seq_len - self.end)..(seq_len - self.start),
        }
    }
}

/// Configuration of one binding-site search.
///
/// # Examples
///
/// ```
/// use tale_scan::config::{GuanineCode, SearchConfig};
///
/// let config = SearchConfig {
///     min_length: 18,
///     max_length: 18,
///     guanine_code: GuanineCode::Nn,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Shortest site length, inclusive.
    pub min_length: usize,
    /// Longest site length, inclusive.
    pub max_length: usize,
    /// Shortest spacer, inclusive.
    pub min_spacer: usize,
    /// Longest spacer, inclusive.
    pub max_spacer: usize,
    pub guanine_code: GuanineCode,
    /// Minimum GC content of a site, in percent.
    pub min_gc_percent: u8,
    /// Reject sites near CpG islands.
    pub skip_cpg_islands: bool,
    /// Reject sites containing 7 or more consecutive A/T.
    pub skip_at_runs: bool,
    /// Pair layouts to assemble.
    pub orientations: Vec<PairOrientation>,
    /// Only pair sites of identical length.
    pub require_equal_lengths: bool,
    /// Restrict scanning to anchors inside this region.
    pub region: Option<ScanRegion>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_length: 15,
            max_length: 20,
            min_spacer: 14,
            max_spacer: 20,
            guanine_code: GuanineCode::Nh,
            min_gc_percent: 25,
            skip_cpg_islands: true,
            skip_at_runs: true,
            orientations: vec![PairOrientation::Convergent],
            require_equal_lengths: false,
            region: None,
        }
    }
}

impl SearchConfig {
    /// Check every bound that does not depend on the sequence.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.min_length, self.max_length] {
            if !(MIN_SITE_LENGTH..=MAX_SITE_LENGTH).contains(&value) {
                return Err(ConfigError::LengthOutOfBounds {
                    value,
                    min: MIN_SITE_LENGTH,
                    max: MAX_SITE_LENGTH,
                });
            }
        }
        if self.min_length > self.max_length {
            return Err(ConfigError::LengthRangeInverted {
                min: self.min_length,
                max: self.max_length,
            });
        }
        for value in [self.min_spacer, self.max_spacer] {
            if !(MIN_SPACER..=MAX_SPACER).contains(&value) {
                return Err(ConfigError::SpacerOutOfBounds {
                    value,
                    min: MIN_SPACER,
                    max: MAX_SPACER,
                });
            }
        }
        if self.min_spacer > self.max_spacer {
            return Err(ConfigError::SpacerRangeInverted {
                min: self.min_spacer,
                max: self.max_spacer,
            });
        }
        if self.min_gc_percent > 100 {
            return Err(ConfigError::MinGcOutOfBounds(self.min_gc_percent));
        }
        if self.orientations.is_empty() {
            return Err(ConfigError::NoOrientations);
        }
        if let Some(region) = &self.region {
            if region.start >= region.end {
                return Err(ConfigError::EmptyRegion {
                    start: region.start,
                    end: region.end,
                });
            }
        }
        Ok(())
    }

    /// Check the configuration against a concrete sequence length.
    pub fn validate_for(&self, seq_len: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(region) = &self.region {
            region.validate(seq_len)?;
        }
        Ok(())
    }

    /// Selected orientations, deduplicated, in canonical order.
    pub fn orientation_set(&self) -> Vec<PairOrientation> {
        let mut set = self.orientations.clone();
        set.sort_unstable();
        set.dedup();
        set
    }

    /// Anchor offsets to scan on `strand`.
    pub fn scan_offsets(&self, strand: Strand, seq_len: usize) -> std::ops::Range<usize> {
        match &self.region {
            Some(region) => region.strand_offsets(strand, seq_len),
            None => 0..seq_len,
        }
    }
}
