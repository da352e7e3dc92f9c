//! Error types for tale-scan.

use thiserror::Error;

/// A search configuration that violates one of its documented bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A site length bound lies outside `[min, max]`.
    #[error("site length {value} outside allowed range {min}..={max}")]
    LengthOutOfBounds { value: usize, min: usize, max: usize },

    /// `min_length` is greater than `max_length`.
    #[error("minimum site length {min} exceeds maximum site length {max}")]
    LengthRangeInverted { min: usize, max: usize },

    /// A spacer bound lies outside `[min, max]`.
    #[error("spacer length {value} outside allowed range {min}..={max}")]
    SpacerOutOfBounds { value: usize, min: usize, max: usize },

    /// `min_spacer` is greater than `max_spacer`.
    #[error("minimum spacer {min} exceeds maximum spacer {max}")]
    SpacerRangeInverted { min: usize, max: usize },

    /// Minimum GC percentage above 100.
    #[error("minimum GC percentage {0} exceeds 100")]
    MinGcOutOfBounds(u8),

    /// Guanine code other than `NH` or `NN`.
    #[error("invalid guanine code '{0}', expected NH or NN")]
    InvalidGuanineCode(String),

    /// Unknown pair orientation name.
    #[error("invalid pair orientation '{0}'")]
    InvalidOrientation(String),

    /// No pair orientation was selected.
    #[error("at least one pair orientation must be selected")]
    NoOrientations,

    /// A scan region with `start >= end`.
    #[error("scan region {start}..{end} is empty")]
    EmptyRegion { start: usize, end: usize },

    /// A scan region reaching past the end of the sequence.
    #[error("scan region end {end} exceeds sequence length {length}")]
    RegionOutOfBounds { end: usize, length: usize },
}

/// Errors that can occur in tale-scan operations.
#[derive(Debug, Error)]
pub enum TaleScanError {
    /// IO error during file reading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a FASTA file.
    #[error("FASTA parse error: {0}")]
    FastaParse(String),

    /// The sequence length lies outside the accepted range.
    #[error("sequence length {length} outside allowed range {min}..={max}")]
    InvalidSequenceLength { length: usize, min: usize, max: usize },

    /// The sequence contains a symbol outside `{A, C, G, T}`.
    #[error("invalid nucleotide '{symbol}' at position {position}")]
    InvalidSymbol { position: usize, symbol: char },

    /// The search configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(feature = "python")]
impl From<TaleScanError> for pyo3::PyErr {
    fn from(e: TaleScanError) -> Self {
        pyo3::exceptions::PyValueError::new_err(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_error_message() {
        let err = TaleScanError::InvalidSymbol {
            position: 4,
            symbol: 'N',
        };
        assert_eq!(err.to_string(), "invalid nucleotide 'N' at position 4");
    }

    #[test]
    fn test_config_error_wraps() {
        let err: TaleScanError = ConfigError::NoOrientations.into();
        assert!(matches!(err, TaleScanError::Config(ConfigError::NoOrientations)));
        assert!(err.to_string().starts_with("invalid configuration"));
    }
}
