//! tale-scan: find TALE binding sites and TALEN pairs in DNA sequences.
//!
//! This library provides:
//! - Validation of input sequences and search configurations
//! - Per-strand feature precomputation (cumulative GC, CpG island masks)
//! - A pure candidate qualifier and a parallel, cancellable site scanner
//! - Pair assembly across strands by spacer range query
//! - A caller-owned feature cache for repeated searches
//! - FASTA/gzipped FASTA loading via needletail (feature `fasta`)
//! - Python bindings via PyO3 (feature `python`)
//!
//! ```
//! use tale_scan::{search, SearchConfig, Sequence};
//!
//! let seq = Sequence::new(&"TCCAGTGACCTAGGCATGACTCAGTTGCAGGATCACTG".repeat(5)).unwrap();
//! let result = search(&seq, &SearchConfig::default()).unwrap();
//! for pair in &result.pairs {
//!     assert!((14..=20).contains(&pair.spacer));
//! }
//! ```

pub mod cache;
pub mod config;
pub mod control;
pub mod error;
#[cfg(feature = "fasta")]
pub mod fasta;
pub mod features;
pub mod pair;
#[cfg(feature = "python")]
pub mod python;
pub mod qualify;
pub mod rvd;
pub mod scan;
pub mod search;
pub mod sequence;
pub mod strand;

pub use cache::FeatureCache;
pub use config::{GuanineCode, PairOrientation, ScanRegion, SearchConfig, StrandSelection};
pub use control::{CancelToken, ChannelProgress, NoProgress, Progress, ProgressSink, SearchControl};
pub use error::{ConfigError, TaleScanError};
pub use pair::Pair;
pub use qualify::CandidateSite;
pub use scan::SiteSets;
pub use search::{search, search_cached, search_sites, search_with, SearchOutcome, SearchResult};
pub use sequence::Sequence;
pub use strand::Strand;

/// Python module for tale-scan.
///
/// Exposes the single-call search functions and the caching `PairFinder`
/// class to Python.
#[cfg(feature = "python")]
#[pyo3::pymodule]
fn _tale_scan(m: &pyo3::Bound<'_, pyo3::types::PyModule>) -> pyo3::PyResult<()> {
    use pyo3::prelude::*;
    m.add_class::<python::PairFinder>()?;
    m.add_function(wrap_pyfunction!(python::py_find_pairs, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_find_sites, m)?)?;
    Ok(())
}
