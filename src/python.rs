//! Python bindings via PyO3 (feature `python`).
// pyo3 pyfunction return types trigger a false-positive useless_conversion lint.
#![allow(clippy::useless_conversion)]

use crate::cache::FeatureCache;
use crate::config::{PairOrientation, ScanRegion, SearchConfig, StrandSelection};
use crate::control::SearchControl;
use crate::pair::Pair;
use crate::qualify::CandidateSite;
use crate::search::{search_cached, search_sites, SearchOutcome};
use crate::sequence::Sequence;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// `(strand, start, end, length, dna, rvd, gc_percent, strong_rvds)`, 0-based half-open.
type SiteTuple = (String, usize, usize, usize, String, String, f64, usize);

/// `(orientation, spacer, left, right)`.
type PairTuple = (String, usize, SiteTuple, SiteTuple);

fn site_tuple(site: &CandidateSite) -> SiteTuple {
    (
        site.strand.to_string(),
        site.start,
        site.end(),
        site.length,
        site.sequence.clone(),
        site.rvd_string(),
        site.gc_percent,
        site.strong_rvds,
    )
}

fn pair_tuple(pair: &Pair) -> PairTuple {
    (
        pair.orientation.to_string(),
        pair.spacer,
        site_tuple(&pair.left),
        site_tuple(&pair.right),
    )
}

#[allow(clippy::too_many_arguments)]
fn build_config(
    min_length: usize,
    max_length: usize,
    min_spacer: usize,
    max_spacer: usize,
    g_code: &str,
    orientation: &str,
    min_gc: u8,
    skip_cpg: bool,
    skip_consecutive_at: bool,
    region: Option<(usize, usize)>,
) -> PyResult<SearchConfig> {
    let err = |e: crate::error::ConfigError| PyValueError::new_err(e.to_string());
    Ok(SearchConfig {
        min_length,
        max_length,
        min_spacer,
        max_spacer,
        guanine_code: g_code.parse().map_err(err)?,
        min_gc_percent: min_gc,
        skip_cpg_islands: skip_cpg,
        skip_at_runs: skip_consecutive_at,
        orientations: PairOrientation::parse_selection(orientation).map_err(err)?,
        require_equal_lengths: false,
        region: region.map(|(start, end)| ScanRegion::new(start, end)),
    })
}

fn cancelled() -> PyErr {
    pyo3::exceptions::PyRuntimeError::new_err("search cancelled")
}

/// Python class that keeps precomputed features between searches.
///
/// Parameters
/// ----------
/// cache_size : int
///     Number of distinct sequences whose features are kept.
#[pyclass]
pub struct PairFinder {
    cache: FeatureCache,
}

#[pymethods]
impl PairFinder {
    #[new]
    #[pyo3(signature = (cache_size = 8))]
    pub fn new(cache_size: usize) -> Self {
        PairFinder {
            cache: FeatureCache::with_capacity(cache_size),
        }
    }

    /// Find TALEN pairs in a sequence.
    ///
    /// Returns
    /// -------
    /// list[tuple[str, int, tuple, tuple]]
    ///     ``(orientation, spacer, left_site, right_site)``, where each site is
    ///     ``(strand, start, end, length, dna, rvd, gc_percent, strong_rvds)``
    ///     with 0-based half-open forward coordinates.
    ///
    /// Raises
    /// ------
    /// ValueError
    ///     If the sequence or any parameter is invalid.
    #[pyo3(signature = (
        seq,
        min_length = 15,
        max_length = 20,
        min_spacer = 14,
        max_spacer = 20,
        g_code = "NH",
        orientation = "convergent",
        min_gc = 25,
        skip_cpg = true,
        skip_consecutive_at = true,
        region = None,
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn find_pairs(
        &mut self,
        py: Python<'_>,
        seq: &str,
        min_length: usize,
        max_length: usize,
        min_spacer: usize,
        max_spacer: usize,
        g_code: &str,
        orientation: &str,
        min_gc: u8,
        skip_cpg: bool,
        skip_consecutive_at: bool,
        region: Option<(usize, usize)>,
    ) -> PyResult<Vec<PairTuple>> {
        let config = build_config(
            min_length,
            max_length,
            min_spacer,
            max_spacer,
            g_code,
            orientation,
            min_gc,
            skip_cpg,
            skip_consecutive_at,
            region,
        )?;
        let sequence = Sequence::new(seq)?;
        let cache = &mut self.cache;
        let outcome = py.allow_threads(|| {
            search_cached(cache, &sequence, &config, &SearchControl::default())
        })?;
        match outcome {
            SearchOutcome::Completed(result) => Ok(result.pairs.iter().map(pair_tuple).collect()),
            SearchOutcome::Cancelled => Err(cancelled()),
        }
    }

    /// Number of sequences whose features are cached.
    pub fn cached_sequences(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached features.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Python binding: find qualified single sites.
///
/// Parameters
/// ----------
/// seq : str
///     Uppercase DNA, 100 to 100000 bases.
/// strands : str
///     ``"both"``, ``"forward"`` or ``"reverse"``.
///
/// Returns
/// -------
/// list[tuple]
///     ``(strand, start, end, length, dna, rvd, gc_percent, strong_rvds)``,
///     forward strand first, each strand ordered by its own offsets.
#[pyfunction]
#[pyo3(name = "find_sites")]
#[pyo3(signature = (
    seq,
    min_length = 15,
    max_length = 20,
    g_code = "NH",
    strands = "both",
    min_gc = 25,
    skip_cpg = true,
    skip_consecutive_at = true,
    region = None,
))]
#[allow(clippy::too_many_arguments)]
pub fn py_find_sites(
    py: Python<'_>,
    seq: &str,
    min_length: usize,
    max_length: usize,
    g_code: &str,
    strands: &str,
    min_gc: u8,
    skip_cpg: bool,
    skip_consecutive_at: bool,
    region: Option<(usize, usize)>,
) -> PyResult<Vec<SiteTuple>> {
    let selection = match strands {
        "both" => StrandSelection::Both,
        "forward" => StrandSelection::Forward,
        "reverse" => StrandSelection::Reverse,
        other => {
            return Err(PyValueError::new_err(format!(
                "strands must be 'both', 'forward' or 'reverse', got '{other}'"
            )))
        }
    };
    let config = build_config(
        min_length,
        max_length,
        SearchConfig::default().min_spacer,
        SearchConfig::default().max_spacer,
        g_code,
        "convergent",
        min_gc,
        skip_cpg,
        skip_consecutive_at,
        region,
    )?;
    let sequence = Sequence::new(seq)?;
    let outcome = py.allow_threads(|| {
        search_sites(&sequence, &config, selection, &SearchControl::default())
    })?;
    match outcome {
        SearchOutcome::Completed(sites) => Ok(sites
            .forward
            .iter()
            .chain(sites.reverse.iter())
            .map(site_tuple)
            .collect()),
        SearchOutcome::Cancelled => Err(cancelled()),
    }
}

/// Python binding: find TALEN pairs without keeping a cache.
#[pyfunction]
#[pyo3(name = "find_pairs")]
#[pyo3(signature = (
    seq,
    min_length = 15,
    max_length = 20,
    min_spacer = 14,
    max_spacer = 20,
    g_code = "NH",
    orientation = "convergent",
))]
#[allow(clippy::too_many_arguments)]
pub fn py_find_pairs(
    py: Python<'_>,
    seq: &str,
    min_length: usize,
    max_length: usize,
    min_spacer: usize,
    max_spacer: usize,
    g_code: &str,
    orientation: &str,
) -> PyResult<Vec<PairTuple>> {
    let mut finder = PairFinder::new(1);
    finder.find_pairs(
        py,
        seq,
        min_length,
        max_length,
        min_spacer,
        max_spacer,
        g_code,
        orientation,
        25,
        true,
        true,
        None,
    )
}
