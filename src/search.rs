//! Search entry points.
//!
//! A search runs in three phases separated by hard barriers: feature
//! precomputation for both strands, the parallel site scan, and pair
//! assembly. Validation happens before any of them.

use crate::cache::FeatureCache;
use crate::config::{SearchConfig, StrandSelection};
use crate::control::{Cancelled, SearchControl};
use crate::error::TaleScanError;
use crate::features::SequenceFeatures;
use crate::pair::{assemble_pairs, Pair};
use crate::scan::{scan_sites, SiteSets};
use crate::sequence::Sequence;
use crate::strand::Strand;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Qualified sites and the pairs assembled from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub sites: SiteSets,
    pub pairs: Vec<Pair>,
}

impl SearchResult {
    /// Neither strand has a qualified site and no pair was assembled.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty() && self.pairs.is_empty()
    }
}

/// How a search ended when it did not fail.
///
/// An empty `Completed` result is a valid answer; `Cancelled` carries no
/// data at all.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T = SearchResult> {
    Completed(T),
    Cancelled,
}

impl<T> SearchOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            SearchOutcome::Completed(result) => Some(result),
            SearchOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchOutcome::Cancelled)
    }
}

impl<T> From<Result<T, Cancelled>> for SearchOutcome<T> {
    fn from(result: Result<T, Cancelled>) -> Self {
        match result {
            Ok(value) => SearchOutcome::Completed(value),
            Err(Cancelled) => SearchOutcome::Cancelled,
        }
    }
}

/// Find qualified sites on both strands and pair them.
///
/// # Errors
///
/// Returns `TaleScanError::Config` if the configuration is invalid for this
/// sequence; nothing is computed in that case.
pub fn search(sequence: &Sequence, config: &SearchConfig) -> Result<SearchResult, TaleScanError> {
    match search_with(sequence, config, &SearchControl::default())? {
        SearchOutcome::Completed(result) => Ok(result),
        // the default control's token is private to this call
        SearchOutcome::Cancelled => unreachable!("search cancelled without a cancel handle"),
    }
}

/// [`search`] with a progress sink and cancellation token.
pub fn search_with(
    sequence: &Sequence,
    config: &SearchConfig,
    control: &SearchControl<'_>,
) -> Result<SearchOutcome, TaleScanError> {
    config.validate_for(sequence.len())?;
    let features = SequenceFeatures::precompute(sequence);
    Ok(run_pairs(&features, config, control).into())
}

/// [`search_with`] reusing features from a caller-owned cache.
pub fn search_cached(
    cache: &mut FeatureCache,
    sequence: &Sequence,
    config: &SearchConfig,
    control: &SearchControl<'_>,
) -> Result<SearchOutcome, TaleScanError> {
    config.validate_for(sequence.len())?;
    let features: Arc<SequenceFeatures> = cache.get_or_compute(sequence);
    Ok(run_pairs(&features, config, control).into())
}

/// Find qualified sites on the selected strands without pairing them.
pub fn search_sites(
    sequence: &Sequence,
    config: &SearchConfig,
    strands: StrandSelection,
    control: &SearchControl<'_>,
) -> Result<SearchOutcome<SiteSets>, TaleScanError> {
    config.validate_for(sequence.len())?;
    let features = SequenceFeatures::precompute(sequence);
    let outcome = scan_sites(&features, config, strands.strands(), control)
        .and_then(|sites| control.checkpoint().map(|()| sites));
    if outcome.is_err() {
        log::warn!("site search cancelled");
    }
    Ok(outcome.into())
}

fn run_pairs(
    features: &SequenceFeatures,
    config: &SearchConfig,
    control: &SearchControl<'_>,
) -> Result<SearchResult, Cancelled> {
    let result = scan_sites(features, config, &Strand::BOTH, control).and_then(|sites| {
        control.checkpoint()?;
        let pairs = assemble_pairs(&sites, config);
        control.checkpoint()?;
        Ok(SearchResult { sites, pairs })
    });

    match &result {
        Ok(found) => log::info!(
            "search over {} bases: {} + sites, {} - sites, {} pairs",
            features.seq_len(),
            found.sites.forward.len(),
            found.sites.reverse.len(),
            found.pairs.len()
        ),
        Err(Cancelled) => log::warn!("search over {} bases cancelled", features.seq_len()),
    }
    result
}
