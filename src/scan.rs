//! The site scanner.
//!
//! Enumerates every `(offset, length)` candidate on a strand and keeps the
//! ones the qualifier accepts. Anchor offsets are split into fixed-size
//! chunks that are qualified in parallel with rayon; chunks are collected
//! in index order, so the result is ordered by `(offset, length)` and
//! identical from run to run regardless of thread count.

use crate::config::SearchConfig;
use crate::control::{relay, Cancelled, ChannelProgress, ProgressSink, SearchControl};
use crate::features::{SequenceFeatures, StrandFeatures};
use crate::qualify::{qualify, CandidateSite, Verdict};
use crate::strand::Strand;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

/// Anchor offsets handled by one work unit; cancellation is checked and
/// progress reported once per chunk.
pub const CHUNK_SIZE: usize = 1024;

/// Qualified sites per strand, each ordered by `(strand_offset, length)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSets {
    pub forward: Vec<CandidateSite>,
    pub reverse: Vec<CandidateSite>,
}

impl SiteSets {
    pub fn get(&self, strand: Strand) -> &[CandidateSite] {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    fn get_mut(&mut self, strand: Strand) -> &mut Vec<CandidateSite> {
        match strand {
            Strand::Forward => &mut self.forward,
            Strand::Reverse => &mut self.reverse,
        }
    }

    /// Total number of sites on both strands.
    pub fn len(&self) -> usize {
        self.forward.len() + self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}

/// Capacity of the queue between scan workers and the progress relay.
const PROGRESS_QUEUE: usize = 64;

/// Shared progress counter across all chunks of a scan. Updates are
/// queued with `try_send` and dropped when the relay falls behind.
struct ScanProgress<'a> {
    control: &'a SearchControl<'a>,
    updates: ChannelProgress,
    processed: AtomicU64,
    total: u64,
}

impl ScanProgress<'_> {
    fn advance(&self, offsets: usize) {
        let processed = self.processed.fetch_add(offsets as u64, Ordering::Relaxed) + offsets as u64;
        self.updates.report(processed, self.total);
    }
}

/// Qualify every candidate anchored in `offsets` on one strand, in order.
///
/// Sequential; this is the unit of work for a single chunk.
pub fn scan_range(
    features: &StrandFeatures,
    config: &SearchConfig,
    offsets: Range<usize>,
) -> Vec<CandidateSite> {
    let n = features.len();
    let bases = features.bases();
    let mut sites = Vec::new();
    for offset in offsets {
        // Every length shares offset 0, so a non-T anchor rejects them all.
        if bases[offset] != b'T' {
            continue;
        }
        for length in config.min_length..=config.max_length {
            if offset + length > n {
                break;
            }
            if let Verdict::Qualified(site) = qualify(features, offset, length, config) {
                sites.push(site);
            }
        }
    }
    sites
}

fn chunks(offsets: Range<usize>) -> Vec<Range<usize>> {
    offsets
        .clone()
        .step_by(CHUNK_SIZE)
        .map(|start| start..(start + CHUNK_SIZE).min(offsets.end))
        .collect()
}

fn scan_strand_chunks(
    features: &StrandFeatures,
    config: &SearchConfig,
    offsets: Range<usize>,
    progress: &ScanProgress<'_>,
) -> Result<Vec<CandidateSite>, Cancelled> {
    let per_chunk: Vec<Vec<CandidateSite>> = chunks(offsets)
        .into_par_iter()
        .map(|range| -> Result<Vec<CandidateSite>, Cancelled> {
            progress.control.checkpoint()?;
            let width = range.len();
            let sites = scan_range(features, config, range);
            progress.advance(width);
            Ok(sites)
        })
        .collect::<Result<_, _>>()?;
    Ok(per_chunk.into_iter().flatten().collect())
}

/// Scan the requested strands of a precomputed sequence.
///
/// Anchor offsets come from the configured scan region, or the whole
/// strand. Progress goes to the control's sink from a relay thread that
/// lives for the duration of the scan; the final `(total, total)` report
/// is made on the calling thread once the relay has finished. Returns `Err(Cancelled)` if the token fires before the scan
/// finishes; no partial sites are returned in that case.
pub fn scan_sites(
    features: &SequenceFeatures,
    config: &SearchConfig,
    strands: &[Strand],
    control: &SearchControl<'_>,
) -> Result<SiteSets, Cancelled> {
    let seq_len = features.seq_len();
    let plan: Vec<(Strand, Range<usize>)> = strands
        .iter()
        .map(|&strand| (strand, config.scan_offsets(strand, seq_len)))
        .collect();
    let total = plan.iter().map(|(_, r)| r.len() as u64).sum();
    let (sender, updates) = crossbeam_channel::bounded(PROGRESS_QUEUE);
    let sink = control.progress;

    let sets = std::thread::scope(|scope| -> Result<SiteSets, Cancelled> {
        scope.spawn(move || relay(updates, sink));
        // dropping `progress` closes the queue and ends the relay
        let progress = ScanProgress {
            control,
            updates: ChannelProgress(sender),
            processed: AtomicU64::new(0),
            total,
        };

        let mut sets = SiteSets::default();
        for (strand, offsets) in plan {
            control.checkpoint()?;
            let sites = scan_strand_chunks(features.strand(strand), config, offsets, &progress)?;
            log::debug!("strand {}: {} qualified sites", strand, sites.len());
            *sets.get_mut(strand) = sites;
        }
        Ok(sets)
    })?;
    control.progress.report(total, total);
    Ok(sets)
}
