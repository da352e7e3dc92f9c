//! The candidate qualifier.
//!
//! [`qualify`] is a pure function of a strand's precomputed features, a
//! start offset, a length and the search configuration. It holds no state,
//! so the scanner calls it freely from many threads.

use crate::config::SearchConfig;
use crate::features::StrandFeatures;
use crate::rvd::{self, Rvd, MIN_STRONG_RVDS};
use crate::strand::Strand;
use serde::{Deserialize, Serialize};

/// Longest tolerated run of bases drawn only from `{A, T}`.
pub const MAX_AT_RUN: usize = 6;

/// A binding site that passed every filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSite {
    pub strand: Strand,
    /// 0-based start on the site's own strand.
    pub strand_offset: usize,
    /// 0-based leftmost position on the forward sequence.
    pub start: usize,
    pub length: usize,
    /// The bases of the site read 5' to 3' on its own strand.
    pub sequence: String,
    /// GC content in percent.
    pub gc_percent: f64,
    pub rvds: Vec<Rvd>,
    pub strong_rvds: usize,
}

impl CandidateSite {
    /// Forward-sequence end, exclusive.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// 1-based inclusive start for reporting.
    pub fn display_start(&self) -> usize {
        self.start + 1
    }

    /// 1-based inclusive end for reporting.
    pub fn display_end(&self) -> usize {
        self.end()
    }

    /// RVD codes concatenated, e.g. `NGHDNINH`.
    pub fn rvd_string(&self) -> String {
        rvd::to_code_string(&self.rvds)
    }
}

/// Why a candidate was dropped. The first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The span does not fit on the strand.
    OutOfBounds,
    /// Offset 0 of the candidate is not `T`.
    NoLeadingT,
    /// GC content below the configured minimum.
    LowGc,
    /// The span lies within `CPG_MARGIN` of a CpG island.
    NearCpgIsland,
    /// The span contains a run of more than `MAX_AT_RUN` A/T bases.
    AtRun,
    /// Fewer than `MIN_STRONG_RVDS` strong RVDs.
    FewStrongRvds,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Qualified(CandidateSite),
    Rejected(Rejection),
}

impl Verdict {
    pub fn site(self) -> Option<CandidateSite> {
        match self {
            Verdict::Qualified(site) => Some(site),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, Verdict::Qualified(_))
    }
}

/// Length of the longest run of A/T bases in `bases`.
pub fn longest_at_run(bases: &[u8]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &b in bases {
        if matches!(b, b'A' | b'T') {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Evaluate the candidate `[offset, offset + length)` on one strand.
///
/// Checks, in order: leading `T`, GC content (via the prefix array),
/// distance from CpG islands, A/T run length, strong RVD count.
pub fn qualify(
    features: &StrandFeatures,
    offset: usize,
    length: usize,
    config: &SearchConfig,
) -> Verdict {
    let end = offset + length;
    if length == 0 || end > features.len() {
        return Verdict::Rejected(Rejection::OutOfBounds);
    }
    let bases = &features.bases()[offset..end];

    if bases[0] != b'T' {
        return Verdict::Rejected(Rejection::NoLeadingT);
    }

    let gc = features.gc_count(offset, end) as usize;
    if gc * 100 < usize::from(config.min_gc_percent) * length {
        return Verdict::Rejected(Rejection::LowGc);
    }

    if config.skip_cpg_islands && features.near_island(offset, end) {
        return Verdict::Rejected(Rejection::NearCpgIsland);
    }

    if config.skip_at_runs && longest_at_run(bases) > MAX_AT_RUN {
        return Verdict::Rejected(Rejection::AtRun);
    }

    let rvds = rvd::encode(bases, config.guanine_code);
    let strong_rvds = rvd::count_strong(&rvds);
    if strong_rvds < MIN_STRONG_RVDS {
        return Verdict::Rejected(Rejection::FewStrongRvds);
    }

    let strand = features.strand();
    Verdict::Qualified(CandidateSite {
        strand,
        strand_offset: offset,
        start: strand.forward_start(offset, length, features.len()),
        length,
        sequence: String::from_utf8_lossy(bases).into_owned(),
        gc_percent: gc as f64 * 100.0 / length as f64,
        rvds,
        strong_rvds,
    })
}
