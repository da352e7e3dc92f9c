//! Per-strand features precomputed once before scanning.
//!
//! For each strand this holds the bases, prefix-count arrays for G/C, C and
//! `CG` dinucleotides (so any window's composition is an O(1) lookup), and
//! the CpG island masks used by the qualifier.

use crate::sequence::Sequence;
use crate::strand::{revcomp, Strand};

/// Width of the sliding window used to call CpG islands.
pub const CPG_WINDOW: usize = 200;
/// Distance around an island within which sites are excluded.
pub const CPG_MARGIN: usize = 100;

/// Precomputed data for one strand, read-only once built.
#[derive(Debug, Clone)]
pub struct StrandFeatures {
    strand: Strand,
    bases: Vec<u8>,
    /// `gc_prefix[i]` = number of G/C in `bases[..i]`.
    gc_prefix: Vec<u32>,
    /// `c_prefix[i]` = number of C in `bases[..i]`.
    c_prefix: Vec<u32>,
    /// `cpg_prefix[i]` = number of `CG` dinucleotides starting before `i`.
    cpg_prefix: Vec<u32>,
    island: Vec<bool>,
    /// Prefix count over the island mask widened by `CPG_MARGIN`.
    expanded_prefix: Vec<u32>,
    island_windows: usize,
}

impl StrandFeatures {
    /// Precompute features for the bases of one strand, read 5' to 3'.
    ///
    /// Works for any length; strands shorter than `CPG_WINDOW` get an
    /// empty island mask.
    pub fn new(strand: Strand, bases: Vec<u8>) -> Self {
        let n = bases.len();
        let mut gc_prefix = Vec::with_capacity(n + 1);
        let mut c_prefix = Vec::with_capacity(n + 1);
        let mut cpg_prefix = Vec::with_capacity(n + 1);
        gc_prefix.push(0u32);
        c_prefix.push(0u32);
        cpg_prefix.push(0u32);

        let (mut gc, mut c, mut cpg) = (0u32, 0u32, 0u32);
        for (i, &b) in bases.iter().enumerate() {
            match b {
                b'C' => {
                    gc += 1;
                    c += 1;
                    if bases.get(i + 1) == Some(&b'G') {
                        cpg += 1;
                    }
                }
                b'G' => gc += 1,
                _ => {}
            }
            gc_prefix.push(gc);
            c_prefix.push(c);
            cpg_prefix.push(cpg);
        }

        let mut features = StrandFeatures {
            strand,
            bases,
            gc_prefix,
            c_prefix,
            cpg_prefix,
            island: vec![false; n],
            expanded_prefix: vec![0; n + 1],
            island_windows: 0,
        };
        features.mark_islands();
        features
    }

    /// Slide the CpG window over the strand and fill both masks.
    fn mark_islands(&mut self) {
        let n = self.bases.len();
        if n < CPG_WINDOW {
            return;
        }

        // Difference arrays: +1 where a flagged span opens, -1 where it closes.
        let mut island_diff = vec![0i32; n + 1];
        let mut expanded_diff = vec![0i32; n + 1];
        for start in 0..=(n - CPG_WINDOW) {
            if !self.window_is_island(start) {
                continue;
            }
            self.island_windows += 1;
            island_diff[start] += 1;
            island_diff[start + CPG_WINDOW] -= 1;
            expanded_diff[start.saturating_sub(CPG_MARGIN)] += 1;
            expanded_diff[(start + CPG_WINDOW + CPG_MARGIN).min(n)] -= 1;
        }

        let (mut in_island, mut in_expanded, mut expanded_count) = (0i32, 0i32, 0u32);
        for i in 0..n {
            in_island += island_diff[i];
            in_expanded += expanded_diff[i];
            self.island[i] = in_island > 0;
            if in_expanded > 0 {
                expanded_count += 1;
            }
            self.expanded_prefix[i + 1] = expanded_count;
        }

        log::debug!(
            "strand {}: {} CpG island windows over {} bases",
            self.strand,
            self.island_windows,
            n
        );
    }

    /// A window is an island when GC ≥ 50% and observed/expected CpG ≥ 0.6,
    /// with expected = `C * G / CPG_WINDOW`. Evaluated in integers.
    fn window_is_island(&self, start: usize) -> bool {
        let end = start + CPG_WINDOW;
        let gc = u64::from(self.gc_count(start, end));
        if 2 * gc < CPG_WINDOW as u64 {
            return false;
        }
        let c = u64::from(self.c_prefix[end] - self.c_prefix[start]);
        let g = gc - c;
        if c == 0 || g == 0 {
            return false;
        }
        // Dinucleotides whose G is still inside the window.
        let observed = u64::from(self.cpg_prefix[end - 1] - self.cpg_prefix[start]);
        10 * observed * CPG_WINDOW as u64 >= 6 * c * g
    }

    #[inline]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[inline]
    pub fn bases(&self) -> &[u8] {
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

    /// The cumulative G/C array, `len() + 1` entries.
    #[inline]
    pub fn gc_prefix(&self) -> &[u32] {
        &self.gc_prefix
    }

    /// Number of G/C bases in `[start, end)`.
    #[inline]
    pub fn gc_count(&self, start: usize, end: usize) -> u32 {
        self.gc_prefix[end] - self.gc_prefix[start]
    }

    /// GC fraction of `[start, end)`; `0.0` for an empty range.
    pub fn gc_fraction(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        f64::from(self.gc_count(start, end)) / (end - start) as f64
    }

    /// Number of `CG` dinucleotides fully inside `[start, end)`.
    pub fn cpg_count(&self, start: usize, end: usize) -> u32 {
        if end <= start + 1 {
            return 0;
        }
        self.cpg_prefix[end - 1] - self.cpg_prefix[start]
    }

    /// Whether `pos` lies inside a qualifying CpG window.
    #[inline]
    pub fn is_island(&self, pos: usize) -> bool {
        self.island[pos]
    }

    /// The island mask, one flag per base.
    pub fn island_mask(&self) -> &[bool] {
        &self.island
    }

    /// Whether `pos` lies within `CPG_MARGIN` of a qualifying CpG window.
    #[inline]
    pub fn is_expanded_island(&self, pos: usize) -> bool {
        self.expanded_prefix[pos + 1] > self.expanded_prefix[pos]
    }

    /// Whether any base in `[start, end)` is flagged by the expanded mask,
    /// i.e. the span widened by `CPG_MARGIN` meets an island window.
    #[inline]
    pub fn near_island(&self, start: usize, end: usize) -> bool {
        self.expanded_prefix[end] > self.expanded_prefix[start]
    }

    /// Number of qualifying CpG windows.
    pub fn island_windows(&self) -> usize {
        self.island_windows
    }
}

/// Features for both strands of a sequence.
#[derive(Debug, Clone)]
pub struct SequenceFeatures {
    forward: StrandFeatures,
    reverse: StrandFeatures,
}

impl SequenceFeatures {
    /// Precompute both strands. The reverse complement is materialised once
    /// here and both strands are processed in parallel.
    pub fn precompute(seq: &Sequence) -> Self {
        Self::from_bases(seq.as_bytes())
    }

    pub(crate) fn from_bases(bases: &[u8]) -> Self {
        let (forward, reverse) = rayon::join(
            || StrandFeatures::new(Strand::Forward, bases.to_vec()),
            || StrandFeatures::new(Strand::Reverse, revcomp(bases)),
        );
        log::debug!(
            "precomputed features for {} bases ({} + / {} - island windows)",
            bases.len(),
            forward.island_windows(),
            reverse.island_windows()
        );
        SequenceFeatures { forward, reverse }
    }

    #[inline]
    pub fn strand(&self, strand: Strand) -> &StrandFeatures {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }

    pub fn forward(&self) -> &StrandFeatures {
        &self.forward
    }

    pub fn reverse(&self) -> &StrandFeatures {
        &self.reverse
    }

    /// Length of the sequence (both strands share it).
    pub fn seq_len(&self) -> usize {
        self.forward.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(seq: &str) -> StrandFeatures {
        StrandFeatures::new(Strand::Forward, seq.as_bytes().to_vec())
    }

    #[test]
    fn test_gc_prefix_matches_direct_count() {
        let seq = "ATGCGCGTTAACCGGATCGATCGGGCCCATATATGCGC".repeat(4);
        let f = features(&seq);
        let direct = seq.bytes().filter(|b| matches!(b, b'G' | b'C')).count() as u32;
        assert_eq!(f.gc_prefix()[0], 0);
        assert_eq!(f.gc_prefix()[seq.len()], direct);
        for w in f.gc_prefix().windows(2) {
            assert!(w[1] - w[0] <= 1);
        }
        assert_eq!(f.gc_count(0, 4), 2);
        assert!((f.gc_fraction(0, 4) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cpg_count() {
        let f = features("CGACGTTCG");
        assert_eq!(f.cpg_count(0, 9), 3);
        // the last CG straddles the end of [0, 8)
        assert_eq!(f.cpg_count(0, 8), 2);
        assert_eq!(f.cpg_count(1, 4), 0);
    }

    #[test]
    fn test_short_strand_has_no_islands() {
        let seq = "CG".repeat(99);
        let f = features(&seq);
        assert_eq!(f.island_windows(), 0);
        assert!(f.island_mask().iter().all(|&x| !x));
        assert!(!f.near_island(0, seq.len()));
    }

    #[test]
    fn test_gc_boundary_window() {
        // exactly 100 G/C out of 200 with a high CpG ratio
        let at_threshold = format!("{}{}", "CG".repeat(50), "A".repeat(100));
        let f = features(&at_threshold);
        assert_eq!(f.island_windows(), 1);
        assert!(f.is_island(0) && f.is_island(199));

        // one G/C fewer
        let below = format!("{}CA{}", "CG".repeat(49), "A".repeat(100));
        assert_eq!(below.len(), CPG_WINDOW);
        let f = features(&below);
        assert_eq!(f.island_windows(), 0);
        assert!(!f.is_island(0));
    }

    #[test]
    fn test_cpg_ratio_boundary_window() {
        // C = 60, G = 50, CG = 9: observed/expected = 9 * 200 / 3000 = 0.6
        let at_threshold = format!(
            "{}{}{}{}",
            "CG".repeat(9),
            "A".repeat(90),
            "G".repeat(41),
            "C".repeat(51)
        );
        assert_eq!(at_threshold.len(), CPG_WINDOW);
        let f = features(&at_threshold);
        assert_eq!(f.cpg_count(0, CPG_WINDOW), 9);
        assert_eq!(f.island_windows(), 1);

        // same composition, one CG turned into GC: ratio 8 * 200 / 3000
        let below = format!(
            "{}GC{}{}{}",
            "CG".repeat(8),
            "A".repeat(90),
            "G".repeat(41),
            "C".repeat(51)
        );
        let f = features(&below);
        assert_eq!(f.cpg_count(0, CPG_WINDOW), 8);
        assert_eq!(f.island_windows(), 0);
    }

    #[test]
    fn test_window_without_c_or_g_is_not_island() {
        let seq = "G".repeat(CPG_WINDOW);
        assert_eq!(features(&seq).island_windows(), 0);
    }

    #[test]
    fn test_expanded_mask_is_clamped() {
        // island windows start at 100..=300, covering [100, 500)
        let seq = format!("{}{}{}", "A".repeat(200), "CG".repeat(100), "A".repeat(300));
        let f = features(&seq);
        assert_eq!(f.island_windows(), 201);
        assert!(!f.is_island(99));
        assert!(f.is_island(100));
        assert!(f.is_island(499));
        assert!(!f.is_island(500));

        // widened by 100 each side: [0, 600), clipped at the left end
        assert!(f.is_expanded_island(0));
        assert!(f.is_expanded_island(599));
        assert!(!f.is_expanded_island(600));
        assert!(!f.near_island(600, 700));
        assert!(f.near_island(590, 610));
    }

    #[test]
    fn test_sequence_features_both_strands() {
        let bases = format!("{}{}", "ACGT".repeat(30), "TTTTGGGG");
        let sf = SequenceFeatures::from_bases(bases.as_bytes());
        assert_eq!(sf.seq_len(), bases.len());
        assert_eq!(sf.reverse().bases(), revcomp(bases.as_bytes()).as_slice());
        assert_eq!(sf.strand(Strand::Forward).strand(), Strand::Forward);
        assert_eq!(
            sf.forward().gc_prefix()[bases.len()],
            sf.reverse().gc_prefix()[bases.len()]
        );
    }
}
