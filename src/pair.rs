//! Pair assembly.
//!
//! A pair is a left site and a right site, in forward-sequence order, with
//! a spacer between them. For a left site covering forward positions
//! `[ls, ls + L)` (last base `e = ls + L - 1`) and a right site starting at
//! `rs`, the spacer is `rs - e - 1`. Right-hand sites are sorted by forward
//! start once per orientation, so the candidates for each left site are
//! found with a binary search instead of a rescan.

use crate::config::{PairOrientation, SearchConfig};
use crate::qualify::CandidateSite;
use crate::scan::SiteSets;
use crate::strand::Strand;
use serde::{Deserialize, Serialize};

/// Two qualified sites at a spacer distance within the configured range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub left: CandidateSite,
    pub right: CandidateSite,
    /// Bases strictly between the two sites.
    pub spacer: usize,
    pub orientation: PairOrientation,
}

impl Pair {
    /// `(left strand, right strand)`.
    pub fn strands(&self) -> (Strand, Strand) {
        (self.left.strand, self.right.strand)
    }

    /// Forward-sequence span covered by the pair, `[start, end)`.
    pub fn span(&self) -> (usize, usize) {
        (self.left.start, self.right.end())
    }
}

/// Spacer between `left` and `right`, or `None` if they touch or overlap.
pub fn spacer_between(left: &CandidateSite, right: &CandidateSite) -> Option<usize> {
    right.start.checked_sub(left.end())
}

/// Sites sorted by forward start, then length.
fn by_forward_start(sites: &[CandidateSite]) -> Vec<&CandidateSite> {
    let mut sorted: Vec<&CandidateSite> = sites.iter().collect();
    sorted.sort_by_key(|s| (s.start, s.length));
    sorted
}

/// Pair every left site with every right site whose spacer lies in
/// `[min_spacer, max_spacer]` for one orientation.
pub fn pairs_for_orientation(
    sites: &SiteSets,
    config: &SearchConfig,
    orientation: PairOrientation,
) -> Vec<Pair> {
    let (left_strand, right_strand) = orientation.strands();
    let lefts = by_forward_start(sites.get(left_strand));
    let rights = by_forward_start(sites.get(right_strand));

    let mut pairs = Vec::new();
    for left in lefts {
        let lo = left.end() + config.min_spacer;
        let hi = left.end() + config.max_spacer;
        let first = rights.partition_point(|r| r.start < lo);
        for &right in rights[first..].iter().take_while(|r| r.start <= hi) {
            if config.require_equal_lengths && left.length != right.length {
                continue;
            }
            pairs.push(Pair {
                left: left.clone(),
                right: right.clone(),
                spacer: right.start - left.end(),
                orientation,
            });
        }
    }
    pairs
}

/// Assemble pairs for every configured orientation.
///
/// Every valid combination is emitted; nothing is ranked or deduplicated.
/// Output is ordered by orientation, then left `(start, length)`, then
/// right `(start, length)`.
pub fn assemble_pairs(sites: &SiteSets, config: &SearchConfig) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for orientation in config.orientation_set() {
        let found = pairs_for_orientation(sites, config, orientation);
        log::debug!("{} {} pairs", found.len(), orientation);
        pairs.extend(found);
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rvd::Rvd;

    fn site(strand: Strand, start: usize, length: usize) -> CandidateSite {
        CandidateSite {
            strand,
            strand_offset: start,
            start,
            length,
            sequence: "T".repeat(length),
            gc_percent: 50.0,
            rvds: vec![Rvd::Ng; length],
            strong_rvds: 3,
        }
    }

    fn config(min_spacer: usize, max_spacer: usize) -> SearchConfig {
        SearchConfig {
            min_spacer,
            max_spacer,
            ..Default::default()
        }
    }

    #[test]
    fn test_spacer_convention() {
        // left covers 10..28 (last base 27); right starting at 48 leaves 20
        let left = site(Strand::Forward, 10, 18);
        let right = site(Strand::Reverse, 48, 18);
        assert_eq!(spacer_between(&left, &right), Some(20));
        assert_eq!(spacer_between(&left, &site(Strand::Reverse, 28, 18)), Some(0));
        assert_eq!(spacer_between(&left, &site(Strand::Reverse, 27, 18)), None);
    }

    #[test]
    fn test_spacer_range_is_inclusive() {
        let sites = SiteSets {
            forward: vec![site(Strand::Forward, 10, 18)],
            reverse: vec![
                site(Strand::Reverse, 37, 18), // spacer 9
                site(Strand::Reverse, 38, 18), // spacer 10
                site(Strand::Reverse, 58, 18), // spacer 30
                site(Strand::Reverse, 59, 18), // spacer 31
            ],
        };
        let pairs = assemble_pairs(&sites, &config(10, 30));
        let spacers: Vec<usize> = pairs.iter().map(|p| p.spacer).collect();
        assert_eq!(spacers, vec![10, 30]);
        assert!(pairs
            .iter()
            .all(|p| p.orientation == PairOrientation::Convergent));
        assert_eq!(pairs[0].strands(), (Strand::Forward, Strand::Reverse));
        assert_eq!(pairs[0].span(), (10, 56));
    }

    #[test]
    fn test_emits_every_combination() {
        let sites = SiteSets {
            forward: vec![site(Strand::Forward, 0, 15), site(Strand::Forward, 0, 16)],
            reverse: vec![site(Strand::Reverse, 31, 15), site(Strand::Reverse, 32, 16)],
        };
        let pairs = assemble_pairs(&sites, &config(14, 20));
        assert_eq!(pairs.len(), 4);

        let equal = SearchConfig {
            require_equal_lengths: true,
            ..config(14, 20)
        };
        let pairs = assemble_pairs(&sites, &equal);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.left.length == p.right.length));
    }

    #[test]
    fn test_range_query_matches_brute_force() {
        let forward: Vec<CandidateSite> = (0..400)
            .step_by(7)
            .flat_map(|s| [site(Strand::Forward, s, 12), site(Strand::Forward, s, 15)])
            .collect();
        // reverse sites arrive in strand order, i.e. descending forward start
        let reverse: Vec<CandidateSite> = (0..400)
            .rev()
            .step_by(5)
            .map(|s| site(Strand::Reverse, s, 14))
            .collect();
        let sites = SiteSets { forward, reverse };
        let config = config(3, 25);

        let pairs = assemble_pairs(&sites, &config);
        let mut expected = 0;
        for l in &sites.forward {
            for r in &sites.reverse {
                if let Some(sp) = spacer_between(l, r) {
                    if (3..=25).contains(&sp) {
                        expected += 1;
                    }
                }
            }
        }
        assert_eq!(pairs.len(), expected);
        assert!(pairs.windows(2).all(|w| {
            (w[0].left.start, w[0].left.length, w[0].right.start)
                <= (w[1].left.start, w[1].left.length, w[1].right.start)
        }));
    }

    #[test]
    fn test_other_orientations() {
        let sites = SiteSets {
            forward: vec![site(Strand::Forward, 0, 12), site(Strand::Forward, 72, 12)],
            reverse: vec![site(Strand::Reverse, 48, 12), site(Strand::Reverse, 24, 12)],
        };
        let config = SearchConfig {
            orientations: PairOrientation::ALL.to_vec(),
            ..config(10, 20)
        };
        let pairs = assemble_pairs(&sites, &config);
        let found: Vec<(PairOrientation, usize, usize)> = pairs
            .iter()
            .map(|p| (p.orientation, p.left.start, p.right.start))
            .collect();
        assert_eq!(
            found,
            vec![
                (PairOrientation::Convergent, 0, 24),
                (PairOrientation::Divergent, 48, 72),
                (PairOrientation::TandemReverse, 24, 48),
            ]
        );
    }

    #[test]
    fn test_no_sites_no_pairs() {
        assert!(assemble_pairs(&SiteSets::default(), &config(1, 100)).is_empty());
    }
}
