//! End-to-end searches through the public API.

use tale_scan::strand::revcomp;
use tale_scan::{
    search, search_with, CancelToken, PairOrientation, SearchConfig, SearchControl, SearchOutcome,
    Sequence, Strand,
};

const LEFT_SITE: &str = "TCCCCCCCCCGGGGGGGG";

/// C filler with a forward site at 10 and a reverse site covering forward
/// positions 48..66 (reverse offset 234).
fn planted() -> Sequence {
    let right = String::from_utf8(revcomp(LEFT_SITE.as_bytes())).unwrap();
    let mut bases = "C".repeat(300);
    bases.replace_range(10..28, LEFT_SITE);
    bases.replace_range(48..66, &right);
    Sequence::new(&bases).unwrap()
}

fn planted_config(min_spacer: usize, max_spacer: usize) -> SearchConfig {
    SearchConfig {
        min_length: 18,
        max_length: 18,
        min_spacer,
        max_spacer,
        ..Default::default()
    }
}

fn busy(copies: usize) -> Sequence {
    Sequence::new(&"TCCAGTGACCTAGGCATGACTCAGTTGCAGGATCACTG".repeat(copies)).unwrap()
}

#[test]
fn test_planted_convergent_pair() {
    let result = search(&planted(), &planted_config(10, 30)).unwrap();
    assert_eq!(result.sites.forward.len(), 1);
    assert_eq!(result.sites.reverse.len(), 1);
    assert_eq!(result.pairs.len(), 1);

    let pair = &result.pairs[0];
    assert_eq!(pair.orientation, PairOrientation::Convergent);
    assert_eq!(pair.spacer, 20);
    assert_eq!(pair.left.start, 10);
    assert_eq!(pair.left.strand, Strand::Forward);
    assert_eq!(pair.right.start, 48);
    assert_eq!(pair.right.strand, Strand::Reverse);
    assert_eq!(pair.right.strand_offset, 234);
    assert_eq!(pair.right.sequence, LEFT_SITE);
    assert_eq!(pair.span(), (10, 66));
}

#[test]
fn test_planted_pair_with_every_orientation() {
    let config = SearchConfig {
        orientations: PairOrientation::ALL.to_vec(),
        ..planted_config(10, 30)
    };
    let result = search(&planted(), &config).unwrap();
    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].orientation, PairOrientation::Convergent);
}

#[test]
fn test_spacer_range_excludes_planted_pair() {
    let result = search(&planted(), &planted_config(25, 30)).unwrap();
    assert!(result.pairs.is_empty());
    assert_eq!(result.sites.len(), 2);
}

#[test]
fn test_cancel_during_scan() {
    let token = CancelToken::new();
    let trigger = token.clone();
    let sink = move |_processed: u64, _total: u64| trigger.cancel();
    let control = SearchControl::new(&sink, token);
    let outcome = search_with(&busy(500), &SearchConfig::default(), &control).unwrap();
    assert_eq!(outcome, SearchOutcome::Cancelled);
}

#[test]
fn test_repeated_search_is_identical() {
    let seq = busy(200);
    let config = SearchConfig {
        orientations: PairOrientation::ALL.to_vec(),
        ..Default::default()
    };
    let first = search(&seq, &config).unwrap();
    let second = search(&seq, &config).unwrap();
    assert!(!first.pairs.is_empty());
    assert_eq!(first, second);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap();
    let serial = pool.install(|| search(&seq, &config).unwrap());
    assert_eq!(first, serial);
}

#[test]
fn test_result_serializes_with_symbolic_names() {
    let result = search(&planted(), &planted_config(10, 30)).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    let pair = &json["pairs"][0];
    assert_eq!(pair["orientation"], "convergent");
    assert_eq!(pair["spacer"], 20);
    assert_eq!(pair["left"]["strand"], "+");
    assert_eq!(pair["right"]["strand"], "-");
    assert_eq!(pair["left"]["rvds"][0], "NG");
}
