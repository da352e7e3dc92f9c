//! Caller-owned cache of precomputed sequence features.
//!
//! Repeated searches over the same sequence (e.g. with different length or
//! spacer settings) can reuse the strand arrays and CpG masks. The cache is
//! an ordinary value passed into the search; nothing is held globally.

use crate::features::SequenceFeatures;
use crate::sequence::Sequence;
use ahash::{AHashMap, RandomState};
use std::collections::VecDeque;
use std::hash::BuildHasher;
use std::sync::Arc;

/// Number of sequences kept by [`FeatureCache::default`].
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// 64-bit content fingerprint of a sequence.
///
/// Uses fixed seeds so that the same bytes always map to the same key.
pub fn fingerprint(bases: &[u8]) -> u64 {
    RandomState::with_seeds(
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    )
    .hash_one(bases)
}

/// Bounded map from fingerprint to precomputed features. When full, the
/// oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct FeatureCache {
    entries: AHashMap<u64, Arc<SequenceFeatures>>,
    order: VecDeque<u64>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for FeatureCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl FeatureCache {
    /// A cache holding at most `capacity` sequences (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        FeatureCache {
            entries: AHashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the features for `seq`, computing them on a miss.
    ///
    /// A fingerprint match is only reused if the stored forward strand is
    /// byte-identical to `seq`.
    pub fn get_or_compute(&mut self, seq: &Sequence) -> Arc<SequenceFeatures> {
        let key = fingerprint(seq.as_bytes());
        if let Some(features) = self.entries.get(&key) {
            if features.forward().bases() == seq.as_bytes() {
                self.hits += 1;
                log::debug!("feature cache hit for {:016x}", key);
                return Arc::clone(features);
            }
            log::warn!("fingerprint collision for {:016x}, recomputing", key);
        }

        self.misses += 1;
        let features = Arc::new(SequenceFeatures::precompute(seq));
        self.insert(key, Arc::clone(&features));
        features
    }

    fn insert(&mut self, key: u64, features: Arc<SequenceFeatures>) {
        if self.entries.insert(key, features).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn contains(&self, seq: &Sequence) -> bool {
        self.entries.contains_key(&fingerprint(seq.as_bytes()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
