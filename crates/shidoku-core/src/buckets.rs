//! Grouping grids by canonical key.

use crate::canonical::CanonicalKey;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Grids sharing one canonical key, in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: CanonicalKey,
    pub grids: Vec<Grid>,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// First grid placed in the bucket
    pub fn first(&self) -> Option<&Grid> {
        self.grids.first()
    }
}

/// Ordered buckets plus a key index.
///
/// Buckets iterate in the order their keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct BucketMap {
    buckets: Vec<Bucket>,
    index: HashMap<CanonicalKey, usize>,
}

impl BucketMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a grid to the bucket for `key`, creating it on first sight
    pub fn insert(&mut self, key: CanonicalKey, grid: Grid) {
        if let Some(&slot) = self.index.get(&key) {
            self.buckets[slot].grids.push(grid);
            return;
        }
        self.index.insert(key, self.buckets.len());
        self.buckets.push(Bucket {
            key,
            grids: vec![grid],
        });
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&Bucket> {
        self.index.get(key).map(|&slot| &self.buckets[slot])
    }

    pub fn contains_key(&self, key: &CanonicalKey) -> bool {
        self.index.contains_key(key)
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of grids across all buckets
    pub fn total_grids(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.buckets.iter().map(|b| &b.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    /// The canonical grid of every bucket
    pub fn canonical_grids(&self) -> Vec<Grid> {
        self.buckets.iter().map(|b| *b.key.grid()).collect()
    }

    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }
}

/// Builds a [`BucketMap`] from any canonicalization function
pub struct EquivalenceBucketBuilder;

impl EquivalenceBucketBuilder {
    /// Key every grid in order and append it to its bucket; no grid is dropped
    pub fn build<'g, I, F>(grids: I, mut canonicalize: F) -> BucketMap
    where
        I: IntoIterator<Item = &'g Grid>,
        F: FnMut(&Grid) -> CanonicalKey,
    {
        let mut map = BucketMap::new();
        for grid in grids {
            map.insert(canonicalize(grid), *grid);
        }
        debug!(
            buckets = map.len(),
            grids = map.total_grids(),
            "built equivalence buckets"
        );
        map
    }
}
