// SPDX-License-Identifier: Apache-2.0

//! External-locking helper for multi-reader callers.
//!
//! The core [`crate::Tree`] takes no locks of its own — mutation and query
//! must be serialized by the caller. This module is a thin, optional
//! convenience wrapper for callers who want that serialization without
//! writing it themselves; the index itself never depends on it.

use parking_lot::RwLock;

use crate::encoding::Comparator;
use crate::error::ArtError;
use crate::node::Leaf;
use crate::posting::{Document, PostingList};
use crate::topk::Order;
use crate::tree::Tree;

/// A [`Tree`] behind a `parking_lot::RwLock`, giving safe concurrent reads
/// and exclusive writes without the core needing to know about locking at
/// all.
#[derive(Debug, Default)]
pub struct SyncTree {
    inner: RwLock<Tree>,
}

impl SyncTree {
    pub fn new() -> Self {
        SyncTree {
            inner: RwLock::new(Tree::new()),
        }
    }

    pub fn len(&self) -> u64 {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn insert(&self, key: &[u8], document: Document) -> Result<Option<PostingList>, ArtError> {
        self.inner.write().insert(key, document)
    }

    pub fn delete(&self, key: &[u8]) -> Option<PostingList> {
        self.inner.write().delete(key)
    }

    pub fn search(&self, key: &[u8]) -> Option<PostingList> {
        self.inner.read().search(key).cloned()
    }

    /// Snapshot of every leaf whose key starts with `prefix`, cloned out
    /// from under the read lock so the result can outlive it.
    pub fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, PostingList)> {
        let guard = self.inner.read();
        let mut out = Vec::new();
        guard.iter_prefix(prefix, |key, postings| {
            out.push((key.to_vec(), postings.clone()));
            std::ops::ControlFlow::Continue(())
        });
        out
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fuzzy_search(
        &self,
        term: &[u8],
        min_cost: u32,
        max_cost: u32,
        max_results: usize,
        order: Order,
        prefix: bool,
        filter_ids: &[u32],
    ) -> Result<Vec<(Vec<u8>, PostingList)>, ArtError> {
        let guard = self.inner.read();
        let results = guard.fuzzy_search(term, min_cost, max_cost, max_results, order, prefix, filter_ids)?;
        Ok(results.into_iter().map(|(k, p)| (k.to_vec(), p.clone())).collect())
    }

    pub fn int32_search(&self, value: i32, comparator: Comparator) -> Vec<(Vec<u8>, PostingList)> {
        let guard = self.inner.read();
        guard
            .int32_search(value, comparator)
            .into_iter()
            .map(|(k, p)| (k.to_vec(), p.clone()))
            .collect()
    }

    /// Lexicographically smallest key currently stored, cloned out from
    /// under the read lock.
    pub fn minimum_key(&self) -> Option<Vec<u8>> {
        self.inner.read().minimum().map(leaf_key)
    }

    pub fn maximum_key(&self) -> Option<Vec<u8>> {
        self.inner.read().maximum().map(leaf_key)
    }
}

fn leaf_key(l: &Leaf) -> Vec<u8> {
    l.key.clone()
}
