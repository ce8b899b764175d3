// SPDX-License-Identifier: Apache-2.0

//! Posting lists: per-leaf document id sets with per-document offset
//! runs.
//!
//! Ported from `add_document_to_leaf`/`insert_and_shift_offset_index` in
//! `original_source/src/art.cpp`. The original's splice-at-old-position
//! behavior for a repeat id is an acknowledged bug (it would duplicate the
//! id's offset run); this port instead adopts the safe rule: at most one
//! entry per id, a repeat insert only raises `max_score`.

use crate::sorted_seq::SortedSeq;

/// A single document to be folded into a posting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: u32,
    pub score: i64,
    pub offsets: Vec<u32>,
}

/// The postings attached to one trie leaf.
///
/// `ids` is sorted-unique; `offset_index[p]` is the starting
/// position in `offsets` of the run belonging to `ids[p]`, and runs are
/// stored contiguously with no gaps, so the run length for `ids[p]` is
/// `offset_index[p+1] - offset_index[p]` (or `offsets.len() - offset_index[p]`
/// for the last id).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    ids: SortedSeq,
    offsets: SortedSeq,
    offset_index: SortedSeq,
    max_score: i64,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList {
            ids: SortedSeq::new(),
            offsets: SortedSeq::new(),
            offset_index: SortedSeq::new(),
            max_score: i64::MIN,
        }
    }

    /// Builds a posting list already containing `document` — the common
    /// case of creating a brand-new leaf.
    pub fn with_document(document: Document) -> Self {
        let mut pl = PostingList::new();
        pl.add(document);
        pl
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn ids(&self) -> &[u32] {
        self.ids.as_slice()
    }

    #[inline]
    pub fn max_score(&self) -> i64 {
        self.max_score
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(id)
    }

    /// Counts how many of `needle_sorted` (itself sorted-unique) also
    /// appear in this posting list's ids. Used by top-k ranking to apply
    /// an external filter-id set.
    pub fn num_found_of(&self, needle_sorted: &[u32]) -> usize {
        self.ids.num_found_of(needle_sorted)
    }

    /// Offsets recorded for `id`, or `None` if `id` is absent.
    pub fn offsets_for(&self, id: u32) -> Option<&[u32]> {
        let pos = self.ids.as_slice().binary_search(&id).ok()?;
        let start = self.offset_index.at(pos) as usize;
        let end = if pos + 1 < self.offset_index.len() {
            self.offset_index.at(pos + 1) as usize
        } else {
            self.offsets.len()
        };
        Some(&self.offsets.as_slice()[start..end])
    }

    /// Folds `document` into this posting list.
    ///
    /// Returns `true` if `document.id` was new (the tree's overall size
    /// should be incremented by the caller), `false` if it already existed
    /// (idempotent past the `max_score` update).
    pub fn add(&mut self, document: Document) -> bool {
        self.max_score = self.max_score.max(document.score);

        let is_new = !self.ids.contains(document.id);
        if is_new {
            // New id: `ids.append` lands it at its sorted position, which is
            // only the tail when this id happens to be the largest seen so
            // far. In general the run has to be spliced into `offsets` at
            // the position its predecessor-by-id run starts at, and every
            // later id's recorded start shifted up by the run's length —
            // otherwise a non-tail insert leaves `offset_index` pointing at
            // stale byte positions (or, worse, out of order).
            let pos = self.ids.append(document.id);
            let start = if pos < self.offset_index.len() {
                self.offset_index.at(pos)
            } else {
                self.offsets.len() as u32
            };
            let run_len = document.offsets.len() as u32;
            self.offset_index.shift_from(pos, run_len);
            self.offset_index.insert_raw_at(pos, start);
            self.offsets.insert_at(start as usize, &document.offsets);
        } else {
            // Repeat id: max_score is already folded in above; per the
            // adopted dedup rule this is a no-op on the stored offsets.
        }
        is_new
    }
}
