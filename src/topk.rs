// SPDX-License-Identifier: Apache-2.0

//! Best-first top-k ranking over a set of candidate subtries.
//!
//! Ported from `art_topk_iter` in `original_source/src/art.cpp`: a
//! priority queue of subtrie roots, ordered by a cached per-node maximum,
//! is drained until either `max_results` leaves have been emitted or the
//! queue is empty. Leaves whose documents don't intersect an external
//! filter id set are skipped rather than counted against `max_results`,
//! mirroring `numFoundOf`'s role in the original's loop body.
//!
//! This port departs from the original here: the
//! original ranks internal nodes as frequency-0 when `token_order ==
//! FREQUENCY`, which can starve real high-frequency subtrees behind
//! low-frequency leaves popped earlier by accident of traversal order.
//! This port instead compares internal nodes by their cached
//! `max_doc_freq` (`node.rs`'s `Header::max_doc_freq`), which every
//! internal node keeps exactly in sync with its descendant leaves, so
//! `FREQUENCY` ordering is as correct as `SCORE`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::node::{Arena, Node, NodeId};

/// The metric `Tree::fuzzy_search`/`Tree::topk_prefix` rank candidates by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Descending posting-list length (document frequency).
    Frequency,
    /// Descending cached maximum document score.
    Score,
}

/// A queue entry: a candidate subtrie paired with the metric value it was
/// pushed under. `Ord` compares only on `key` so `BinaryHeap` (a max-heap)
/// pops the best candidate first regardless of which metric is active.
struct Candidate {
    key: i64,
    id: NodeId,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

fn metric(arena: &Arena, id: NodeId, order: Order) -> i64 {
    match arena.get(id) {
        Node::Leaf(l) => match order {
            Order::Frequency => l.postings.len() as i64,
            Order::Score => l.max_score(),
        },
        n => {
            let h = n.header().unwrap();
            match order {
                Order::Frequency => h.max_doc_freq as i64,
                Order::Score => h.max_score,
            }
        }
    }
}

/// Drains `roots` best-first by `order`, emitting up to `max_results` leaf
/// ids that pass the (possibly empty) `filter_ids` intersection check.
///
/// `filter_ids`, when non-empty, must be sorted-unique; a leaf is only
/// emitted if at least one of its document ids appears in `filter_ids`
///.
///
/// After collection, the returned ids are re-sorted descending by `order`
/// as a final pass — `BinaryHeap` pop order already trends that way, but
/// the explicit sort guarantees it even when ties are broken by internal
/// heap structure rather than the metric itself.
pub fn rank(
    arena: &Arena,
    roots: &[NodeId],
    order: Order,
    max_results: usize,
    filter_ids: &[u32],
) -> Vec<NodeId> {
    if max_results == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Candidate> = roots
        .iter()
        .map(|&id| Candidate {
            key: metric(arena, id, order),
            id,
        })
        .collect();

    let mut results = Vec::new();
    while let Some(Candidate { id, .. }) = heap.pop() {
        if results.len() >= max_results {
            break;
        }
        match arena.get(id) {
            Node::Leaf(l) => {
                if filter_ids.is_empty() || l.postings.num_found_of(filter_ids) > 0 {
                    results.push(id);
                }
            }
            n => {
                for (_, child) in n.children_ascending() {
                    heap.push(Candidate {
                        key: metric(arena, child, order),
                        id: child,
                    });
                }
            }
        }
    }

    results.sort_by(|&a, &b| metric(arena, b, order).cmp(&metric(arena, a, order)));
    results
}
