// SPDX-License-Identifier: Apache-2.0

//! The adaptive radix trie itself: insert, search, delete, and the two
//! traversal primitives (whole-tree and prefix-rooted iteration) that the
//! fuzzy-search and top-k components build on.
//!
//! Grounded in `original_source/src/art.cpp`'s `recursive_insert`,
//! `recursive_delete`/`remove_child4`, and `art_iter_prefix`. The original
//! threads raw `art_node**` pointers so a child slot can be overwritten in
//! place; this port threads `NodeId`s instead and updates a parent's child
//! slot explicitly via `replace_child` whenever a subtree's identity
//! changes (growth, shrink, and the single-child path-compression merge all
//! preserve the owning `NodeId`, so this only fires on merge).

use std::ops::ControlFlow;

use crate::encoding::{self, Comparator};
use crate::error::ArtError;
use crate::fuzzy;
use crate::node::{Arena, Header, Leaf, Node, Node4, NodeId, MAX_PREFIX_LEN};
use crate::posting::{Document, PostingList};
use crate::topk::{self, Order};

/// A standalone adaptive radix trie over byte-string keys.
///
/// Keys must be non-empty, and no stored key may be a byte-for-byte
/// proper prefix of another — callers that index
/// variable-length strings are expected to append an explicit terminator
/// (commonly `0x00`) themselves; this type does not do it for them.
#[derive(Debug, Default)]
pub struct Tree {
    arena: Arena,
    root: Option<NodeId>,
    size: u64,
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            arena: Arena::new(),
            root: None,
            size: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Folds `document` into the posting list at `key`, creating the key's
    /// leaf if absent.
    ///
    /// Returns `Ok(None)` if `key` was not previously present in the tree.
    /// Returns `Ok(Some(posting_list))` — the leaf's posting list *after*
    /// folding `document` in — if `key` already existed, matching the
    /// original's aliased-pointer return (the returned list is not a
    /// pre-insert snapshot).
    pub fn insert(&mut self, key: &[u8], document: Document) -> Result<Option<PostingList>, ArtError> {
        if key.is_empty() {
            return Err(ArtError::EmptyKey);
        }
        let root = match self.root {
            Some(r) => r,
            None => {
                let leaf = Leaf::new(key.to_vec(), document);
                let id = self.arena.alloc(Node::Leaf(leaf));
                self.root = Some(id);
                self.size += 1;
                #[cfg(debug_assertions)]
                crate::contracts::check_tree_invariants(&self.arena, self.root);
                return Ok(None);
            }
        };
        let (prev, is_new, _count) = recursive_insert(&mut self.arena, root, key, document, 0);
        if is_new {
            self.size += 1;
        }
        #[cfg(debug_assertions)]
        crate::contracts::check_tree_invariants(&self.arena, self.root);
        Ok(prev)
    }

    /// Exact lookup.
    pub fn search(&self, key: &[u8]) -> Option<&PostingList> {
        let mut id = self.root?;
        let mut depth = 0usize;
        loop {
            match self.arena.get(id) {
                Node::Leaf(l) => {
                    return if l.matches(key) {
                        Some(&l.postings)
                    } else {
                        None
                    };
                }
                node => {
                    let h = node.header().unwrap();
                    if h.partial_len > 0 {
                        let matched = check_prefix(h, key, depth);
                        if matched != h.stored_prefix_len() {
                            return None;
                        }
                        depth += h.partial_len as usize;
                        if depth >= key.len() {
                            return None;
                        }
                    }
                    let byte = key[depth];
                    match node.find_child(byte) {
                        Some(c) => {
                            id = c;
                            depth += 1;
                        }
                        None => return None,
                    }
                }
            }
        }
    }

    /// Removes `key` entirely, returning its posting list if present.
    pub fn delete(&mut self, key: &[u8]) -> Option<PostingList> {
        let Some(root) = self.root else {
            return None;
        };
        let (new_root, removed) = recursive_delete(&mut self.arena, root, key, 0);
        self.root = new_root;
        if removed.is_some() {
            self.size -= 1;
        }
        #[cfg(debug_assertions)]
        crate::contracts::check_tree_invariants(&self.arena, self.root);
        removed.map(|l| l.postings)
    }

    /// Test/debug helper: runs the full invariant pass unconditionally
    /// (even in release builds), for callers that want to assert tree
    /// health outside of the automatic post-mutation checks.
    pub fn assert_invariants(&self) {
        if let Some(root) = self.root {
            crate::contracts::check_node_shape(&self.arena, root, true);
            crate::contracts::check_score_and_freq_cache(&self.arena, root);
        }
    }

    /// Visits every leaf in key order, stopping early if `f` returns
    /// `ControlFlow::Break`.
    pub fn iter<F>(&self, mut f: F)
    where
        F: FnMut(&[u8], &PostingList) -> ControlFlow<()>,
    {
        if let Some(root) = self.root {
            let _ = iter_node(&self.arena, root, &mut f);
        }
    }

    /// Visits every leaf whose key starts with `prefix`.
    pub fn iter_prefix<F>(&self, prefix: &[u8], mut f: F)
    where
        F: FnMut(&[u8], &PostingList) -> ControlFlow<()>,
    {
        let Some(mut id) = self.root else {
            return;
        };
        let mut depth = 0usize;
        loop {
            match self.arena.get(id) {
                Node::Leaf(l) => {
                    if l.matches_prefix(prefix) {
                        let _ = f(&l.key, &l.postings);
                    }
                    return;
                }
                node => {
                    if depth == prefix.len() {
                        let min_id = minimum_id(&self.arena, id);
                        if self
                            .arena
                            .get(min_id)
                            .as_leaf()
                            .unwrap()
                            .matches_prefix(prefix)
                        {
                            let _ = iter_node(&self.arena, id, &mut f);
                        }
                        return;
                    }
                    let h = node.header().unwrap();
                    if h.partial_len > 0 {
                        let window = (h.partial_len as usize).min(prefix.len().saturating_sub(depth));
                        let matched = prefix_mismatch(&self.arena, id, prefix, depth);
                        if matched < window {
                            // A real byte mismatched within the node's compressed path:
                            // no leaf under here can carry `prefix`.
                            return;
                        }
                        if depth + matched == prefix.len() {
                            // `prefix` is exhausted inside (or exactly at the end of)
                            // this node's compressed path: the whole subtree qualifies.
                            let _ = iter_node(&self.arena, id, &mut f);
                            return;
                        }
                        depth += h.partial_len as usize;
                    }
                    let byte = prefix[depth];
                    match node.find_child(byte) {
                        Some(c) => {
                            id = c;
                            depth += 1;
                        }
                        None => return,
                    }
                }
            }
        }
    }

    /// The lexicographically smallest stored key, if any.
    pub fn minimum(&self) -> Option<&Leaf> {
        let id = minimum_id(&self.arena, self.root?);
        self.arena.get(id).as_leaf()
    }

    /// The lexicographically largest stored key, if any.
    pub fn maximum(&self) -> Option<&Leaf> {
        let id = maximum_id(&self.arena, self.root?);
        self.arena.get(id).as_leaf()
    }

    /// Incremental Damerau-Levenshtein fuzzy search
    /// followed by best-first top-k ranking.
    ///
    /// `prefix = true` treats `term` as a prefix query: the tail of each
    /// candidate key beyond `term`'s length is free (not counted against
    /// edit distance), matching the "fuzzy prefix" mode typeahead callers
    /// want. `filter_ids`, if non-empty, must be sorted-unique; only
    /// documents present in it are eligible.
    pub fn fuzzy_search(
        &self,
        term: &[u8],
        min_cost: u32,
        max_cost: u32,
        max_results: usize,
        order: Order,
        prefix: bool,
        filter_ids: &[u32],
    ) -> Result<Vec<(&[u8], &PostingList)>, ArtError> {
        if min_cost > max_cost {
            return Err(ArtError::InvalidCostRange { min_cost, max_cost });
        }
        let Some(root) = self.root else {
            return Ok(Vec::new());
        };
        let roots = fuzzy::collect_candidate_roots(&self.arena, root, term, min_cost, max_cost, prefix);
        let leaves = topk::rank(&self.arena, &roots, order, max_results, filter_ids);
        Ok(leaves
            .into_iter()
            .map(|id| {
                let l = self.arena.get(id).as_leaf().unwrap();
                (l.key.as_slice(), &l.postings)
            })
            .collect())
    }

    /// Top-k ranking over the whole subtree rooted at `key`'s prefix match,
    /// used for plain (non-fuzzy) typeahead.
    pub fn topk_prefix(
        &self,
        prefix: &[u8],
        max_results: usize,
        order: Order,
        filter_ids: &[u32],
    ) -> Vec<(&[u8], &PostingList)> {
        let Some(mut id) = self.root else {
            return Vec::new();
        };
        let mut depth = 0usize;
        loop {
            match self.arena.get(id) {
                Node::Leaf(l) => {
                    if !l.matches_prefix(prefix) {
                        return Vec::new();
                    }
                    break;
                }
                node => {
                    if depth == prefix.len() {
                        break;
                    }
                    let h = node.header().unwrap();
                    if h.partial_len > 0 {
                        let window = (h.partial_len as usize).min(prefix.len().saturating_sub(depth));
                        let matched = prefix_mismatch(&self.arena, id, prefix, depth);
                        if matched < window {
                            return Vec::new();
                        }
                        if depth + matched == prefix.len() {
                            break;
                        }
                        depth += h.partial_len as usize;
                    }
                    let byte = prefix[depth];
                    match node.find_child(byte) {
                        Some(c) => {
                            id = c;
                            depth += 1;
                        }
                        None => return Vec::new(),
                    }
                }
            }
        }
        let leaves = topk::rank(&self.arena, &[id], order, max_results, filter_ids);
        leaves
            .into_iter()
            .map(|id| {
                let l = self.arena.get(id).as_leaf().unwrap();
                (l.key.as_slice(), &l.postings)
            })
            .collect()
    }

    fn range_search(&self, target: &[u8], comparator: Comparator) -> Vec<(&[u8], &PostingList)> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        encoding::collect_range(&self.arena, root, target, comparator)
            .into_iter()
            .map(|id| {
                let l = self.arena.get(id).as_leaf().unwrap();
                (l.key.as_slice(), &l.postings)
            })
            .collect()
    }

    /// Range/equality search over `i32` keys inserted via
    /// [`encoding::encode_i32`]. Does not preserve order across the sign
    /// bit — see [`Tree::int32_search_signed`] for mixed-sign ranges.
    pub fn int32_search(&self, value: i32, comparator: Comparator) -> Vec<(&[u8], &PostingList)> {
        self.range_search(&encoding::encode_i32(value), comparator)
    }

    /// Sign-aware `i32` range search, for trees whose keys were inserted
    /// via [`encoding::encode_i32_signed`].
    pub fn int32_search_signed(&self, value: i32, comparator: Comparator) -> Vec<(&[u8], &PostingList)> {
        self.range_search(&encoding::encode_i32_signed(value), comparator)
    }

    /// Range/equality search over `i64` keys inserted via
    /// [`encoding::encode_i64`].
    pub fn int64_search(&self, value: i64, comparator: Comparator) -> Vec<(&[u8], &PostingList)> {
        self.range_search(&encoding::encode_i64(value), comparator)
    }

    /// Sign-aware `i64` range search, mirroring
    /// [`Tree::int32_search_signed`].
    pub fn int64_search_signed(&self, value: i64, comparator: Comparator) -> Vec<(&[u8], &PostingList)> {
        self.range_search(&encoding::encode_i64_signed(value), comparator)
    }

    /// Range/equality search over `f32` keys inserted via
    /// [`encoding::encode_f32`]. The IEEE order-preserving transform makes
    /// this correct across the sign bit unconditionally, unlike the
    /// integer encodings.
    pub fn float_search(&self, value: f32, comparator: Comparator) -> Vec<(&[u8], &PostingList)> {
        self.range_search(&encoding::encode_f32(value), comparator)
    }
}

/// Shared with `fuzzy.rs`'s traversal: counts matching bytes between a
/// node's stored prefix (recovering bytes beyond `MAX_PREFIX_LEN` from a
/// descendant leaf when necessary) and `bytes` starting at `depth`.
pub(crate) fn prefix_mismatch(arena: &Arena, id: NodeId, bytes: &[u8], depth: usize) -> usize {
    let header = arena.get(id).header().unwrap();
    let max_cmp = header
        .stored_prefix_len()
        .min(bytes.len().saturating_sub(depth));
    let mut idx = 0;
    while idx < max_cmp && header.partial[idx] == bytes[depth + idx] {
        idx += 1;
    }
    if idx == max_cmp && header.partial_len as usize > MAX_PREFIX_LEN {
        let min_key = minimum_key_from(arena, id);
        let max_cmp2 = min_key.len().min(bytes.len()).saturating_sub(depth);
        while idx < max_cmp2 && min_key[depth + idx] == bytes[depth + idx] {
            idx += 1;
        }
    }
    idx
}

fn check_prefix(header: &Header, key: &[u8], depth: usize) -> usize {
    let max_cmp = header.stored_prefix_len().min(key.len().saturating_sub(depth));
    let mut idx = 0;
    while idx < max_cmp && header.partial[idx] == key[depth + idx] {
        idx += 1;
    }
    idx
}

pub(crate) fn minimum_key_from(arena: &Arena, id: NodeId) -> Vec<u8> {
    let mut cur = id;
    loop {
        match arena.get(cur) {
            Node::Leaf(l) => return l.key.clone(),
            n => cur = n.children_ascending()[0].1,
        }
    }
}

fn minimum_id(arena: &Arena, mut id: NodeId) -> NodeId {
    loop {
        match arena.get(id) {
            Node::Leaf(_) => return id,
            n => id = n.children_ascending()[0].1,
        }
    }
}

fn maximum_id(arena: &Arena, mut id: NodeId) -> NodeId {
    loop {
        match arena.get(id) {
            Node::Leaf(_) => return id,
            n => {
                let kids = n.children_ascending();
                id = kids[kids.len() - 1].1;
            }
        }
    }
}

fn iter_node<F>(arena: &Arena, id: NodeId, f: &mut F) -> ControlFlow<()>
where
    F: FnMut(&[u8], &PostingList) -> ControlFlow<()>,
{
    match arena.get(id) {
        Node::Leaf(l) => f(&l.key, &l.postings),
        n => {
            for (_, child) in n.children_ascending() {
                iter_node(arena, child, f)?;
            }
            ControlFlow::Continue(())
        }
    }
}

fn insert_child_with_growth(arena: &mut Arena, id: NodeId, byte: u8, child: NodeId) {
    arena.grow_if_full(id);
    match arena.get_mut(id) {
        Node::Node4(n) => n.insert_child(byte, child),
        Node::Node16(n) => n.insert_child(byte, child),
        Node::Node48(n) => n.insert_child(byte, child),
        Node::Node256(n) => n.insert_child(byte, child),
        Node::Leaf(_) => unreachable!("insert_child_with_growth called on a leaf"),
    }
}

fn replace_child(arena: &mut Arena, id: NodeId, byte: u8, new_child: NodeId) {
    match arena.get_mut(id) {
        Node::Node4(n) => {
            if let Some(pos) = n.keys[..n.num_children as usize].iter().position(|&k| k == byte) {
                n.children[pos] = Some(new_child);
            }
        }
        Node::Node16(n) => {
            if let Some(pos) = n.keys[..n.num_children as usize].iter().position(|&k| k == byte) {
                n.children[pos] = Some(new_child);
            }
        }
        Node::Node48(n) => {
            let idx = n.keys[byte as usize];
            if idx != 0 {
                n.children[idx as usize - 1] = Some(new_child);
            }
        }
        Node::Node256(n) => {
            n.children[byte as usize] = Some(new_child);
        }
        Node::Leaf(_) => unreachable!("replace_child called on a leaf"),
    }
}

/// Removes the child keyed by `byte` from the internal node at `id`,
/// shrinking its representation if population crossed a threshold, and
/// splicing the node out entirely if exactly one child remains.
///
/// Returns the `NodeId` the caller should now treat as this subtree's
/// root: `id` itself, unless a merge happened, in which case it is the
/// surviving child's id (whose prefix has absorbed `id`'s prefix and the
/// diverging byte).
fn remove_child_and_maybe_merge(arena: &mut Arena, id: NodeId, byte: u8) -> NodeId {
    match arena.get_mut(id) {
        Node::Node4(n) => n.remove_child(byte),
        Node::Node16(n) => n.remove_child(byte),
        Node::Node48(n) => n.remove_child(byte),
        Node::Node256(n) => n.remove_child(byte),
        Node::Leaf(_) => unreachable!("remove_child_and_maybe_merge called on a leaf"),
    }
    arena.shrink_if_sparse(id);

    let should_merge = matches!(arena.get(id), Node::Node4(n) if n.num_children == 1);
    if !should_merge {
        return id;
    }

    let n4 = match arena.take(id) {
        Node::Node4(n) => n,
        _ => unreachable!(),
    };
    let (child_byte, child_id) = n4.children_ascending().next().unwrap();
    let old_header = n4.header;
    arena.free_taken(id);

    let mut child_node = arena.take(child_id);
    if let Some(child_header) = child_node.header_mut() {
        merge_prefix(&old_header, child_byte, child_header);
    }
    arena.replace(child_id, child_node);
    child_id
}

/// Recomputes `id`'s cached `max_score`/`max_doc_freq` from its current
/// children, bottom-up. Unlike insert's bump (which only ever raises the
/// cache), a delete can *lower* the true subtree maximum, so the cache must
/// be rebuilt from scratch rather than folded — called on every ancestor of
/// a deleted leaf that survives the delete (see `recursive_delete` below).
fn recompute_cache(arena: &mut Arena, id: NodeId) {
    let mut max_score = i64::MIN;
    let mut max_doc_freq = 0u64;
    for (_, child) in arena.get(id).children_ascending() {
        match arena.get(child) {
            Node::Leaf(l) => {
                max_score = max_score.max(l.max_score());
                max_doc_freq = max_doc_freq.max(l.postings.len() as u64);
            }
            n => {
                let h = n.header().unwrap();
                max_score = max_score.max(h.max_score);
                max_doc_freq = max_doc_freq.max(h.max_doc_freq);
            }
        }
    }
    if let Some(h) = arena.get_mut(id).header_mut() {
        h.max_score = max_score;
        h.max_doc_freq = max_doc_freq;
    }
}

/// Folds a spliced-out parent's prefix and diverging byte into its
/// surviving child's prefix: `child.partial = parent.partial ++ [byte] ++
/// child.partial`, truncated to `MAX_PREFIX_LEN` bytes of storage while
/// keeping the true combined length. The child's own `max_score`/
/// `max_doc_freq` already reflect its subtree correctly and are untouched
/// by the merge (only the prefix bytes above it changed), so no cache
/// recompute is needed here — see `recompute_cache` for the case that does
/// need one (a surviving node that keeps its own identity).
fn merge_prefix(parent: &Header, byte: u8, child: &mut Header) {
    let true_len = parent.partial_len as usize + 1 + child.partial_len as usize;
    let mut combined = Vec::with_capacity(parent.stored_prefix_len() + 1 + child.stored_prefix_len());
    combined.extend_from_slice(parent.stored_prefix());
    combined.push(byte);
    if parent.partial_len as usize <= MAX_PREFIX_LEN {
        combined.extend_from_slice(child.stored_prefix());
    }
    let store_len = combined.len().min(MAX_PREFIX_LEN);
    child.partial_len = true_len as u32;
    child.partial = [0u8; MAX_PREFIX_LEN];
    child.partial[..store_len].copy_from_slice(&combined[..store_len]);
}

/// Returns `(previous_posting_list_if_existing_key, newly_inserted_document,
/// final_leaf_doc_count)`. The third element lets every ancestor on the way
/// back up bump its `max_doc_freq` cache with the leaf's true post-insert
/// length, post-order — simpler than the original's top-down bump since it
/// needs no special-casing for the freshly created N4 of a split.
fn recursive_insert(
    arena: &mut Arena,
    id: NodeId,
    key: &[u8],
    document: Document,
    depth: usize,
) -> (Option<PostingList>, bool, u64) {
    let doc_score = document.score;

    if arena.get(id).is_leaf() {
        let leaf = match arena.take(id) {
            Node::Leaf(l) => l,
            _ => unreachable!(),
        };
        if leaf.matches(key) {
            let mut leaf = leaf;
            let is_new = leaf.postings.add(document);
            let prev = leaf.postings.clone();
            let count = prev.len() as u64;
            arena.replace(id, Node::Leaf(leaf));
            return (Some(prev), is_new, count);
        }

        let new_leaf = Leaf::new(key.to_vec(), document);
        let lcp = longest_common_prefix(&leaf.key, &new_leaf.key, depth);
        debug_assert!(
            depth + lcp < leaf.key.len() && depth + lcp < new_leaf.key.len(),
            "a stored key is a byte-for-byte prefix of another key; keys must carry an \
             explicit terminator when this can happen"
        );
        let mut n4 = Node4::new(&leaf.key[depth..depth + lcp]);
        let old_byte = leaf.key[depth + lcp];
        let new_byte = new_leaf.key[depth + lcp];
        let old_count = leaf.postings.len() as u64;
        n4.header.bump_max_score(leaf.max_score());
        n4.header.bump_max_score(doc_score);
        n4.header.bump_max_doc_freq(old_count);
        n4.header.bump_max_doc_freq(1);
        let old_id = arena.alloc(Node::Leaf(leaf));
        let new_id = arena.alloc(Node::Leaf(new_leaf));
        n4.insert_child(old_byte, old_id);
        n4.insert_child(new_byte, new_id);
        arena.replace(id, Node::Node4(n4));
        return (None, true, 1);
    }

    let header_len = arena.get(id).header().unwrap().partial_len as usize;
    let prefix_diff = prefix_mismatch(arena, id, key, depth);

    if prefix_diff >= header_len {
        let new_depth = depth + header_len;
        debug_assert!(
            new_depth < key.len(),
            "key exhausted exactly at an internal node's prefix boundary; keys must carry an \
             explicit terminator when this can happen"
        );
        let byte = key[new_depth];
        match arena.get(id).find_child(byte) {
            Some(child_id) => {
                let (prev, is_new, count) = recursive_insert(arena, child_id, key, document, new_depth + 1);
                let h = arena.get_mut(id).header_mut().unwrap();
                h.bump_max_score(doc_score);
                h.bump_max_doc_freq(count);
                (prev, is_new, count)
            }
            None => {
                let new_leaf = Leaf::new(key.to_vec(), document);
                let count = new_leaf.postings.len() as u64;
                let leaf_id = arena.alloc(Node::Leaf(new_leaf));
                insert_child_with_growth(arena, id, byte, leaf_id);
                let h = arena.get_mut(id).header_mut().unwrap();
                h.bump_max_score(doc_score);
                h.bump_max_doc_freq(count);
                (None, true, count)
            }
        }
    } else {
        let old = arena.take(id);
        let old_header = old.header().unwrap().clone();
        let first_child = old.children_ascending()[0].1;

        let (diverging_byte, tail_bytes): (u8, Vec<u8>) = if old_header.partial_len as usize <= MAX_PREFIX_LEN {
            let db = old_header.partial[prefix_diff];
            let tail: Vec<u8> = old_header.stored_prefix()[prefix_diff + 1..].to_vec();
            (db, tail)
        } else {
            let min_key = minimum_key_from(arena, first_child);
            let db = min_key[depth + prefix_diff];
            let new_len = old_header.partial_len as usize - (prefix_diff + 1);
            let copy_len = new_len.min(MAX_PREFIX_LEN);
            let tail = min_key[depth + prefix_diff + 1..depth + prefix_diff + 1 + copy_len].to_vec();
            (db, tail)
        };

        let mut old = old;
        let true_tail_len = old_header.partial_len as usize - (prefix_diff + 1);
        if let Some(h) = old.header_mut() {
            h.partial_len = true_tail_len as u32;
            h.partial = [0u8; MAX_PREFIX_LEN];
            let n = tail_bytes.len().min(MAX_PREFIX_LEN);
            h.partial[..n].copy_from_slice(&tail_bytes[..n]);
        }

        let mut new_n4 = Node4::new(&key[depth..depth + prefix_diff.min(MAX_PREFIX_LEN)]);
        new_n4.header.partial_len = prefix_diff as u32;
        new_n4.header.bump_max_score(old_header.max_score);
        new_n4.header.bump_max_score(doc_score);
        new_n4.header.bump_max_doc_freq(old_header.max_doc_freq);
        new_n4.header.bump_max_doc_freq(1);

        let old_id = arena.alloc(old);
        let new_leaf = Leaf::new(key.to_vec(), document);
        let new_id = arena.alloc(Node::Leaf(new_leaf));
        new_n4.insert_child(diverging_byte, old_id);
        new_n4.insert_child(key[depth + prefix_diff], new_id);
        arena.replace(id, Node::Node4(new_n4));
        (None, true, 1)
    }
}

fn longest_common_prefix(a: &[u8], b: &[u8], depth: usize) -> usize {
    let max_cmp = a.len().min(b.len()) - depth;
    let mut idx = 0;
    while idx < max_cmp && a[depth + idx] == b[depth + idx] {
        idx += 1;
    }
    idx
}

/// Symmetric descent to `recursive_insert`. On the way back up, every
/// surviving ancestor of the removed leaf has its `max_score`/
/// `max_doc_freq` cache rebuilt via `recompute_cache` — deletion can only
/// lower a subtree's true maximum, so (unlike insert) the cache cannot be
/// maintained by folding in a single new value and must be recomputed from
/// the node's current children instead.
fn recursive_delete(arena: &mut Arena, id: NodeId, key: &[u8], depth: usize) -> (Option<NodeId>, Option<Leaf>) {
    if arena.get(id).is_leaf() {
        let matches = arena.get(id).as_leaf().unwrap().matches(key);
        if !matches {
            return (Some(id), None);
        }
        let leaf = match arena.remove(id) {
            Node::Leaf(l) => l,
            _ => unreachable!(),
        };
        return (None, Some(leaf));
    }

    let header_len = {
        let h = arena.get(id).header().unwrap();
        if h.partial_len > 0 {
            let matched = check_prefix(h, key, depth);
            if matched != h.stored_prefix_len() {
                return (Some(id), None);
            }
        }
        h.partial_len as usize
    };
    let depth2 = depth + header_len;
    if depth2 >= key.len() {
        return (Some(id), None);
    }
    let byte = key[depth2];
    let Some(child_id) = arena.get(id).find_child(byte) else {
        return (Some(id), None);
    };

    if arena.get(child_id).is_leaf() {
        let matches = arena.get(child_id).as_leaf().unwrap().matches(key);
        if !matches {
            return (Some(id), None);
        }
        let leaf = match arena.remove(child_id) {
            Node::Leaf(l) => l,
            _ => unreachable!(),
        };
        let new_id = remove_child_and_maybe_merge(arena, id, byte);
        if new_id == id {
            recompute_cache(arena, id);
        }
        return (Some(new_id), Some(leaf));
    }

    let (new_child, removed) = recursive_delete(arena, child_id, key, depth2 + 1);
    match new_child {
        Some(nc) => {
            if nc != child_id {
                replace_child(arena, id, byte, nc);
            }
            if removed.is_some() {
                recompute_cache(arena, id);
            }
            (Some(id), removed)
        }
        None => {
            let new_id = remove_child_and_maybe_merge(arena, id, byte);
            if new_id == id {
                recompute_cache(arena, id);
            }
            (Some(new_id), removed)
        }
    }
}
