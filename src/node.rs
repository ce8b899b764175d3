// SPDX-License-Identifier: Apache-2.0

//! The trie node family: four internal node layouts plus a tagged leaf,
//! stored in an index-addressed arena.
//!
//! Grounded in `original_source/src/art.cpp`'s `art_node4/16/48/256` structs
//! and `alloc_node`/`add_child4/16/48/256`/`remove_child4/16/48/256`. The
//! original distinguishes a leaf from an internal node by tagging the low
//! bit of a raw pointer; per the re-architecture guidance this port uses a
//! tagged `Node` enum instead, and replaces raw pointers with `NodeId`
//! indices into an `Arena`, avoiding both `unsafe` pointer tagging and
//! manual memory management.

use crate::posting::{Document, PostingList};

/// Inline prefix budget on an internal node. The original
/// source uses 10; any value >= 8 is conformant, so the constant is named
/// rather than inlined.
pub const MAX_PREFIX_LEN: usize = 10;

/// A handle to a node living in an `Arena`. Stable for the node's lifetime;
/// never reused while the node is live (on removal the slot is tombstoned
/// and only recycled once handed back out by a fresh `alloc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Common header carried by every internal node variant.
#[derive(Debug, Clone)]
pub struct Header {
    /// True length of the compressed prefix; may exceed `MAX_PREFIX_LEN`,
    /// in which case `partial` holds only the first `MAX_PREFIX_LEN` bytes
    /// and the rest must be recovered by descending to any leaf.
    pub partial_len: u32,
    pub partial: [u8; MAX_PREFIX_LEN],
    /// Maximum `max_score` among all descendant leaves.
    pub max_score: i64,
    /// Maximum posting-list length (`len(ids)`) among all descendant
    /// leaves. The original source omits this, making FREQUENCY-ordered
    /// top-k exact instead of treating internal nodes as having frequency
    /// 0.
    pub max_doc_freq: u64,
}

impl Header {
    fn empty() -> Self {
        Header {
            partial_len: 0,
            partial: [0; MAX_PREFIX_LEN],
            max_score: i64::MIN,
            max_doc_freq: 0,
        }
    }

    fn with_prefix(prefix: &[u8]) -> Self {
        let mut h = Header::empty();
        h.set_prefix(prefix);
        h
    }

    pub fn set_prefix(&mut self, prefix: &[u8]) {
        self.partial_len = prefix.len() as u32;
        let n = prefix.len().min(MAX_PREFIX_LEN);
        self.partial[..n].copy_from_slice(&prefix[..n]);
    }

    /// Number of inline prefix bytes actually stored:
    /// `min(partial_len, MAX_PREFIX_LEN)`.
    pub fn stored_prefix_len(&self) -> usize {
        (self.partial_len as usize).min(MAX_PREFIX_LEN)
    }

    pub fn stored_prefix(&self) -> &[u8] {
        &self.partial[..self.stored_prefix_len()]
    }

    pub fn bump_max_score(&mut self, score: i64) {
        self.max_score = self.max_score.max(score);
    }

    pub fn bump_max_doc_freq(&mut self, freq: u64) {
        self.max_doc_freq = self.max_doc_freq.max(freq);
    }
}

/// A terminal node holding one key's posting list.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub key: Vec<u8>,
    pub postings: PostingList,
}

impl Leaf {
    pub fn new(key: Vec<u8>, document: Document) -> Self {
        Leaf {
            key,
            postings: PostingList::with_document(document),
        }
    }

    /// `max_score` is not duplicated as a separate field (unlike the
    /// header on internal nodes): the posting list already tracks it, and
    /// keeping a second copy in sync on every mutation would just be a
    /// second invariant to break.
    pub fn max_score(&self) -> i64 {
        self.postings.max_score()
    }

    pub fn matches(&self, key: &[u8]) -> bool {
        self.key == key
    }

    pub fn matches_prefix(&self, prefix: &[u8]) -> bool {
        self.key.len() >= prefix.len() && &self.key[..prefix.len()] == prefix
    }
}

#[derive(Debug, Clone)]
pub struct Node4 {
    pub header: Header,
    pub num_children: u8,
    pub keys: [u8; 4],
    pub children: [Option<NodeId>; 4],
}

#[derive(Debug, Clone)]
pub struct Node16 {
    pub header: Header,
    pub num_children: u8,
    pub keys: [u8; 16],
    pub children: [Option<NodeId>; 16],
}

#[derive(Debug, Clone)]
pub struct Node48 {
    pub header: Header,
    pub num_children: u8,
    /// One-based index into `children`; 0 means absent.
    pub keys: Box<[u8; 256]>,
    pub children: [Option<NodeId>; 48],
}

#[derive(Debug, Clone)]
pub struct Node256 {
    pub header: Header,
    pub num_children: u16,
    pub children: Box<[Option<NodeId>; 256]>,
}

macro_rules! sorted_insert {
    ($keys:expr, $children:expr, $n:expr, $byte:expr, $child:expr) => {{
        let n = $n as usize;
        let mut pos = 0;
        while pos < n && $keys[pos] < $byte {
            pos += 1;
        }
        for i in (pos..n).rev() {
            $keys[i + 1] = $keys[i];
            $children[i + 1] = $children[i];
        }
        $keys[pos] = $byte;
        $children[pos] = Some($child);
    }};
}

macro_rules! sorted_remove {
    ($keys:expr, $children:expr, $n:expr, $pos:expr) => {{
        let n = $n as usize;
        let pos = $pos;
        for i in pos..n - 1 {
            $keys[i] = $keys[i + 1];
            $children[i] = $children[i + 1];
        }
        $children[n - 1] = None;
    }};
}

impl Node4 {
    pub fn new(prefix: &[u8]) -> Self {
        Node4 {
            header: Header::with_prefix(prefix),
            num_children: 0,
            keys: [0; 4],
            children: [None; 4],
        }
    }

    pub fn find_child(&self, byte: u8) -> Option<NodeId> {
        self.keys[..self.num_children as usize]
            .iter()
            .position(|&k| k == byte)
            .and_then(|i| self.children[i])
    }

    pub fn is_full(&self) -> bool {
        self.num_children == 4
    }

    pub fn insert_child(&mut self, byte: u8, child: NodeId) {
        debug_assert!(!self.is_full());
        sorted_insert!(self.keys, self.children, self.num_children, byte, child);
        self.num_children += 1;
    }

    pub fn remove_child(&mut self, byte: u8) {
        if let Some(pos) = self.keys[..self.num_children as usize]
            .iter()
            .position(|&k| k == byte)
        {
            sorted_remove!(self.keys, self.children, self.num_children, pos);
            self.num_children -= 1;
        }
    }

    pub fn children_ascending(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.keys[..self.num_children as usize]
            .iter()
            .zip(self.children[..self.num_children as usize].iter())
            .map(|(&b, c)| (b, c.unwrap()))
    }
}

impl Node16 {
    pub fn grow_from(n4: Node4) -> Self {
        let mut n16 = Node16 {
            header: n4.header,
            num_children: n4.num_children,
            keys: [0; 16],
            children: [None; 16],
        };
        n16.keys[..4].copy_from_slice(&n4.keys);
        n16.children[..4].copy_from_slice(&n4.children);
        n16
    }

    pub fn find_child(&self, byte: u8) -> Option<NodeId> {
        crate::simd::find_index_16(&self.keys, self.num_children, byte)
            .and_then(|i| self.children[i])
    }

    pub fn is_full(&self) -> bool {
        self.num_children == 16
    }

    pub fn insert_child(&mut self, byte: u8, child: NodeId) {
        debug_assert!(!self.is_full());
        sorted_insert!(self.keys, self.children, self.num_children, byte, child);
        self.num_children += 1;
    }

    pub fn remove_child(&mut self, byte: u8) {
        if let Some(pos) = self.keys[..self.num_children as usize]
            .iter()
            .position(|&k| k == byte)
        {
            sorted_remove!(self.keys, self.children, self.num_children, pos);
            self.num_children -= 1;
        }
    }

    pub fn children_ascending(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.keys[..self.num_children as usize]
            .iter()
            .zip(self.children[..self.num_children as usize].iter())
            .map(|(&b, c)| (b, c.unwrap()))
    }
}

impl Node48 {
    pub fn grow_from(n16: Node16) -> Self {
        let mut n48 = Node48 {
            header: n16.header,
            num_children: 0,
            keys: Box::new([0; 256]),
            children: [None; 48],
        };
        for i in 0..n16.num_children as usize {
            let byte = n16.keys[i];
            n48.children[i] = n16.children[i];
            n48.keys[byte as usize] = (i + 1) as u8;
        }
        n48.num_children = n16.num_children;
        n48
    }

    pub fn find_child(&self, byte: u8) -> Option<NodeId> {
        let idx = self.keys[byte as usize];
        if idx == 0 {
            None
        } else {
            self.children[idx as usize - 1]
        }
    }

    pub fn is_full(&self) -> bool {
        self.num_children == 48
    }

    pub fn insert_child(&mut self, byte: u8, child: NodeId) {
        debug_assert!(!self.is_full());
        let slot = self
            .children
            .iter()
            .position(|c| c.is_none())
            .expect("Node48 with num_children < 48 must have a free slot");
        self.children[slot] = Some(child);
        self.keys[byte as usize] = (slot + 1) as u8;
        self.num_children += 1;
    }

    pub fn remove_child(&mut self, byte: u8) {
        let idx = self.keys[byte as usize];
        if idx != 0 {
            self.children[idx as usize - 1] = None;
            self.keys[byte as usize] = 0;
            self.num_children -= 1;
        }
    }

    pub fn children_ascending(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        (0u16..256).filter_map(move |b| {
            let idx = self.keys[b as usize];
            if idx == 0 {
                None
            } else {
                self.children[idx as usize - 1].map(|c| (b as u8, c))
            }
        })
    }
}

impl Node256 {
    pub fn grow_from(n48: Node48) -> Self {
        let mut n256 = Node256 {
            header: n48.header,
            num_children: 0,
            children: Box::new([None; 256]),
        };
        for byte in 0..256usize {
            let idx = n48.keys[byte];
            if idx != 0 {
                n256.children[byte] = n48.children[idx as usize - 1];
                n256.num_children += 1;
            }
        }
        n256
    }

    pub fn find_child(&self, byte: u8) -> Option<NodeId> {
        self.children[byte as usize]
    }

    pub fn is_full(&self) -> bool {
        self.num_children == 256
    }

    pub fn insert_child(&mut self, byte: u8, child: NodeId) {
        debug_assert!(self.children[byte as usize].is_none());
        self.children[byte as usize] = Some(child);
        self.num_children += 1;
    }

    pub fn remove_child(&mut self, byte: u8) {
        if self.children[byte as usize].take().is_some() {
            self.num_children -= 1;
        }
    }

    pub fn children_ascending(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(b, c)| c.map(|c| (b as u8, c)))
    }
}

/// The tagged node: a leaf, or one of the four adaptive internal layouts.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf(Leaf),
    Node4(Node4),
    Node16(Node16),
    Node48(Node48),
    Node256(Node256),
}

impl Node {
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match self {
            Node::Leaf(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn header(&self) -> Option<&Header> {
        match self {
            Node::Leaf(_) => None,
            Node::Node4(n) => Some(&n.header),
            Node::Node16(n) => Some(&n.header),
            Node::Node48(n) => Some(&n.header),
            Node::Node256(n) => Some(&n.header),
        }
    }

    pub fn header_mut(&mut self) -> Option<&mut Header> {
        match self {
            Node::Leaf(_) => None,
            Node::Node4(n) => Some(&mut n.header),
            Node::Node16(n) => Some(&mut n.header),
            Node::Node48(n) => Some(&mut n.header),
            Node::Node256(n) => Some(&mut n.header),
        }
    }

    /// Frequency-cache bubbling: folds a leaf's current `max_score` and
    /// posting-list length into this internal node's cached maxima.
    pub fn bump_caches(&mut self, score: i64, doc_freq: u64) {
        if let Some(h) = self.header_mut() {
            h.bump_max_score(score);
            h.bump_max_doc_freq(doc_freq);
        }
    }

    pub fn num_children(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Node4(n) => n.num_children as usize,
            Node::Node16(n) => n.num_children as usize,
            Node::Node48(n) => n.num_children as usize,
            Node::Node256(n) => n.num_children as usize,
        }
    }

    pub fn find_child(&self, byte: u8) -> Option<NodeId> {
        match self {
            Node::Leaf(_) => None,
            Node::Node4(n) => n.find_child(byte),
            Node::Node16(n) => n.find_child(byte),
            Node::Node48(n) => n.find_child(byte),
            Node::Node256(n) => n.find_child(byte),
        }
    }

    pub fn is_full(&self) -> bool {
        match self {
            Node::Leaf(_) => false,
            Node::Node4(n) => n.is_full(),
            Node::Node16(n) => n.is_full(),
            Node::Node48(n) => n.is_full(),
            Node::Node256(n) => n.is_full(),
        }
    }

    /// Children in ascending key-byte order, regardless of variant.
    pub fn children_ascending(&self) -> Vec<(u8, NodeId)> {
        match self {
            Node::Leaf(_) => Vec::new(),
            Node::Node4(n) => n.children_ascending().collect(),
            Node::Node16(n) => n.children_ascending().collect(),
            Node::Node48(n) => n.children_ascending().collect(),
            Node::Node256(n) => n.children_ascending().collect(),
        }
    }
}

/// Index-addressed storage for `Node`s. Growth/shrink transitions replace a
/// node in place at the same `NodeId`; removal tombstones the slot so the id
/// is never silently reused while a stale handle might still reference it
/// (this port never hands out a removed id again except through a fresh
/// `alloc`, at which point no live handle to the old occupant can remain,
/// since the tree is a strict parent-to-child DAG with no back-references).
#[derive(Debug, Default)]
pub struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Some(node));
            NodeId((self.slots.len() - 1) as u32)
        }
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.slots[id.index()]
            .as_ref()
            .expect("NodeId referenced a removed slot")
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.index()]
            .as_mut()
            .expect("NodeId referenced a removed slot")
    }

    pub fn take(&mut self, id: NodeId) -> Node {
        self.slots[id.index()]
            .take()
            .expect("NodeId referenced a removed slot")
    }

    pub fn replace(&mut self, id: NodeId, node: Node) {
        self.slots[id.index()] = Some(node);
    }

    pub fn remove(&mut self, id: NodeId) -> Node {
        let node = self.take(id);
        self.free.push(id.0);
        node
    }

    /// Frees a slot whose content has already been moved out via `take`
    /// (the slot is already `None`). Used by path-compression merges
    /// where a wrapper `Node4` is spliced out of the tree
    /// after its single surviving child has taken over its identity.
    pub fn free_taken(&mut self, id: NodeId) {
        debug_assert!(self.slots[id.index()].is_none());
        self.free.push(id.0);
    }

    /// Grows the node at `id` to the next-larger representation if it's
    /// full, returning the (possibly replaced) variant's current capacity
    /// state. Growth thresholds: N4 -> N16 on the 5th child, N16 -> N48 on
    /// the 17th, N48 -> N256 on the 49th.
    pub fn grow_if_full(&mut self, id: NodeId) {
        let needs_grow = matches!(self.get(id), n if n.is_full() && !n.is_leaf());
        if !needs_grow {
            return;
        }
        let old = self.take(id);
        let grown = match old {
            Node::Node4(n) => Node::Node16(Node16::grow_from(n)),
            Node::Node16(n) => Node::Node48(Node48::grow_from(n)),
            Node::Node48(n) => Node::Node256(Node256::grow_from(n)),
            other => other,
        };
        self.replace(id, grown);
    }

    /// Shrinks the node at `id` to the next-smaller representation if its
    /// population has crossed a shrink threshold on delete. Thresholds:
    /// N256 -> N48 at 37 children, N48 -> N16 at 12, N16 -> N4 at 3.
    pub fn shrink_if_sparse(&mut self, id: NodeId) {
        let shrink = match self.get(id) {
            Node::Node256(n) => n.num_children as usize <= 37,
            Node::Node48(n) => n.num_children as usize <= 12,
            Node::Node16(n) => n.num_children as usize <= 3,
            _ => false,
        };
        if !shrink {
            return;
        }
        let old = self.take(id);
        let shrunk = match old {
            Node::Node256(n) => Node::Node48(shrink_256_to_48(n)),
            Node::Node48(n) => Node::Node16(shrink_48_to_16(n)),
            Node::Node16(n) => Node::Node4(shrink_16_to_4(n)),
            other => other,
        };
        self.replace(id, shrunk);
    }
}

fn shrink_256_to_48(n256: Node256) -> Node48 {
    let mut n48 = Node48 {
        header: n256.header,
        num_children: 0,
        keys: Box::new([0; 256]),
        children: [None; 48],
    };
    for (byte, child) in n256.children_ascending() {
        let slot = n48.num_children as usize;
        n48.children[slot] = Some(child);
        n48.keys[byte as usize] = (slot + 1) as u8;
        n48.num_children += 1;
    }
    n48
}

fn shrink_48_to_16(n48: Node48) -> Node16 {
    let mut n16 = Node16 {
        header: n48.header,
        num_children: 0,
        keys: [0; 16],
        children: [None; 16],
    };
    for (byte, child) in n48.children_ascending() {
        let slot = n16.num_children as usize;
        n16.keys[slot] = byte;
        n16.children[slot] = Some(child);
        n16.num_children += 1;
    }
    n16
}

fn shrink_16_to_4(n16: Node16) -> Node4 {
    let mut n4 = Node4 {
        header: n16.header,
        num_children: 0,
        keys: [0; 4],
        children: [None; 4],
    };
    for (byte, child) in n16.children_ascending() {
        let slot = n4.num_children as usize;
        n4.keys[slot] = byte;
        n4.children[slot] = Some(child);
        n4.num_children += 1;
    }
    n4
}
