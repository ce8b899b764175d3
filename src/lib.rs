// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(feature = "simd", feature(portable_simd))]

//! An Adaptive Radix Trie term index: the in-memory core of a full-text
//! search engine's inverted index.
//!
//! Maps byte-string keys (tokens, or numerically-encoded scalars via
//! [`encoding`]) to compressed posting lists of `(document id, score, term
//! offsets)`. Supports point lookup, deletion, prefix iteration,
//! Damerau-Levenshtein fuzzy search with best-first top-k ranking, and
//! range queries over encoded integers and floats.
//!
//! ```
//! use art_index::{Document, Order, Tree};
//!
//! let mut tree = Tree::new();
//! tree.insert(b"cat", Document { id: 1, score: 10, offsets: vec![2, 5] }).unwrap();
//! tree.insert(b"car", Document { id: 2, score: 20, offsets: vec![1] }).unwrap();
//!
//! assert!(tree.search(b"cat").unwrap().contains(1));
//!
//! let fuzzy = tree.fuzzy_search(b"cot", 0, 1, 10, Order::Score, false, &[]).unwrap();
//! assert_eq!(fuzzy.len(), 1);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────┐
//! │ sorted_seq.rs│──▶│  posting.rs   │──▶│   node.rs    │
//! │  (id set)    │   │  (postings)   │   │  (layouts)   │
//! └──────────────┘   └───────────────┘   └──────┬───────┘
//!                                                │
//!                     ┌──────────────────────────┴──────┐
//!                     ▼                                 ▼
//!              ┌────────────┐                    ┌─────────────┐
//!              │   tree.rs  │◀──topk.rs───────────│  fuzzy.rs   │
//!              │   (ops)    │◀──encoding.rs       │    (DL)     │
//!              └────────────┘                      └─────────────┘
//! ```
//!
//! # Non-goals
//!
//! Durability, concurrent multi-writer semantics, and update-in-place of
//! leaf values other than additive document insertion are out of scope.
//! This crate is single-writer/multi-reader;
//! callers that mutate and query concurrently must serialize access
//! themselves (a `RwLock<Tree>` at the call site is sufficient, and is
//! provided behind the `sync` feature as [`sync::SyncTree`]).

pub mod contracts;
pub mod encoding;
mod error;
mod fuzzy;
mod node;
mod posting;
mod simd;
mod sorted_seq;
#[cfg(feature = "sync")]
pub mod sync;
mod topk;
mod tree;

pub use encoding::Comparator;
pub use error::ArtError;
pub use node::{Leaf, MAX_PREFIX_LEN};
pub use posting::{Document, PostingList};
pub use topk::Order;
pub use tree::Tree;
