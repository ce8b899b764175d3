// SPDX-License-Identifier: Apache-2.0

//! Order-preserving scalar key encodings and range-query descent over
//! them.
//!
//! Ported from `encode_int32`/`encode_int64`/`encode_float` and
//! `art_int_fuzzy_recurse`/`art_int_fuzzy_children`/`art_iter` in
//! `original_source/src/art.cpp`. The original's `i32`/`i64` encoders are
//! big-endian-byte dumps that do not preserve order across the sign bit,
//! kept here unchanged as
//! `encode_i32`/`encode_i64` for byte-for-byte parity with documented
//! behavior elsewhere in the surrounding engine, alongside sign-aware
//! `encode_i32_signed`/`encode_i64_signed` that apply the same
//! sign-bit-XOR transform `encode_float` already uses, for callers that
//! need correct mixed-sign range queries.

use crate::node::{Arena, Node, NodeId};

/// A comparator for range/equality descent, named after the five
/// orderings it can express (`<, <=, =, >=, >`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

/// Big-endian `i32`, expanded to one nibble per output byte (8 bytes
/// total) — `encode_int32` in the original source. Does **not** preserve
/// order across the sign bit: negative values encode to byte sequences
/// greater than positive ones.
pub fn encode_i32(n: i32) -> [u8; 8] {
    nibble_expand(n.to_be_bytes())
}

/// `encode_i32` with the sign bit XORed in first, so the encoded byte
/// order matches signed numeric order across zero (the same transform
/// `encode_float` applies to its `i32` bit pattern).
pub fn encode_i32_signed(n: i32) -> [u8; 8] {
    encode_i32(flip_sign_32(n))
}

/// Big-endian `i64`, 8 bytes directly — `encode_int64` in the original
/// source. Same sign caveat as `encode_i32`.
pub fn encode_i64(n: i64) -> [u8; 8] {
    n.to_be_bytes()
}

/// `encode_i64` with the sign bit XORed in first.
pub fn encode_i64_signed(n: i64) -> [u8; 8] {
    flip_sign_64(n).to_be_bytes()
}

/// IEEE-754 `f32`, order-preserving: reinterpret as `i32`, flip the sign
/// bit (or all bits, for negatives) the way `OrderedBytes`-style float
/// encodings do, then nibble-expand like `encode_i32` — `encode_float` in
/// the original source.
pub fn encode_f32(n: f32) -> [u8; 8] {
    let bits = n.to_bits() as i32;
    let flipped = bits ^ ((bits >> 31) | i32::MIN);
    encode_i32(flipped)
}

fn flip_sign_32(n: i32) -> i32 {
    n ^ i32::MIN
}

fn flip_sign_64(n: i64) -> i64 {
    n ^ i64::MIN
}

fn nibble_expand(bytes: [u8; 4]) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (i, b) in bytes.iter().enumerate() {
        out[2 * i] = (b >> 4) & 0x0F;
        out[2 * i + 1] = b & 0x0F;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Recurse,
    Iterate,
    Abort,
}

fn progress(c: u8, t: u8, comparator: Comparator) -> Progress {
    use Comparator::*;
    match comparator {
        Lt | Le => {
            if c == t {
                Progress::Recurse
            } else if c < t {
                Progress::Iterate
            } else {
                Progress::Abort
            }
        }
        Eq => {
            if c == t {
                Progress::Recurse
            } else {
                Progress::Abort
            }
        }
        Ge | Gt => {
            if c == t {
                Progress::Recurse
            } else if c > t {
                Progress::Iterate
            } else {
                Progress::Abort
            }
        }
    }
}

/// Whether a leaf whose entire subtree already qualifies (we're in
/// "iterate" mode, having diverged from `target` in the accepting
/// direction at some ancestor byte) should actually be emitted.
///
/// Only the strict comparators reject: at a leaf on a strict `<` or `>`
/// query, accept only if the full encoded key differs from the target
/// (otherwise it is an equal, which is excluded).
fn accepts_leaf(key: &[u8], target: &[u8], comparator: Comparator) -> bool {
    match comparator {
        Comparator::Lt | Comparator::Gt => key != target,
        _ => true,
    }
}

/// Collects every leaf under `id` unconditionally (all of them already lie
/// on the qualifying side of `target`), applying the strict-comparator
/// exact-match exclusion at each leaf.
fn iter_all(arena: &Arena, id: NodeId, target: &[u8], comparator: Comparator, out: &mut Vec<NodeId>) {
    match arena.get(id) {
        Node::Leaf(l) => {
            if accepts_leaf(&l.key, target, comparator) {
                out.push(id);
            }
        }
        n => {
            for (_, child) in n.children_ascending() {
                iter_all(arena, child, target, comparator, out);
            }
        }
    }
}

/// The main range-descent recursion: walks a node's own
/// compressed prefix byte-by-byte against `target`, then dispatches each
/// child byte through `progress` to decide whether to recurse, accept the
/// whole subtree, or skip it.
fn recurse(arena: &Arena, id: NodeId, depth: usize, target: &[u8], comparator: Comparator, out: &mut Vec<NodeId>) {
    match arena.get(id) {
        Node::Leaf(l) => {
            if accepts_leaf(&l.key, target, comparator) {
                out.push(id);
            }
        }
        n => {
            let header = n.header().unwrap();
            let stored_len = header.stored_prefix_len();
            let mut d = depth;
            for idx in 0..stored_len {
                if d >= target.len() {
                    break;
                }
                match progress(header.partial[idx], target[d], comparator) {
                    Progress::Abort => return,
                    Progress::Iterate => {
                        iter_all(arena, id, target, comparator, out);
                        return;
                    }
                    Progress::Recurse => d += 1,
                }
            }
            let depth2 = depth + header.partial_len as usize;
            for (byte, child) in n.children_ascending() {
                let t = target.get(depth2).copied().unwrap_or(0);
                match progress(byte, t, comparator) {
                    Progress::Abort => {}
                    Progress::Iterate => iter_all(arena, child, target, comparator, out),
                    Progress::Recurse => recurse(arena, child, depth2 + 1, target, comparator, out),
                }
            }
        }
    }
}

/// Collects every leaf id under `root` satisfying `comparator(decode(key),
/// target)`, where `target` is an encoded scalar key produced by one of
/// this module's `encode_*` functions.
pub fn collect_range(arena: &Arena, root: NodeId, target: &[u8], comparator: Comparator) -> Vec<NodeId> {
    let mut out = Vec::new();
    recurse(arena, root, 0, target, comparator, &mut out);
    out
}
