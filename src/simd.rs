// SPDX-License-Identifier: Apache-2.0

//! SIMD-assisted N16 child lookup.
//!
//! The 16 key bytes of an N16 node are compared against the search byte in
//! one vector equality op, masked to the populated lanes, and the lowest set
//! lane wins — mirroring `find_child`'s `_mm_cmpeq_epi8` + `movemask` +
//! `ctz` sequence in `original_source/src/art.cpp`. The crate forbids
//! `unsafe` (carried from the teacher's lint table), so this uses
//! `std::simd` (portable_simd) rather than raw intrinsics, the same
//! trade-off the teacher already made in `src/util/simd.rs` for its WASM
//! SIMD tier. The scalar fallback is always compiled and is the default;
//! the vector path only activates under the `simd` feature.

#[cfg(feature = "simd")]
use std::simd::{cmp::SimdPartialEq, u8x16};

/// Finds the lane index of `byte` among the first `num_children` entries of
/// `keys`, or `None` if absent. `keys` beyond `num_children` is unspecified
/// padding and must not match.
#[cfg(feature = "simd")]
pub fn find_index_16(keys: &[u8; 16], num_children: u8, byte: u8) -> Option<usize> {
    let hay = u8x16::from_array(*keys);
    let needle = u8x16::splat(byte);
    let eq = hay.simd_eq(needle).to_bitmask();
    let width_mask: u32 = if num_children >= 16 {
        u16::MAX as u32
    } else {
        (1u32 << num_children) - 1
    };
    let hits = (eq as u32) & width_mask;
    if hits == 0 {
        None
    } else {
        Some(hits.trailing_zeros() as usize)
    }
}

#[cfg(not(feature = "simd"))]
pub fn find_index_16(keys: &[u8; 16], num_children: u8, byte: u8) -> Option<usize> {
    keys.iter()
        .take(num_children as usize)
        .position(|&k| k == byte)
}
