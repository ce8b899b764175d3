// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the ART core.
//!
//! This taxonomy is deliberately narrow: a missing key is a `None`,
//! not a fault; a repeat document insert is idempotent, not a fault;
//! structural corruption is fatal. This module only covers the third case,
//! plus the handful of genuinely caller-facing construction errors (an
//! empty key, an out-of-range scalar encoding buffer) that don't fit the
//! "nullable result" or "idempotent" shapes.

use std::fmt;

/// Errors a caller can actually receive from the public API.
///
/// Structural corruption is not a
/// variant here: it is unrecoverable by definition, so it panics via
/// `contracts::*` rather than being threaded through `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtError {
    /// A key of length zero was passed to an operation that requires at
    /// least one byte.
    EmptyKey,
    /// A query term passed to fuzzy search exceeded the row-width the
    /// caller requested via `max_cost`/`min_cost` (min_cost > max_cost).
    InvalidCostRange { min_cost: u32, max_cost: u32 },
}

impl fmt::Display for ArtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtError::EmptyKey => write!(f, "key must contain at least one byte"),
            ArtError::InvalidCostRange { min_cost, max_cost } => write!(
                f,
                "min_cost ({min_cost}) must be <= max_cost ({max_cost})"
            ),
        }
    }
}

impl std::error::Error for ArtError {}
