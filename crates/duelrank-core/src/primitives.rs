//! # Tuned Constants and Engine Parameters
//!
//! Hardcoded defaults for the ranking engine.
//!
//! The selection heuristics carry a handful of tuned constants with no
//! documented derivation beyond observed behavior. They are kept here as
//! named defaults and surfaced through [`EngineParams`] rather than
//! hard-coded at use sites, so deployments can override them.

use serde::Deserialize;

// =============================================================================
// CANDIDATE POOL
// =============================================================================

/// Default size of the candidate pool: the top-K items by prior score
/// eligible for comparison. Items outside the pool surface only through
/// unranked suggestions.
pub const DEFAULT_POOL_LIMIT: usize = 120;

/// Width of one focus window, a contiguous slice of the pool biased
/// toward in a given round.
pub const FOCUS_WINDOW_WIDTH: usize = 12;

/// Number of focus rounds the cursor cycles through. Together with the
/// window width this gives round-robin coverage of the pool's first
/// `FOCUS_ROUNDS * FOCUS_WINDOW_WIDTH` items.
pub const FOCUS_ROUNDS: usize = 10;

// =============================================================================
// PAIR SELECTION
// =============================================================================

/// Pool-position radius used when pairing a ranked item with an
/// unranked newcomer of comparable estimated quality.
pub const NEIGHBOR_RADIUS: usize = 6;

/// Retry bound for the adjacent-pair stages.
pub const ADJACENT_RETRIES: usize = 20;

/// Retry bound for the ranked-vs-unranked stage.
pub const MIX_RETRIES: usize = 30;

/// Retry bound for the random fallback stage. On exhaustion the
/// selector returns the pool's first two items unconditionally, which
/// guarantees termination.
pub const RANDOM_RETRIES: usize = 30;

// =============================================================================
// PRIOR SCORING
// =============================================================================

/// Sentinel prior score for an item with no signals at all: worse than
/// any scored item.
pub const UNRANKED_SCORE: u32 = u32::MAX;

/// Offset applied to the secondary consensus rank so it only wins ties
/// when no overall rank exists. Must be at least the largest plausible
/// consensus rank.
pub const CONSENSUS_OFFSET: u32 = 50;

/// Recent-performance points are clamped to this before inversion.
pub const POINTS_CAP: u32 = 400;

/// Ceiling the clamped point total is subtracted from, mapping higher
/// points to a lower (better) rank-like score in the ~100-500 range.
pub const POINTS_CEILING: u32 = 500;

// =============================================================================
// CONSENSUS SEEDING
// =============================================================================

/// Sentinel for a missing seed-key signal. Larger than any real rank,
/// so unsignaled items sort last.
pub const SEED_SENTINEL: u32 = 9999;

/// Ceiling used to invert point totals inside the seed key (higher
/// points produce a smaller, better key).
pub const SEED_POINTS_CEILING: u32 = 1000;

// =============================================================================
// SHARE CODEC FORMAT
// =============================================================================

/// Magic bytes for the shareable ranking format header.
pub const MAGIC_BYTES: &[u8; 4] = b"DRNK";

/// Current shareable ranking format version.
///
/// Increment this when making breaking changes to the payload layout.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum decoded payload size accepted by the share codec.
///
/// A ranking is a list of u64 ids; even a very large catalog stays far
/// below this. Validated before deserialization to bound allocation.
pub const MAX_SHARE_PAYLOAD_SIZE: usize = 1024 * 1024; // 1 MB

// =============================================================================
// ENGINE PARAMETERS
// =============================================================================

/// Runtime-configurable subset of the tuned constants.
///
/// `Default` mirrors the constants above; deployments may override any
/// field (e.g. from a TOML file in the app layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Candidate pool size (top-K by prior score).
    pub pool_limit: usize,
    /// Focus window width.
    pub window_width: usize,
    /// Number of focus rounds in one cursor cycle.
    pub focus_rounds: usize,
    /// Pool-position radius for ranked-vs-unranked pairing.
    pub neighbor_radius: usize,
    /// Retry bound for adjacent-pair selection.
    pub adjacent_retries: usize,
    /// Retry bound for ranked-vs-unranked selection.
    pub mix_retries: usize,
    /// Retry bound for the random fallback.
    pub random_retries: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            pool_limit: DEFAULT_POOL_LIMIT,
            window_width: FOCUS_WINDOW_WIDTH,
            focus_rounds: FOCUS_ROUNDS,
            neighbor_radius: NEIGHBOR_RADIUS,
            adjacent_retries: ADJACENT_RETRIES,
            mix_retries: MIX_RETRIES,
            random_retries: RANDOM_RETRIES,
        }
    }
}
