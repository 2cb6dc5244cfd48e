//! # Prior Scoring
//!
//! Deterministic, feedback-independent quality estimate for an item.
//! Lower is strictly better; an item with no signals at all scores the
//! [`UNRANKED_SCORE`] sentinel and sorts behind everything scored.
//!
//! The score is the minimum across the available signals, each mapped
//! into one comparable rank-like scale, so an item strong by *any* one
//! signal ranks well:
//! - the overall projection rank is used directly (the primary scale);
//! - the secondary consensus rank is offset by [`CONSENSUS_OFFSET`] so
//!   it only wins ties when no overall rank exists;
//! - the recent point total is clamped to [`POINTS_CAP`] and subtracted
//!   from [`POINTS_CEILING`], inverting it into the same scale.

use crate::primitives::{CONSENSUS_OFFSET, POINTS_CAP, POINTS_CEILING, UNRANKED_SCORE};
use crate::types::Item;

/// Compute the prior score for an item. Pure; total over `Signals`.
#[must_use]
pub fn prior_score(item: &Item) -> u32 {
    let mut score = UNRANKED_SCORE;
    if let Some(rank) = item.signals.overall_rank {
        score = score.min(rank);
    }
    if let Some(rank) = item.signals.consensus_rank {
        score = score.min(rank.saturating_add(CONSENSUS_OFFSET));
    }
    if let Some(points) = item.signals.recent_points {
        score = score.min(POINTS_CEILING.saturating_sub(points.min(POINTS_CAP)));
    }
    score
}

// =============================================================================
// TESTS
// =============================================================================
