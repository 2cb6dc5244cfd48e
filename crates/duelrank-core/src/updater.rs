//! # Ranking Updater
//!
//! Folds one accepted pairwise outcome into the persisted ordering.
//!
//! This is a constraint-propagation move, not a comparison sort: it
//! repairs the single pair in violation and never re-evaluates other
//! pairs. After applying `(W, L)`, `W` appears strictly before `L` and
//! the relative order of every other previously-ordered pair is
//! unchanged. Applying the same outcome twice is a no-op the second
//! time.

use crate::types::{ItemId, Outcome};

/// Apply one outcome to an ordering. Never mutates the input.
///
/// Rules, in priority order:
/// - neither id present: winner at the front, loser at the back;
/// - only the loser present: winner inserted immediately before it;
/// - only the winner present: loser appended;
/// - both present, winner already first: unchanged;
/// - both present, inverted: winner removed and reinserted immediately
///   before the loser's recomputed position.
#[must_use]
pub fn apply_outcome(order: &[ItemId], outcome: Outcome) -> Vec<ItemId> {
    let Outcome { winner, loser } = outcome;
    let mut next: Vec<ItemId> = order.to_vec();

    if winner == loser {
        return next;
    }

    let winner_pos = next.iter().position(|&id| id == winner);
    let loser_pos = next.iter().position(|&id| id == loser);

    match (winner_pos, loser_pos) {
        (None, None) => {
            next.insert(0, winner);
            next.push(loser);
        }
        (None, Some(li)) => {
            next.insert(li, winner);
        }
        (Some(_), None) => {
            next.push(loser);
        }
        (Some(wi), Some(li)) if wi > li => {
            next.remove(wi);
            // li is unchanged by removing an element after it.
            next.insert(li, winner);
        }
        (Some(_), Some(_)) => {} // already consistent
    }

    next
}

// =============================================================================
// TESTS
// =============================================================================
