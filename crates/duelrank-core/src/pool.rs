//! # Candidate Pool
//!
//! The bounded working set PairSelector and ConsensusSeeder draw from:
//! the top-K catalog items by prior score, plus the sliding focus
//! window that guarantees coverage across the pool over repeated
//! rounds.

use crate::primitives::EngineParams;
use crate::scoring::prior_score;
use crate::types::{Catalog, ItemId};
use std::collections::BTreeMap;

// =============================================================================
// CANDIDATE POOL
// =============================================================================

/// The top-`limit` catalog items, ascending by prior score.
///
/// Ties resolve by item id: the underlying sort is stable over the
/// catalog's deterministic id-ordered iteration, so an identical
/// catalog always yields an identical pool.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    ids: Vec<ItemId>,
    positions: BTreeMap<ItemId, usize>,
}

impl CandidatePool {
    /// Derive the pool from the full catalog.
    ///
    /// Takes all items when the catalog holds fewer than `limit`.
    #[must_use]
    pub fn build(catalog: &Catalog, limit: usize) -> Self {
        let mut scored: Vec<(u32, ItemId)> = catalog
            .iter()
            .map(|item| (prior_score(item), item.id))
            .collect();
        scored.sort_by_key(|&(score, _)| score);
        scored.truncate(limit);

        let ids: Vec<ItemId> = scored.into_iter().map(|(_, id)| id).collect();
        let positions = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { ids, positions }
    }

    /// All pool ids, best prior score first.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// Number of items in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the pool holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Pool position of an id, if it made the cut.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Check pool membership.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Id at a pool position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ItemId> {
        self.ids.get(index).copied()
    }

    /// The focus window: a contiguous slice `[start, start + width)` by
    /// pool position, clamped to pool bounds.
    ///
    /// `None` means no focus bias was requested; the window is then the
    /// whole pool.
    #[must_use]
    pub fn focus_window(&self, start: Option<usize>, width: usize) -> &[ItemId] {
        match start {
            None => &self.ids,
            Some(start) => {
                let lo = start.min(self.ids.len());
                let hi = start.saturating_add(width).min(self.ids.len());
                &self.ids[lo..hi]
            }
        }
    }
}

// =============================================================================
// FOCUS CURSOR
// =============================================================================

/// Process-local round cursor selecting the active focus window.
///
/// Advances by exactly one step (mod the round count) after each
/// accepted comparison. Losing it across a restart is acceptable; it
/// simply resets to round 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusCursor {
    round: usize,
    rounds: usize,
}

impl FocusCursor {
    /// A cursor at round 0.
    #[must_use]
    pub fn new(params: &EngineParams) -> Self {
        Self {
            round: 0,
            rounds: params.focus_rounds,
        }
    }

    /// Resume a cursor at a remembered round, wrapped into range.
    #[must_use]
    pub fn resume(round: usize, params: &EngineParams) -> Self {
        let rounds = params.focus_rounds;
        Self {
            round: if rounds == 0 { 0 } else { round % rounds },
            rounds,
        }
    }

    /// Current round index.
    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    /// Start index of the current focus window.
    #[must_use]
    pub fn window_start(&self, width: usize) -> usize {
        self.round.saturating_mul(width)
    }

    /// Step to the next round, wrapping after the last.
    pub fn advance(&mut self) {
        if self.rounds > 0 {
            self.round = (self.round + 1) % self.rounds;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
