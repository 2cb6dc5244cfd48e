//! # Core Type Definitions
//!
//! This module contains all core types for the duelrank ranking engine:
//! - Item identity and external signals (`ItemId`, `Signals`, `Item`)
//! - The read-only item catalog (`Catalog`)
//! - The persisted user ordering (`RankingState`)
//! - Transient comparison types (`Outcome`, `Pair`)
//! - Import merge policy (`MergePolicy`)
//! - Error types (`RankError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where needed for deterministic `BTreeMap` iteration
//! - Treat missing external signals as explicit `Option::None`, never as
//!   a runtime-inspected dynamic value

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

// =============================================================================
// ITEM IDENTITY & SIGNALS
// =============================================================================

/// Unique identifier for a catalog item.
///
/// Ids are assigned by the external catalog collaborator and are stable
/// across sessions; the core never mints ids of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Optional external signals attached to an item.
///
/// Items may carry none, some, or all of these. They feed the prior
/// score and the consensus seed only; user comparisons never touch them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Signals {
    /// External overall projection rank (1 = best).
    pub overall_rank: Option<u32>,
    /// Secondary top-N consensus rank (1 = best).
    pub consensus_rank: Option<u32>,
    /// Recent-performance point total (higher = better).
    pub recent_points: Option<u32>,
}

impl Signals {
    /// True when no external signal is present at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.overall_rank.is_none() && self.consensus_rank.is_none() && self.recent_points.is_none()
    }
}

/// A catalog item. Immutable as far as this engine is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable external identifier.
    pub id: ItemId,
    /// Display name, also the final deterministic seeding tie-break.
    pub name: String,
    /// Short team/club code, carried for display only.
    #[serde(default)]
    pub team: String,
    /// Optional external signals.
    #[serde(default)]
    pub signals: Signals,
}

impl Item {
    /// Create an item with no signals.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            team: team.into(),
            signals: Signals::default(),
        }
    }

    /// Attach signals (builder style, used heavily in tests).
    #[must_use]
    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = signals;
        self
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// The read-only item catalog supplied by an external collaborator.
///
/// Backed by a `BTreeMap` so iteration order is deterministic (ascending
/// id). The engine never creates, mutates, or deletes catalog items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    items: BTreeMap<ItemId, Item>,
}

impl Catalog {
    /// Build a catalog from externally supplied items.
    ///
    /// Duplicate ids keep the last occurrence, matching replace-on-write
    /// semantics of the upstream data feed.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }

    /// Lookup an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Check whether an id refers to a live catalog item.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Iterate all items in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the catalog holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// RANKING STATE
// =============================================================================

/// The user's persisted ordering. Position 0 is "most preferred".
///
/// Invariant: no id appears twice. Ids referencing items no longer in
/// the catalog are a recoverable inconsistency, dropped on
/// materialization rather than treated as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingState {
    /// Ordered item ids, best first.
    pub order: Vec<ItemId>,
}

impl RankingState {
    /// An empty ranking (no comparisons yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ranking from an explicit order.
    #[must_use]
    pub fn from_order(order: Vec<ItemId>) -> Self {
        Self { order }
    }

    /// True when no item has been placed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of ranked ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Position of an id, if ranked.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.order.iter().position(|&x| x == id)
    }

    /// Check whether an id is ranked.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.order.contains(&id)
    }

    /// Drop entries that no longer reference a live catalog item.
    ///
    /// Returns the number of dangling ids removed. Dangling ids are a
    /// recoverable inconsistency, never a fatal error.
    pub fn retain_known(&mut self, catalog: &Catalog) -> usize {
        let before = self.order.len();
        self.order.retain(|&id| catalog.contains(id));
        before - self.order.len()
    }

    /// Merge an imported order with a local one.
    ///
    /// The incoming order wins: its ids come first, then local ids not
    /// already present, de-duplicated by first-seen position.
    #[must_use]
    pub fn merged(incoming: &Self, local: &Self) -> Self {
        let mut seen = BTreeSet::new();
        let mut order = Vec::with_capacity(incoming.order.len() + local.order.len());
        for &id in incoming.order.iter().chain(local.order.iter()) {
            if seen.insert(id) {
                order.push(id);
            }
        }
        Self { order }
    }
}

// =============================================================================
// COMPARISON TYPES
// =============================================================================

/// One accepted pairwise decision: `winner` beats `loser`.
///
/// Transient — consumed by the updater and remembered only as the
/// last-pair exclusion hint for the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: ItemId,
    pub loser: ItemId,
}

impl Outcome {
    /// Create an outcome.
    #[must_use]
    pub const fn new(winner: ItemId, loser: ItemId) -> Self {
        Self { winner, loser }
    }
}

/// An unordered pair of items presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair(pub ItemId, pub ItemId);

impl Pair {
    /// True when both pairs contain the same two ids, in either order.
    #[must_use]
    pub fn same_unordered(&self, other: &Self) -> bool {
        (self.0 == other.0 && self.1 == other.1) || (self.0 == other.1 && self.1 == other.0)
    }

    /// True when the pair contains the given id.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.0 == id || self.1 == id
    }

    /// True when both sides are the same id. Such a pair is never valid.
    #[must_use]
    pub fn is_self_pair(&self) -> bool {
        self.0 == self.1
    }
}

impl From<Outcome> for Pair {
    fn from(outcome: Outcome) -> Self {
        Self(outcome.winner, outcome.loser)
    }
}

// =============================================================================
// MERGE POLICY
// =============================================================================

/// How an imported (decoded) ranking combines with the local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Replace the local order outright.
    #[default]
    Replace,
    /// Incoming order first, then local ids not already present.
    Merge,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the duelrank engine.
///
/// - No silent failures: recoverable conditions are logged, not dropped
/// - The engine never panics; all errors are recoverable
/// - Malformed persisted state and decode failures never propagate as
///   hard failures past the layer that detects them
#[derive(Debug, Error)]
pub enum RankError {
    /// An I/O error occurred in the persistence layer.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A shareable ranking string could not be decoded.
    ///
    /// Callers must treat this as a no-op import: local state stays
    /// exactly as it was.
    #[error("Decode failure: {0}")]
    DecodeFailure(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_empty_detection() {
        assert!(Signals::default().is_empty());
        let with_rank = Signals {
            overall_rank: Some(1),
            ..Signals::default()
        };
        assert!(!with_rank.is_empty());
    }

    #[test]
    fn catalog_deterministic_iteration() {
        let catalog = Catalog::from_items(vec![
            Item::new(ItemId(3), "C", "AAA"),
            Item::new(ItemId(1), "A", "BBB"),
            Item::new(ItemId(2), "B", "CCC"),
        ]);
        let ids: Vec<_> = catalog.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![ItemId(1), ItemId(2), ItemId(3)]);
    }

    #[test]
    fn retain_known_drops_dangling_ids() {
        let catalog = Catalog::from_items(vec![Item::new(ItemId(1), "A", "AAA")]);
        let mut ranking = RankingState::from_order(vec![ItemId(1), ItemId(99)]);

        let dropped = ranking.retain_known(&catalog);

        assert_eq!(dropped, 1);
        assert_eq!(ranking.order, vec![ItemId(1)]);
    }

    #[test]
    fn merged_incoming_wins_and_dedups() {
        let incoming = RankingState::from_order(vec![ItemId(5), ItemId(1)]);
        let local = RankingState::from_order(vec![ItemId(1), ItemId(2), ItemId(5), ItemId(3)]);

        let merged = RankingState::merged(&incoming, &local);

        assert_eq!(
            merged.order,
            vec![ItemId(5), ItemId(1), ItemId(2), ItemId(3)]
        );
    }

    #[test]
    fn pair_unordered_equality() {
        let a = Pair(ItemId(1), ItemId(2));
        let b = Pair(ItemId(2), ItemId(1));
        let c = Pair(ItemId(1), ItemId(3));

        assert!(a.same_unordered(&b));
        assert!(!a.same_unordered(&c));
    }

    #[test]
    fn self_pair_detection() {
        assert!(Pair(ItemId(7), ItemId(7)).is_self_pair());
        assert!(!Pair(ItemId(7), ItemId(8)).is_self_pair());
    }
}
