//! # duelrank-core
//!
//! The deterministic comparison-driven ranking engine - THE LOGIC.
//!
//! This crate builds a personal ordering over a read-only item catalog
//! from a stream of pairwise "which do you prefer?" decisions. Each
//! decision moves at most one item; the rest of the order is never
//! reshuffled behind the user's back.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Owns the ranking state and the only code that mutates it
//! - Is deterministic given a catalog, a decision stream, and an RNG
//!   seed: integer arithmetic only, `BTreeMap`-backed collections,
//!   randomness injected by the caller
//! - Never panics; every recoverable fault (dangling id, malformed
//!   persisted state, corrupt share code) degrades to a safe default
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod pool;
pub mod primitives;
pub mod scoring;
pub mod seeder;
pub mod selector;
pub mod session;
pub mod storage;
pub mod types;
pub mod updater;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Catalog, Item, ItemId, MergePolicy, Outcome, Pair, RankError, RankingState, Signals,
};

// =============================================================================
// RE-EXPORTS: Ranking Engine
// =============================================================================

pub use pool::{CandidatePool, FocusCursor};
pub use primitives::EngineParams;
pub use scoring::prior_score;
pub use seeder::consensus_order;
pub use selector::next_pair;
pub use session::{RankSession, StorageBackend};
pub use storage::RedbStore;
pub use updater::apply_outcome;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{ShareHeader, decode_ranking, encode_ranking};
