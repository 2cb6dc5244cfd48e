//! # redb-backed Ranking Store
//!
//! Persists the user's ranking in a redb embedded database:
//! - ACID transactions, so each accepted comparison is an atomic
//!   replace-on-write of the full ordering
//! - Crash safety (copy-on-write B-trees)
//! - Zero configuration
//!
//! Malformed or missing persisted state is never a hard failure: the
//! store logs a structured warning and hands back the empty ranking, so
//! the session simply starts over from the consensus seed.

use crate::types::{Pair, RankError, RankingState};
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for ranking values: fixed key -> postcard bytes.
const RANKINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("rankings");

/// Table for session metadata: key string -> value u64.
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// The fixed key the active ranking lives under. One store serves one
/// user/device; multi-user isolation happens a layer above by giving
/// each session its own database path.
const RANKING_KEY: &str = "ranking";

/// Metadata keys for the resumable focus round and last shown pair.
const ROUND_KEY: &str = "focus_round";
const LAST_PAIR_A_KEY: &str = "last_pair_a";
const LAST_PAIR_B_KEY: &str = "last_pair_b";

/// Log a recovery and fall back to the default value.
///
/// Keeps the core free of a logging dependency; the app layer can
/// redirect stderr into tracing if needed.
fn log_and_default<T: Default>(result: Result<T, RankError>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!(
                "{{\"level\":\"warn\",\"target\":\"duelrank_core::storage\",\"message\":\"recovered in {}: {}\"}}",
                context, e
            );
            T::default()
        }
    }
}

/// A disk-backed ranking store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a ranking database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RankError> {
        let db = Database::create(path.as_ref()).map_err(|e| RankError::IoError(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| RankError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(RANKINGS)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(METADATA)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| RankError::IoError(e.to_string()))?;
        }

        Ok(Self { db })
    }

    // =========================================================================
    // RANKING VALUE
    // =========================================================================

    /// Load the persisted ranking.
    ///
    /// Absent or malformed state is recovered as the empty ranking; it
    /// is never propagated as a failure.
    #[must_use]
    pub fn load_ranking(&self) -> RankingState {
        log_and_default(self.try_load_ranking(), "load_ranking")
    }

    fn try_load_ranking(&self) -> Result<RankingState, RankError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| RankError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(RANKINGS)
            .map_err(|e| RankError::IoError(e.to_string()))?;

        let Some(guard) = table
            .get(RANKING_KEY)
            .map_err(|e| RankError::IoError(e.to_string()))?
        else {
            return Ok(RankingState::new());
        };

        postcard::from_bytes(guard.value())
            .map_err(|e| RankError::SerializationError(format!("malformed ranking value: {}", e)))
    }

    /// Atomically replace the persisted ranking.
    pub fn replace_ranking(&self, ranking: &RankingState) -> Result<(), RankError> {
        let bytes = postcard::to_stdvec(ranking)
            .map_err(|e| RankError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| RankError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(RANKINGS)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            table
                .insert(RANKING_KEY, bytes.as_slice())
                .map_err(|e| RankError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| RankError::IoError(e.to_string()))
    }

    // =========================================================================
    // SESSION CONTINUATION
    // =========================================================================

    /// Load the remembered focus round (0 when absent or unreadable —
    /// the cursor has no persistence requirement).
    #[must_use]
    pub fn load_round(&self) -> usize {
        log_and_default(self.try_load_meta(ROUND_KEY), "load_round")
            .map(|v| v as usize)
            .unwrap_or(0)
    }

    /// Load the last shown pair, used as the anti-repeat hint.
    #[must_use]
    pub fn load_last_pair(&self) -> Option<Pair> {
        let a = log_and_default(self.try_load_meta(LAST_PAIR_A_KEY), "load_last_pair")?;
        let b = log_and_default(self.try_load_meta(LAST_PAIR_B_KEY), "load_last_pair")?;
        Some(Pair(crate::types::ItemId(a), crate::types::ItemId(b)))
    }

    fn try_load_meta(&self, key: &str) -> Result<Option<u64>, RankError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| RankError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(METADATA)
            .map_err(|e| RankError::IoError(e.to_string()))?;
        Ok(table
            .get(key)
            .map_err(|e| RankError::IoError(e.to_string()))?
            .map(|v| v.value()))
    }

    /// Persist one accepted comparison in a single transaction: the new
    /// ordering, the advanced focus round, and the pair just shown.
    ///
    /// Batching keeps fsync overhead at one commit per comparison and
    /// guarantees the three values never diverge on disk.
    pub fn commit_comparison(
        &self,
        ranking: &RankingState,
        round: usize,
        last_pair: Pair,
    ) -> Result<(), RankError> {
        let bytes = postcard::to_stdvec(ranking)
            .map_err(|e| RankError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| RankError::IoError(e.to_string()))?;
        {
            let mut rankings = write_txn
                .open_table(RANKINGS)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            rankings
                .insert(RANKING_KEY, bytes.as_slice())
                .map_err(|e| RankError::IoError(e.to_string()))?;

            let mut meta = write_txn
                .open_table(METADATA)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            meta.insert(ROUND_KEY, round as u64)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            meta.insert(LAST_PAIR_A_KEY, last_pair.0.0)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            meta.insert(LAST_PAIR_B_KEY, last_pair.1.0)
                .map_err(|e| RankError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| RankError::IoError(e.to_string()))
    }

    /// Remove all persisted state (explicit reset).
    pub fn clear(&self) -> Result<(), RankError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| RankError::IoError(e.to_string()))?;
        {
            let mut rankings = write_txn
                .open_table(RANKINGS)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            rankings
                .remove(RANKING_KEY)
                .map_err(|e| RankError::IoError(e.to_string()))?;

            let mut meta = write_txn
                .open_table(METADATA)
                .map_err(|e| RankError::IoError(e.to_string()))?;
            for key in [ROUND_KEY, LAST_PAIR_A_KEY, LAST_PAIR_B_KEY] {
                meta.remove(key)
                    .map_err(|e| RankError::IoError(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| RankError::IoError(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
