//! # Ranking Session
//!
//! The façade tying the engine together: one session owns the catalog,
//! the candidate pool, the focus cursor, and a storage backend, and
//! exposes the operations a frontend needs — next pair, accept outcome,
//! seed, reset, export, import.
//!
//! The session never panics and never loses the user's ordering to a
//! recoverable fault: dangling ids are dropped on materialization,
//! malformed persisted state falls back to empty, and a failed share
//! import leaves local state exactly as it was.

use crate::formats::{decode_ranking, encode_ranking};
use crate::pool::{CandidatePool, FocusCursor};
use crate::primitives::EngineParams;
use crate::seeder::consensus_order;
use crate::selector::next_pair;
use crate::storage::RedbStore;
use crate::types::{Catalog, ItemId, MergePolicy, Outcome, Pair, RankError, RankingState};
use crate::updater::apply_outcome;
use rand::Rng;
use std::path::Path;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Where the session's ranking lives.
///
/// `InMemory` serves tests and throwaway sessions; `Persistent` writes
/// through to a redb database after every accepted comparison.
#[derive(Debug)]
pub enum StorageBackend {
    InMemory(RankingState),
    Persistent(RedbStore),
}

// =============================================================================
// SESSION
// =============================================================================

/// A single user's ranking session over one catalog.
#[derive(Debug)]
pub struct RankSession {
    catalog: Catalog,
    backend: StorageBackend,
    pool: CandidatePool,
    cursor: FocusCursor,
    last_pair: Option<Pair>,
    params: EngineParams,
}

impl RankSession {
    /// Create a session with an in-memory backend.
    #[must_use]
    pub fn in_memory(catalog: Catalog, params: EngineParams) -> Self {
        let pool = CandidatePool::build(&catalog, params.pool_limit);
        let cursor = FocusCursor::new(&params);
        Self {
            catalog,
            backend: StorageBackend::InMemory(RankingState::new()),
            pool,
            cursor,
            last_pair: None,
            params,
        }
    }

    /// Open a session backed by a redb database at `path`.
    ///
    /// Resumes the focus cursor and anti-repeat hint persisted by the
    /// previous invocation, so single-shot CLI runs still cycle the
    /// focus window and avoid immediate pair repeats.
    pub fn persistent(
        catalog: Catalog,
        params: EngineParams,
        path: impl AsRef<Path>,
    ) -> Result<Self, RankError> {
        let store = RedbStore::open(path)?;
        let pool = CandidatePool::build(&catalog, params.pool_limit);
        let cursor = FocusCursor::resume(store.load_round(), &params);
        let last_pair = store.load_last_pair();
        Ok(Self {
            catalog,
            backend: StorageBackend::Persistent(store),
            pool,
            cursor,
            last_pair,
            params,
        })
    }

    /// The catalog this session ranks over.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The engine parameters in effect.
    #[must_use]
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Size of the candidate pool.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Current focus round.
    #[must_use]
    pub fn focus_round(&self) -> usize {
        self.cursor.round()
    }

    // =========================================================================
    // RANKING ACCESS
    // =========================================================================

    /// The materialized ranking: the stored order with dangling ids
    /// (items no longer in the catalog) silently dropped.
    #[must_use]
    pub fn ranking(&self) -> RankingState {
        let mut ranking = match &self.backend {
            StorageBackend::InMemory(state) => state.clone(),
            StorageBackend::Persistent(store) => store.load_ranking(),
        };
        let dropped = ranking.retain_known(&self.catalog);
        if dropped > 0 {
            warn(&format!("dropped {} dangling ranking ids", dropped));
        }
        ranking
    }

    /// Number of ranked items (after dangling-id cleanup).
    #[must_use]
    pub fn ranked_len(&self) -> usize {
        self.ranking().len()
    }

    /// Unranked pool items in consensus order, capped at `limit`.
    #[must_use]
    pub fn unranked_suggestions(&self, limit: usize) -> Vec<ItemId> {
        let ranking = self.ranking();
        consensus_order(&self.catalog)
            .into_iter()
            .filter(|&id| self.pool.contains(id) && !ranking.contains(id))
            .take(limit)
            .collect()
    }

    // =========================================================================
    // SEEDING & RESET
    // =========================================================================

    /// Seed the ranking with the full consensus order if, and only if,
    /// no ranking exists yet. Returns whether seeding happened.
    pub fn seed_if_empty(&mut self) -> Result<bool, RankError> {
        if !self.ranking().is_empty() {
            return Ok(false);
        }
        let seeded = RankingState::from_order(consensus_order(&self.catalog));
        self.store_ranking(seeded)?;
        Ok(true)
    }

    /// Discard the ranking and all session continuation state.
    pub fn reset(&mut self) -> Result<(), RankError> {
        match &mut self.backend {
            StorageBackend::InMemory(state) => *state = RankingState::new(),
            StorageBackend::Persistent(store) => store.clear()?,
        }
        self.cursor = FocusCursor::new(&self.params);
        self.last_pair = None;
        Ok(())
    }

    // =========================================================================
    // COMPARISON LOOP
    // =========================================================================

    /// Select the next pair to present.
    ///
    /// `None` means the pool is too small to form a pair; there is no
    /// other failure mode.
    pub fn next_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Pair> {
        let ranking = self.ranking();
        let focus_start = Some(self.cursor.window_start(self.params.window_width));
        next_pair(
            &self.pool,
            &ranking,
            self.last_pair,
            focus_start,
            &self.params,
            rng,
        )
    }

    /// Accept one pairwise decision and fold it into the ranking.
    ///
    /// Self-comparisons and outcomes naming unknown items are discarded
    /// with a warning; they never corrupt the ordering.
    pub fn accept(&mut self, outcome: Outcome) -> Result<(), RankError> {
        if outcome.winner == outcome.loser {
            warn("ignored self-comparison outcome");
            return Ok(());
        }
        if !self.catalog.contains(outcome.winner) || !self.catalog.contains(outcome.loser) {
            warn("ignored outcome naming unknown item");
            return Ok(());
        }

        let ranking = self.ranking();
        let updated = RankingState::from_order(apply_outcome(&ranking.order, outcome));

        let pair = Pair::from(outcome);
        let mut cursor = self.cursor;
        cursor.advance();

        // Persist first; the in-memory cursor and anti-repeat hint only
        // move once the write is durable, so they never diverge from disk.
        match &mut self.backend {
            StorageBackend::InMemory(state) => *state = updated,
            StorageBackend::Persistent(store) => {
                store.commit_comparison(&updated, cursor.round(), pair)?;
            }
        }

        self.cursor = cursor;
        self.last_pair = Some(pair);
        Ok(())
    }

    // =========================================================================
    // SHARE CODEC
    // =========================================================================

    /// Encode the current ranking as a URL-safe share string.
    pub fn export_share(&self) -> Result<String, RankError> {
        encode_ranking(&self.ranking())
    }

    /// Import a share string under the given merge policy.
    ///
    /// Returns the materialized ranking length after import. A decode
    /// failure propagates as [`RankError::DecodeFailure`] with local
    /// state untouched; an empty decoded order is a no-op.
    pub fn import_share(&mut self, encoded: &str, policy: MergePolicy) -> Result<usize, RankError> {
        let mut incoming = decode_ranking(encoded)?;
        let dropped = incoming.retain_known(&self.catalog);
        if dropped > 0 {
            warn(&format!("dropped {} unknown ids from imported ranking", dropped));
        }
        if incoming.is_empty() {
            return Ok(self.ranked_len());
        }

        let merged = match policy {
            MergePolicy::Replace => incoming,
            MergePolicy::Merge => RankingState::merged(&incoming, &self.ranking()),
        };
        self.store_ranking(merged)?;
        Ok(self.ranked_len())
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn store_ranking(&mut self, ranking: RankingState) -> Result<(), RankError> {
        match &mut self.backend {
            StorageBackend::InMemory(state) => {
                *state = ranking;
                Ok(())
            }
            StorageBackend::Persistent(store) => store.replace_ranking(&ranking),
        }
    }
}

/// Structured stderr warning; the app layer owns real logging.
fn warn(message: &str) {
    eprintln!(
        "{{\"level\":\"warn\",\"target\":\"duelrank_core::session\",\"message\":\"{}\"}}",
        message
    );
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Item, Signals};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn catalog_of(n: u64) -> Catalog {
        Catalog::from_items((1..=n).map(|k| {
            Item::new(ItemId(k), format!("Item {k:03}"), "TST").with_signals(Signals {
                overall_rank: Some(k as u32),
                ..Signals::default()
            })
        }))
    }

    fn session_of(n: u64) -> RankSession {
        RankSession::in_memory(catalog_of(n), EngineParams::default())
    }

    #[test]
    fn fresh_session_has_empty_ranking() {
        let session = session_of(10);
        assert!(session.ranking().is_empty());
        assert_eq!(session.ranked_len(), 0);
    }

    #[test]
    fn accept_builds_up_an_order() {
        let mut session = session_of(5);

        session
            .accept(Outcome::new(ItemId(2), ItemId(4)))
            .expect("accept");

        let ranking = session.ranking();
        assert_eq!(ranking.order, vec![ItemId(2), ItemId(4)]);
    }

    #[test]
    fn accept_rejects_self_comparison() {
        let mut session = session_of(5);
        session
            .accept(Outcome::new(ItemId(3), ItemId(3)))
            .expect("accept");
        assert!(session.ranking().is_empty());
    }

    #[test]
    fn accept_rejects_unknown_items() {
        let mut session = session_of(5);
        session
            .accept(Outcome::new(ItemId(1), ItemId(99)))
            .expect("accept");
        assert!(session.ranking().is_empty());
    }

    #[test]
    fn rejected_outcome_leaves_cursor_and_hint_untouched() {
        let mut session = session_of(5);
        session
            .accept(Outcome::new(ItemId(1), ItemId(2)))
            .expect("accept");
        let round = session.focus_round();
        let hint = session.last_pair;

        // Neither an unknown item nor a self-comparison moves state.
        session
            .accept(Outcome::new(ItemId(1), ItemId(99)))
            .expect("accept");
        session
            .accept(Outcome::new(ItemId(2), ItemId(2)))
            .expect("accept");

        assert_eq!(session.focus_round(), round);
        assert_eq!(session.last_pair, hint);
    }

    #[test]
    fn accept_advances_focus_round() {
        let mut session = session_of(5);
        assert_eq!(session.focus_round(), 0);

        session
            .accept(Outcome::new(ItemId(1), ItemId(2)))
            .expect("accept");

        assert_eq!(session.focus_round(), 1);
    }

    #[test]
    fn next_pair_never_self_pairs() {
        let session = session_of(30);
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..100 {
            let pair = session.next_pair(&mut rng).expect("pair");
            assert!(!pair.is_self_pair());
        }
    }

    #[test]
    fn next_pair_none_below_two_items() {
        let session = session_of(1);
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(session.next_pair(&mut rng).is_none());
    }

    #[test]
    fn accepted_pair_is_not_repeated_immediately() {
        let mut session = session_of(30);
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..50 {
            let pair = session.next_pair(&mut rng).expect("pair");
            if let Some(last) = session.last_pair {
                assert!(!pair.same_unordered(&last));
            }
            session
                .accept(Outcome::new(pair.0, pair.1))
                .expect("accept");
        }
    }

    #[test]
    fn seed_if_empty_seeds_once() {
        let mut session = session_of(8);

        assert!(session.seed_if_empty().expect("seed"));
        assert_eq!(session.ranked_len(), 8);

        // Second call is a no-op.
        assert!(!session.seed_if_empty().expect("seed"));
    }

    #[test]
    fn seed_preserves_existing_ranking() {
        let mut session = session_of(8);
        session
            .accept(Outcome::new(ItemId(5), ItemId(2)))
            .expect("accept");

        assert!(!session.seed_if_empty().expect("seed"));
        assert_eq!(session.ranking().order, vec![ItemId(5), ItemId(2)]);
    }

    #[test]
    fn reset_discards_everything() {
        let mut session = session_of(8);
        session.seed_if_empty().expect("seed");
        session
            .accept(Outcome::new(ItemId(5), ItemId(2)))
            .expect("accept");

        session.reset().expect("reset");

        assert!(session.ranking().is_empty());
        assert_eq!(session.focus_round(), 0);
        assert!(session.last_pair.is_none());
    }

    #[test]
    fn export_import_replace_roundtrip() {
        let mut source = session_of(8);
        source
            .accept(Outcome::new(ItemId(3), ItemId(7)))
            .expect("accept");
        let code = source.export_share().expect("export");

        let mut target = session_of(8);
        target
            .accept(Outcome::new(ItemId(1), ItemId(2)))
            .expect("accept");
        target
            .import_share(&code, MergePolicy::Replace)
            .expect("import");

        assert_eq!(target.ranking().order, vec![ItemId(3), ItemId(7)]);
    }

    #[test]
    fn import_merge_keeps_local_tail() {
        let mut source = session_of(8);
        source
            .accept(Outcome::new(ItemId(3), ItemId(7)))
            .expect("accept");
        let code = source.export_share().expect("export");

        let mut target = session_of(8);
        target
            .accept(Outcome::new(ItemId(7), ItemId(1)))
            .expect("accept");
        target
            .import_share(&code, MergePolicy::Merge)
            .expect("import");

        // Incoming first, then local ids not already present.
        assert_eq!(
            target.ranking().order,
            vec![ItemId(3), ItemId(7), ItemId(1)]
        );
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut session = session_of(8);
        session
            .accept(Outcome::new(ItemId(1), ItemId(2)))
            .expect("accept");
        let before = session.ranking();

        assert!(session.import_share("not a share code", MergePolicy::Replace).is_err());
        assert_eq!(session.ranking(), before);
    }

    #[test]
    fn import_of_unknown_ids_only_is_noop() {
        let code = encode_ranking(&RankingState::from_order(vec![ItemId(900), ItemId(901)]))
            .expect("encode");

        let mut session = session_of(8);
        session
            .accept(Outcome::new(ItemId(1), ItemId(2)))
            .expect("accept");
        session
            .import_share(&code, MergePolicy::Replace)
            .expect("import");

        assert_eq!(session.ranking().order, vec![ItemId(1), ItemId(2)]);
    }

    #[test]
    fn unranked_suggestions_follow_consensus_order() {
        let mut session = session_of(6);
        session
            .accept(Outcome::new(ItemId(3), ItemId(1)))
            .expect("accept");

        let suggestions = session.unranked_suggestions(10);
        assert_eq!(
            suggestions,
            vec![ItemId(2), ItemId(4), ItemId(5), ItemId(6)]
        );
    }

    #[test]
    fn persistent_session_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.db");
        let catalog = catalog_of(10);

        {
            let mut session =
                RankSession::persistent(catalog.clone(), EngineParams::default(), &path)
                    .expect("open");
            session
                .accept(Outcome::new(ItemId(4), ItemId(9)))
                .expect("accept");
        }

        let session = RankSession::persistent(catalog, EngineParams::default(), &path)
            .expect("reopen");
        assert_eq!(session.ranking().order, vec![ItemId(4), ItemId(9)]);
        assert_eq!(session.focus_round(), 1);
        assert_eq!(session.last_pair, Some(Pair(ItemId(4), ItemId(9))));
    }

    #[test]
    fn dangling_ids_dropped_on_materialization() {
        let catalog = catalog_of(3);
        let mut session = RankSession::in_memory(catalog, EngineParams::default());
        session.backend = StorageBackend::InMemory(RankingState::from_order(vec![
            ItemId(2),
            ItemId(42),
            ItemId(1),
        ]));

        assert_eq!(session.ranking().order, vec![ItemId(2), ItemId(1)]);
    }
}
