//! # Pair Selection
//!
//! Picks the next pair of items to present, given the current ranking,
//! the candidate pool, and the previously shown pair.
//!
//! Strategies form an ordered fallback chain; the first that produces a
//! pair wins:
//! 1. a random *adjacent* ranked pair inside the focus window, to
//!    sharpen local ordering precision;
//! 2. the same over the whole pool;
//! 3. one ranked item against an unranked newcomer of comparable pool
//!    position, so newcomers are placed near items of similar estimated
//!    quality;
//! 4. two random distinct items, with an unconditional first-two-items
//!    fallback that guarantees termination.
//!
//! Every stage rejects the previously shown pair (unordered) inside a
//! bounded retry loop. The single documented exception: a pool of
//! exactly two items must repeat its only pair. All random draws go
//! through a caller-supplied [`Rng`] so behavior is reproducible under
//! test.

use crate::pool::CandidatePool;
use crate::primitives::EngineParams;
use crate::types::{ItemId, Pair, RankingState};
use rand::Rng;
use std::collections::BTreeSet;

/// Select the next pair to present.
///
/// Returns `None` only when the pool has fewer than two items; the
/// caller shows an empty state instead of failing.
#[must_use]
pub fn next_pair<R: Rng + ?Sized>(
    pool: &CandidatePool,
    ranking: &RankingState,
    last_pair: Option<Pair>,
    focus_start: Option<usize>,
    params: &EngineParams,
    rng: &mut R,
) -> Option<Pair> {
    if pool.len() < 2 {
        return None;
    }

    let window = pool.focus_window(focus_start, params.window_width);

    // Ranked ids that made the pool, in ranking order.
    let ranked_in_pool: Vec<ItemId> = ranking
        .order
        .iter()
        .copied()
        .filter(|&id| pool.contains(id))
        .collect();

    // Stage 1: adjacent ranked pair inside the focus window.
    if window.len() >= 2 {
        if let Some(pair) = choose_adjacent(&ranked_in_pool, window, last_pair, params, rng) {
            return Some(pair);
        }
    }

    // Stage 2: adjacent ranked pair anywhere in the pool.
    if let Some(pair) = choose_adjacent(&ranked_in_pool, pool.ids(), last_pair, params, rng) {
        return Some(pair);
    }

    // Stage 3: one ranked item against a nearby unranked newcomer.
    if let Some(pair) =
        choose_ranked_vs_unranked(pool, &ranked_in_pool, window, last_pair, params, rng)
    {
        return Some(pair);
    }

    // Stage 4: random fallback. The window may be too small (or empty
    // at the tail of the pool); fall back to the whole pool then.
    let fallback = if window.len() >= 2 { window } else { pool.ids() };
    for _ in 0..params.random_retries {
        let a = fallback[rng.gen_range(0..fallback.len())];
        let b = fallback[rng.gen_range(0..fallback.len())];
        let pair = Pair(a, b);
        if pair.is_self_pair() || rejects(last_pair, pair) {
            continue;
        }
        return Some(pair);
    }

    // All retries collided; return the first two items unconditionally.
    Some(Pair(fallback[0], fallback[1]))
}

/// True when `pair` matches the excluded previous pair.
fn rejects(last_pair: Option<Pair>, pair: Pair) -> bool {
    last_pair.is_some_and(|last| last.same_unordered(&pair))
}

/// Pick a uniformly random adjacent pair from the ranked ids that fall
/// inside `candidates`, preserving ranking order.
fn choose_adjacent<R: Rng + ?Sized>(
    ranked_in_pool: &[ItemId],
    candidates: &[ItemId],
    last_pair: Option<Pair>,
    params: &EngineParams,
    rng: &mut R,
) -> Option<Pair> {
    let candidate_set: BTreeSet<ItemId> = candidates.iter().copied().collect();
    let ranked_seq: Vec<ItemId> = ranked_in_pool
        .iter()
        .copied()
        .filter(|id| candidate_set.contains(id))
        .collect();
    if ranked_seq.len() < 2 {
        return None;
    }

    for _ in 0..params.adjacent_retries {
        let i = rng.gen_range(0..ranked_seq.len() - 1);
        let pair = Pair(ranked_seq[i], ranked_seq[i + 1]);
        if rejects(last_pair, pair) {
            continue;
        }
        return Some(pair);
    }
    None
}

/// Pair a ranked id (preferring one in the focus window) with an
/// unranked item whose pool position is within `neighbor_radius` of it,
/// falling back to any unranked item in scope.
fn choose_ranked_vs_unranked<R: Rng + ?Sized>(
    pool: &CandidatePool,
    ranked_in_pool: &[ItemId],
    window: &[ItemId],
    last_pair: Option<Pair>,
    params: &EngineParams,
    rng: &mut R,
) -> Option<Pair> {
    let ranked_set: BTreeSet<ItemId> = ranked_in_pool.iter().copied().collect();
    let unranked: Vec<ItemId> = pool
        .ids()
        .iter()
        .copied()
        .filter(|id| !ranked_set.contains(id))
        .collect();
    if ranked_in_pool.is_empty() || unranked.is_empty() {
        return None;
    }

    let ranked_in_window: Vec<ItemId> = window
        .iter()
        .copied()
        .filter(|id| ranked_set.contains(id))
        .collect();
    let unranked_in_window: Vec<ItemId> = window
        .iter()
        .copied()
        .filter(|id| !ranked_set.contains(id))
        .collect();

    let ranked_scope = if ranked_in_window.is_empty() {
        ranked_in_pool
    } else {
        &ranked_in_window
    };
    let unranked_scope = if unranked_in_window.is_empty() {
        &unranked
    } else {
        &unranked_in_window
    };

    for _ in 0..params.mix_retries {
        let ranked_id = ranked_scope[rng.gen_range(0..ranked_scope.len())];
        let Some(ranked_pos) = pool.position(ranked_id) else {
            continue;
        };

        // Unranked items of comparable estimated quality first.
        let lo = ranked_pos.saturating_sub(params.neighbor_radius);
        let hi = ranked_pos.saturating_add(params.neighbor_radius);
        let near: Vec<ItemId> = unranked_scope
            .iter()
            .copied()
            .filter(|&id| pool.position(id).is_some_and(|pos| pos >= lo && pos <= hi))
            .collect();

        let choices = if near.is_empty() { unranked_scope } else { &near };
        let other = choices[rng.gen_range(0..choices.len())];

        let pair = Pair(ranked_id, other);
        if pair.is_self_pair() || rejects(last_pair, pair) {
            continue;
        }
        return Some(pair);
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Catalog, Item, Signals};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn catalog_of(n: u64) -> Catalog {
        Catalog::from_items((1..=n).map(|k| {
            Item::new(ItemId(k), format!("Item {k}"), "TST").with_signals(Signals {
                overall_rank: Some(k as u32),
                ..Signals::default()
            })
        }))
    }

    fn pool_of(n: u64) -> CandidatePool {
        CandidatePool::build(&catalog_of(n), 120)
    }

    #[test]
    fn empty_pool_yields_none() {
        let pool = pool_of(0);
        let mut rng = SmallRng::seed_from_u64(1);
        let pair = next_pair(
            &pool,
            &RankingState::new(),
            None,
            None,
            &EngineParams::default(),
            &mut rng,
        );
        assert!(pair.is_none());
    }

    #[test]
    fn single_item_pool_yields_none() {
        let pool = pool_of(1);
        let mut rng = SmallRng::seed_from_u64(1);
        let pair = next_pair(
            &pool,
            &RankingState::new(),
            None,
            None,
            &EngineParams::default(),
            &mut rng,
        );
        assert!(pair.is_none());
    }

    #[test]
    fn never_returns_a_self_pair() {
        let pool = pool_of(8);
        let ranking = RankingState::from_order((1..=8).map(ItemId).collect());
        let params = EngineParams::default();
        let mut rng = SmallRng::seed_from_u64(7);

        let mut last = None;
        for _ in 0..200 {
            let pair = next_pair(&pool, &ranking, last, None, &params, &mut rng)
                .unwrap_or(Pair(ItemId(0), ItemId(0)));
            assert!(!pair.is_self_pair());
            last = Some(pair);
        }
    }

    #[test]
    fn rejects_the_previous_pair_with_three_items() {
        let pool = pool_of(3);
        let ranking = RankingState::from_order(vec![ItemId(1), ItemId(2), ItemId(3)]);
        let params = EngineParams::default();
        let mut rng = SmallRng::seed_from_u64(11);

        let last = Pair(ItemId(1), ItemId(2));
        for _ in 0..100 {
            let pair = next_pair(&pool, &ranking, Some(last), None, &params, &mut rng);
            let pair = pair.unwrap_or(last);
            assert!(!pair.same_unordered(&last));
        }
    }

    #[test]
    fn two_item_pool_repeats_its_only_pair() {
        // The documented exception: no other pair exists.
        let pool = pool_of(2);
        let ranking = RankingState::from_order(vec![ItemId(1), ItemId(2)]);
        let params = EngineParams::default();
        let mut rng = SmallRng::seed_from_u64(3);

        let last = Pair(ItemId(1), ItemId(2));
        let pair = next_pair(&pool, &ranking, Some(last), None, &params, &mut rng);
        assert!(pair.is_some_and(|p| p.same_unordered(&last)));
    }

    #[test]
    fn adjacent_stage_returns_ranking_neighbors() {
        let pool = pool_of(6);
        // Ranking order deliberately differs from pool order.
        let ranking =
            RankingState::from_order(vec![ItemId(4), ItemId(2), ItemId(6), ItemId(1), ItemId(3)]);
        let params = EngineParams::default();
        let mut rng = SmallRng::seed_from_u64(21);

        for _ in 0..100 {
            let Some(Pair(a, b)) = next_pair(&pool, &ranking, None, None, &params, &mut rng) else {
                continue;
            };
            let pa = ranking.position(a);
            let pb = ranking.position(b);
            match (pa, pb) {
                (Some(pa), Some(pb)) => {
                    assert_eq!(pa.abs_diff(pb), 1, "({a:?}, {b:?}) not adjacent in ranking");
                }
                // With ranked items available the adjacent stage should
                // always fire; an unranked member means a bug.
                _ => unreachable!("adjacent stage skipped despite >=2 ranked ids"),
            }
        }
    }

    #[test]
    fn ranked_vs_unranked_places_newcomers_nearby() {
        let pool = pool_of(40);
        // Exactly one ranked item: the adjacent stages cannot fire.
        let ranking = RankingState::from_order(vec![ItemId(20)]);
        let params = EngineParams::default();
        let mut rng = SmallRng::seed_from_u64(5);

        // No focus bias, so the whole pool is in scope and every
        // unranked candidate within the radius is eligible.
        for _ in 0..50 {
            let Some(pair) = next_pair(&pool, &ranking, None, None, &params, &mut rng) else {
                continue;
            };
            assert!(pair.contains(ItemId(20)));
            let other = if pair.0 == ItemId(20) { pair.1 } else { pair.0 };
            let ranked_pos = pool.position(ItemId(20)).unwrap_or(0);
            let other_pos = pool.position(other).unwrap_or(0);
            assert!(
                ranked_pos.abs_diff(other_pos) <= params.neighbor_radius,
                "newcomer {other:?} outside the neighbor radius"
            );
        }
    }

    #[test]
    fn empty_ranking_still_produces_a_pair() {
        let pool = pool_of(10);
        let params = EngineParams::default();
        let mut rng = SmallRng::seed_from_u64(17);

        let pair = next_pair(&pool, &RankingState::new(), None, Some(0), &params, &mut rng);
        assert!(pair.is_some());
    }

    #[test]
    fn focus_window_biases_random_fallback() {
        let pool = pool_of(120);
        let params = EngineParams::default();
        let mut rng = SmallRng::seed_from_u64(9);

        // Window 3 covers pool positions 36..48 (ids 37..=48).
        let start = 3 * params.window_width;
        for _ in 0..50 {
            let Some(Pair(a, b)) =
                next_pair(&pool, &RankingState::new(), None, Some(start), &params, &mut rng)
            else {
                continue;
            };
            for id in [a, b] {
                let pos = pool.position(id).unwrap_or(usize::MAX);
                assert!(
                    pos >= start && pos < start + params.window_width,
                    "{id:?} outside the focus window"
                );
            }
        }
    }

    #[test]
    fn seeded_rng_reproduces_the_same_pair() {
        let pool = pool_of(30);
        let ranking = RankingState::from_order((1..=10).map(ItemId).collect());
        let params = EngineParams::default();

        let mut rng_a = SmallRng::seed_from_u64(123);
        let mut rng_b = SmallRng::seed_from_u64(123);

        let a = next_pair(&pool, &ranking, None, Some(12), &params, &mut rng_a);
        let b = next_pair(&pool, &ranking, None, Some(12), &params, &mut rng_b);
        assert_eq!(a, b);
    }
}
