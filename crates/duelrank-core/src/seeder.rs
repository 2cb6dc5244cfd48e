//! # Consensus Seeding
//!
//! Deterministic cold-start ordering of the whole catalog from external
//! signals, used exactly once: to initialize an empty ranking before
//! the user has answered any comparison. Re-running it on an unchanged
//! catalog yields an identical order, so an explicit reset is
//! idempotent.

use crate::primitives::{SEED_POINTS_CEILING, SEED_SENTINEL};
use crate::types::{Catalog, Item, ItemId};

/// Composite seed key, compared lexicographically.
///
/// Missing signals take the [`SEED_SENTINEL`] so unsignaled items sort
/// last; the display name then the id break remaining ties
/// deterministically.
fn seed_key(item: &Item) -> (u32, u32, u32, &str, ItemId) {
    (
        overall_key(item),
        consensus_key(item),
        points_key(item),
        item.name.as_str(),
        item.id,
    )
}

fn overall_key(item: &Item) -> u32 {
    item.signals.overall_rank.unwrap_or(SEED_SENTINEL)
}

fn consensus_key(item: &Item) -> u32 {
    item.signals.consensus_rank.unwrap_or(SEED_SENTINEL)
}

/// Higher point totals map to a smaller (better) key.
fn points_key(item: &Item) -> u32 {
    item.signals
        .recent_points
        .map(|points| SEED_POINTS_CEILING - points.min(SEED_POINTS_CEILING))
        .unwrap_or(SEED_SENTINEL)
}

/// Produce the full consensus ordering of the catalog.
#[must_use]
pub fn consensus_order(catalog: &Catalog) -> Vec<ItemId> {
    let mut items: Vec<&Item> = catalog.iter().collect();
    items.sort_by(|a, b| seed_key(a).cmp(&seed_key(b)));
    items.into_iter().map(|item| item.id).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Signals;

    fn item(id: u64, name: &str, signals: Signals) -> Item {
        Item::new(ItemId(id), name, "TST").with_signals(signals)
    }

    #[test]
    fn overall_rank_dominates() {
        let catalog = Catalog::from_items(vec![
            item(
                1,
                "First",
                Signals {
                    overall_rank: Some(1),
                    ..Signals::default()
                },
            ),
            item(
                2,
                "Second",
                Signals {
                    overall_rank: Some(2),
                    ..Signals::default()
                },
            ),
            item(3, "Unsignaled", Signals::default()),
        ]);

        assert_eq!(
            consensus_order(&catalog),
            vec![ItemId(1), ItemId(2), ItemId(3)]
        );
    }

    #[test]
    fn consensus_rank_breaks_overall_ties() {
        let catalog = Catalog::from_items(vec![
            item(
                1,
                "A",
                Signals {
                    consensus_rank: Some(9),
                    ..Signals::default()
                },
            ),
            item(
                2,
                "B",
                Signals {
                    consensus_rank: Some(2),
                    ..Signals::default()
                },
            ),
        ]);

        assert_eq!(consensus_order(&catalog), vec![ItemId(2), ItemId(1)]);
    }

    #[test]
    fn higher_points_rank_earlier() {
        let catalog = Catalog::from_items(vec![
            item(
                1,
                "Low",
                Signals {
                    recent_points: Some(90),
                    ..Signals::default()
                },
            ),
            item(
                2,
                "High",
                Signals {
                    recent_points: Some(240),
                    ..Signals::default()
                },
            ),
        ]);

        assert_eq!(consensus_order(&catalog), vec![ItemId(2), ItemId(1)]);
    }

    #[test]
    fn name_breaks_final_ties() {
        let catalog = Catalog::from_items(vec![
            item(1, "Zed", Signals::default()),
            item(2, "Abe", Signals::default()),
        ]);

        assert_eq!(consensus_order(&catalog), vec![ItemId(2), ItemId(1)]);
    }

    #[test]
    fn seeding_is_deterministic() {
        let catalog = Catalog::from_items((1..=50u64).map(|k| {
            item(
                k,
                &format!("Item {k}"),
                Signals {
                    overall_rank: (k % 3 == 0).then_some(k as u32),
                    consensus_rank: (k % 5 == 0).then_some((k % 50) as u32),
                    recent_points: (k % 2 == 0).then_some((k * 7 % 400) as u32),
                },
            )
        }));

        assert_eq!(consensus_order(&catalog), consensus_order(&catalog));
    }
}
