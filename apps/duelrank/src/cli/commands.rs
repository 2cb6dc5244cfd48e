//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::catalog::load_catalog;
use crate::config::load_params;
use duelrank_core::{
    Catalog, EngineParams, ItemId, MergePolicy, Outcome, Pair, RankError, RankSession,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::PathBuf;

use super::Cli;

// =============================================================================
// COMMAND CONTEXT
// =============================================================================

/// Everything a command needs: resolved inputs, shared flags.
pub struct CommandContext {
    database: PathBuf,
    catalog: Catalog,
    params: EngineParams,
    rng_seed: Option<u64>,
    json_mode: bool,
}

impl CommandContext {
    /// Resolve the context from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, RankError> {
        let catalog = load_catalog(&cli.catalog)?;
        let params = match &cli.params {
            Some(path) => load_params(path)?,
            None => EngineParams::default(),
        };

        tracing::debug!(
            catalog_items = catalog.len(),
            pool_limit = params.pool_limit,
            "context resolved"
        );

        Ok(Self {
            database: cli.database.clone(),
            catalog,
            params,
            rng_seed: cli.rng_seed,
            json_mode: cli.json_mode,
        })
    }

    fn open_session(&self) -> Result<RankSession, RankError> {
        RankSession::persistent(self.catalog.clone(), self.params, &self.database)
    }

    fn rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    fn display_name(&self, id: ItemId) -> String {
        match self.catalog.get(id) {
            Some(item) if item.team.is_empty() => item.name.clone(),
            Some(item) => format!("{} ({})", item.name, item.team),
            None => format!("#{}", id.0),
        }
    }
}

// =============================================================================
// NEXT COMMAND
// =============================================================================

/// Show the next pair to compare.
pub fn cmd_next(ctx: &CommandContext) -> Result<(), RankError> {
    let session = ctx.open_session()?;
    let mut rng = ctx.rng();

    match session.next_pair(&mut rng) {
        Some(pair) => print_pair(ctx, pair),
        None => print_pool_too_small(ctx),
    }
    Ok(())
}

fn print_pair(ctx: &CommandContext, pair: Pair) {
    if ctx.json_mode {
        println!(
            "{}",
            serde_json::json!({
                "pair": [
                    { "id": pair.0.0, "name": ctx.display_name(pair.0) },
                    { "id": pair.1.0, "name": ctx.display_name(pair.1) },
                ],
            })
        );
    } else {
        println!("Which do you prefer?");
        println!();
        println!("  [{}] {}", pair.0.0, ctx.display_name(pair.0));
        println!("  [{}] {}", pair.1.0, ctx.display_name(pair.1));
        println!();
        println!(
            "Answer with: duelrank pick --winner <id> --loser <id>"
        );
    }
}

fn print_pool_too_small(ctx: &CommandContext) {
    if ctx.json_mode {
        println!("{}", serde_json::json!({ "pair": null }));
    } else {
        println!("Not enough items in the catalog to form a pair.");
    }
}

// =============================================================================
// PICK COMMAND
// =============================================================================

/// Record a decision, then show the next pair.
pub fn cmd_pick(ctx: &CommandContext, winner: u64, loser: u64) -> Result<(), RankError> {
    let mut session = ctx.open_session()?;
    let mut rng = ctx.rng();

    session.accept(Outcome::new(ItemId(winner), ItemId(loser)))?;
    tracing::info!(winner, loser, "decision recorded");

    if !ctx.json_mode {
        println!(
            "Recorded: {} over {}",
            ctx.display_name(ItemId(winner)),
            ctx.display_name(ItemId(loser))
        );
        println!();
    }

    match session.next_pair(&mut rng) {
        Some(pair) => print_pair(ctx, pair),
        None => print_pool_too_small(ctx),
    }
    Ok(())
}

// =============================================================================
// RANKINGS COMMAND
// =============================================================================

/// Show the current ranking, best first.
pub fn cmd_rankings(ctx: &CommandContext, limit: usize) -> Result<(), RankError> {
    let session = ctx.open_session()?;
    let ranking = session.ranking();

    if ctx.json_mode {
        let entries: Vec<_> = ranking
            .order
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, &id)| {
                serde_json::json!({
                    "position": i + 1,
                    "id": id.0,
                    "name": ctx.display_name(id),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({ "ranked": ranking.len(), "entries": entries })
        );
        return Ok(());
    }

    if ranking.is_empty() {
        println!("No ranking yet. Run `duelrank seed` or start comparing with `duelrank next`.");
        return Ok(());
    }

    println!("Your ranking ({} items):", ranking.len());
    println!();
    for (i, &id) in ranking.order.iter().take(limit).enumerate() {
        println!("  {:>3}. {}", i + 1, ctx.display_name(id));
    }

    let suggestions = session.unranked_suggestions(5);
    if !suggestions.is_empty() {
        println!();
        println!("Not yet compared:");
        for id in suggestions {
            println!("    -  {}", ctx.display_name(id));
        }
    }
    Ok(())
}

// =============================================================================
// SEED COMMAND
// =============================================================================

/// Seed an empty ranking from consensus signals.
pub fn cmd_seed(ctx: &CommandContext) -> Result<(), RankError> {
    let mut session = ctx.open_session()?;
    let seeded = session.seed_if_empty()?;

    if ctx.json_mode {
        println!(
            "{}",
            serde_json::json!({ "seeded": seeded, "ranked": session.ranked_len() })
        );
    } else if seeded {
        println!(
            "Seeded {} items from consensus signals.",
            session.ranked_len()
        );
    } else {
        println!("Ranking already exists; seed skipped. Use `duelrank reset --force` to start over.");
    }
    Ok(())
}

// =============================================================================
// RESET COMMAND
// =============================================================================

/// Discard the ranking and re-seed from consensus signals.
pub fn cmd_reset(ctx: &CommandContext, force: bool) -> Result<(), RankError> {
    if !force {
        println!("This discards your entire ranking. Re-run with --force to confirm.");
        return Ok(());
    }

    let mut session = ctx.open_session()?;
    session.reset()?;
    session.seed_if_empty()?;
    tracing::info!(ranked = session.ranked_len(), "ranking reset and re-seeded");

    if ctx.json_mode {
        println!(
            "{}",
            serde_json::json!({ "reset": true, "ranked": session.ranked_len() })
        );
    } else {
        println!(
            "Ranking discarded and re-seeded from consensus ({} items).",
            session.ranked_len()
        );
    }
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Print the shareable ranking code.
pub fn cmd_export(ctx: &CommandContext) -> Result<(), RankError> {
    let session = ctx.open_session()?;
    let code = session.export_share()?;

    if ctx.json_mode {
        println!(
            "{}",
            serde_json::json!({ "ranked": session.ranked_len(), "code": code })
        );
    } else {
        println!("Share code ({} ranked items):", session.ranked_len());
        println!();
        println!("{}", code);
    }
    Ok(())
}

/// Import a shareable ranking code.
pub fn cmd_import(ctx: &CommandContext, code: &str, merge: bool) -> Result<(), RankError> {
    let mut session = ctx.open_session()?;
    let policy = if merge {
        MergePolicy::Merge
    } else {
        MergePolicy::Replace
    };

    let ranked = session.import_share(code, policy)?;
    tracing::info!(ranked, ?policy, "share code imported");

    if ctx.json_mode {
        println!("{}", serde_json::json!({ "imported": true, "ranked": ranked }));
    } else {
        println!("Imported. {} items now ranked.", ranked);
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show session status.
pub fn cmd_status(ctx: &CommandContext) -> Result<(), RankError> {
    let session = ctx.open_session()?;

    if ctx.json_mode {
        println!(
            "{}",
            serde_json::json!({
                "catalog_items": ctx.catalog.len(),
                "pool_size": session.pool_len(),
                "ranked": session.ranked_len(),
                "focus_round": session.focus_round(),
            })
        );
    } else {
        println!("Duelrank Status");
        println!();
        println!("  Catalog items: {}", ctx.catalog.len());
        println!("  Pool size:     {}", session.pool_len());
        println!("  Ranked items:  {}", session.ranked_len());
        println!("  Focus round:   {}", session.focus_round());
        println!("  Database:      {:?}", ctx.database);
    }
    Ok(())
}
