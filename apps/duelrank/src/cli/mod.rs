//! # Duelrank CLI Module
//!
//! This module implements the CLI interface for duelrank.
//!
//! ## Available Commands
//!
//! - `next` - Show the next pair to compare
//! - `pick` - Record a pairwise decision
//! - `rankings` - Show the current ranking
//! - `seed` - Seed an empty ranking from consensus signals
//! - `reset` - Discard the ranking
//! - `export` - Print the shareable ranking code
//! - `import` - Import a shareable ranking code
//! - `status` - Show session status

mod commands;

use clap::{Parser, Subcommand};
use duelrank_core::RankError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Duelrank - Pairwise Preference Ranking
///
/// Build a personal ordering over a catalog of items by answering
/// small "which do you prefer?" questions, one pair at a time.
#[derive(Parser, Debug)]
#[command(name = "duelrank")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the ranking database
    #[arg(short = 'D', long, global = true, default_value = "duelrank.db")]
    pub database: PathBuf,

    /// Path to the item catalog (JSON)
    #[arg(short = 'C', long, global = true, default_value = "players.json")]
    pub catalog: PathBuf,

    /// Path to an engine parameters file (TOML)
    #[arg(short = 'P', long, global = true)]
    pub params: Option<PathBuf>,

    /// Fixed RNG seed for reproducible pair selection
    #[arg(long, global = true)]
    pub rng_seed: Option<u64>,

    /// Output in JSON format (for programmatic access)
    #[arg(long = "json", global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the next pair to compare
    Next,

    /// Record a pairwise decision, then show the next pair
    Pick {
        /// Id of the preferred item
        #[arg(short, long)]
        winner: u64,

        /// Id of the other item
        #[arg(short, long)]
        loser: u64,
    },

    /// Show the current ranking
    Rankings {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Seed an empty ranking from consensus signals
    Seed,

    /// Discard the ranking and re-seed it from consensus signals
    Reset {
        /// Confirm the reset
        #[arg(short, long)]
        force: bool,
    },

    /// Print the shareable ranking code
    Export,

    /// Import a shareable ranking code
    Import {
        /// The share code to import
        code: String,

        /// Merge with the local ranking instead of replacing it
        #[arg(short, long)]
        merge: bool,
    },

    /// Show session status
    Status,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), RankError> {
    let ctx = CommandContext::from_cli(&cli)?;

    match cli.command {
        Some(Commands::Next) => cmd_next(&ctx),
        Some(Commands::Pick { winner, loser }) => cmd_pick(&ctx, winner, loser),
        Some(Commands::Rankings { limit }) => cmd_rankings(&ctx, limit),
        Some(Commands::Seed) => cmd_seed(&ctx),
        Some(Commands::Reset { force }) => cmd_reset(&ctx, force),
        Some(Commands::Export) => cmd_export(&ctx),
        Some(Commands::Import { code, merge }) => cmd_import(&ctx, &code, merge),
        Some(Commands::Status) => cmd_status(&ctx),
        None => {
            // No subcommand - show status by default
            cmd_status(&ctx)
        }
    }
}
