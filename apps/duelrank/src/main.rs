//! # Duelrank - Pairwise Preference Ranking Tool
//!
//! The main binary for the duelrank comparison-driven ranking engine.
//!
//! This application provides:
//! - A CLI for the compare/pick loop, seeding, and share import/export
//! - Catalog loading from JSON files
//! - Engine parameter overrides from TOML
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │             apps/duelrank (THE BINARY)          │
//! │                                                 │
//! │  ┌───────────┐  ┌───────────┐  ┌────────────┐  │
//! │  │   CLI     │  │  Catalog  │  │   Config   │  │
//! │  │  (clap)   │  │  (JSON)   │  │   (TOML)   │  │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬──────┘  │
//! │        └──────────────┼──────────────┘          │
//! │                       ▼                         │
//! │              ┌─────────────────┐                │
//! │              │  duelrank-core  │                │
//! │              │   (THE LOGIC)   │                │
//! │              └─────────────────┘                │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Show the next pair to compare
//! duelrank --catalog players.json next
//!
//! # Record a decision
//! duelrank --catalog players.json pick --winner 12 --loser 7
//!
//! # Show the current ranking
//! duelrank --catalog players.json rankings --limit 20
//! ```

mod catalog;
mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing — DUELRANK_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("DUELRANK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "duelrank=debug"
    } else {
        "duelrank=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the duelrank startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗ ██╗   ██╗███████╗██╗     ██████╗  █████╗ ███╗   ██╗██╗  ██╗
  ██╔══██╗██║   ██║██╔════╝██║     ██╔══██╗██╔══██╗████╗  ██║██║ ██╔╝
  ██║  ██║██║   ██║█████╗  ██║     ██████╔╝███████║██╔██╗ ██║█████╔╝
  ██║  ██║██║   ██║██╔══╝  ██║     ██╔══██╗██╔══██║██║╚██╗██║██╔═██╗
  ██████╔╝╚██████╔╝███████╗███████╗██║  ██║██║  ██║██║ ╚████║██║  ██╗
  ╚═════╝  ╚═════╝ ╚══════╝╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═══╝╚═╝  ╚═╝

  Pairwise Preference Ranking v{}

  Deterministic • Incremental • Yours
"#,
        env!("CARGO_PKG_VERSION")
    );
}
