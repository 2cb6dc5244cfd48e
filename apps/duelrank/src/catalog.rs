//! # Catalog Loading
//!
//! Reads the item catalog from a JSON file. The file is an array of
//! entries with a stable integer id, a display name, an optional team
//! code, and the optional external signal fields the engine's prior
//! scorer and consensus seeder consume.

use duelrank_core::{Catalog, Item, ItemId, RankError, Signals};
use serde::Deserialize;
use std::path::Path;

/// Maximum catalog file size (10 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_CATALOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// One entry in the catalog JSON file.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: u64,
    name: String,
    #[serde(default)]
    team: String,
    #[serde(default)]
    overall_rank: Option<u32>,
    #[serde(default)]
    consensus_rank: Option<u32>,
    #[serde(default)]
    recent_points: Option<u32>,
}

impl From<CatalogEntry> for Item {
    fn from(entry: CatalogEntry) -> Self {
        Item::new(ItemId(entry.id), entry.name, entry.team).with_signals(Signals {
            overall_rank: entry.overall_rank,
            consensus_rank: entry.consensus_rank,
            recent_points: entry.recent_points,
        })
    }
}

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), RankError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| RankError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(RankError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, RankError> {
    validate_file_size(path, MAX_CATALOG_FILE_SIZE)?;

    let contents = std::fs::read_to_string(path)
        .map_err(|e| RankError::IoError(format!("Cannot read catalog file: {}", e)))?;

    parse_catalog(&contents)
}

/// Parse a catalog from JSON text.
pub fn parse_catalog(contents: &str) -> Result<Catalog, RankError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(contents)
        .map_err(|e| RankError::SerializationError(format!("Invalid catalog JSON: {}", e)))?;
    Ok(Catalog::from_items(entries.into_iter().map(Item::from)))
}

// =============================================================================
// TESTS
// =============================================================================
