//! # Engine Parameter Configuration
//!
//! Optional TOML overrides for the engine's tuned constants (pool
//! limit, focus window width, retry budgets). Absent file or absent
//! fields fall back to the built-in defaults.

use duelrank_core::{EngineParams, RankError};
use std::path::Path;

/// Load engine parameters from a TOML file.
///
/// Every field is optional; unspecified fields keep their defaults.
pub fn load_params(path: &Path) -> Result<EngineParams, RankError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| RankError::IoError(format!("Cannot read params file: {}", e)))?;

    toml::from_str(&contents)
        .map_err(|e| RankError::SerializationError(format!("Invalid params TOML: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_and_load(contents: &str) -> Result<EngineParams, RankError> {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("params.toml");
        std::fs::write(&path, contents).expect("write");
        load_params(&path)
    }

    #[test]
    fn empty_file_yields_defaults() {
        let params = write_and_load("").expect("load");
        assert_eq!(params, EngineParams::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let params = write_and_load("pool_limit = 40\nwindow_width = 8\n").expect("load");

        assert_eq!(params.pool_limit, 40);
        assert_eq!(params.window_width, 8);
        assert_eq!(params.focus_rounds, EngineParams::default().focus_rounds);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(write_and_load("pool_limit = \"many\"").is_err());
    }
}
