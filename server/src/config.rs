//! Configuration for the racing server
//!
//! Handles database location with the following precedence:
//! 1. RACING_DB_PATH environment variable
//! 2. ~/.config/racing/races.db (production default)
//! 3. ./data/races.db (fallback for development)

use std::path::PathBuf;

const DEFAULT_CONFIG_DB: &str = ".config/racing/races.db";
const DEV_DB_PATH: &str = "./data/races.db";

/// Get the SQLite database path.
pub fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("RACING_DB_PATH") {
        return PathBuf::from(path);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DB);
    }

    PathBuf::from(DEV_DB_PATH)
}
