//! Environment loading helpers
//!
//! Production runs get their secrets from the process environment. Local runs
//! may keep them in a `.env` file, which is read only when it exists.

use std::path::{Path, PathBuf};

/// Load a `.env` file if one is present
///
/// Looks in the current directory and its ancestors. Variables already set in
/// the process environment win over the file. Returns the path that was loaded.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
            None
        }
    }
}

/// Load a specific `.env` file if it exists
pub fn load_dotenv_from(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }
    match dotenvy::from_path(path) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) => {
            tracing::warn!("Ignoring unreadable env file {}: {}", path.display(), e);
            None
        }
    }
}

/// Read a required, non-empty environment variable
///
/// Returns the variable name as the error so callers can wrap it in their own
/// configuration error type.
pub fn require_var(name: &str) -> Result<String, String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(name.to_string()),
    }
}
