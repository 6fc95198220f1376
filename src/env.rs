//! Environment-file loading.
//!
//! Connection parameters are read from process environment variables; this
//! module seeds those variables from a `.env` file. Load failures are logged
//! and reported as a boolean, never raised.

use std::path::Path;

use tracing::{error, info};

/// Load environment variables from a specific `.env` file path.
///
/// Returns `true` if the file was found and loaded. A missing file returns
/// `false` without touching the environment; any other load failure is
/// logged and also returns `false`. Variables already present in the
/// process environment are not overridden.
///
/// Values containing spaces must be quoted
/// (`DB_DRIVER="ODBC Driver 17 for SQL Server"`); an unquoted value with
/// spaces is a parse error and the whole load reports failure.
pub fn load_env_from_path(env_path: &Path) -> bool {
    if !env_path.exists() {
        error!("Environment file not found at: {}", env_path.display());
        return false;
    }
    match dotenvy::from_path(env_path) {
        Ok(()) => {
            info!("Environment variables loaded from: {}", env_path.display());
            true
        }
        Err(e) => {
            error!("Error loading environment variables: {e}");
            false
        }
    }
}

/// Best-effort load of the nearest `.env` relative to the working directory.
/// Used when no explicit path is supplied; a missing file is not an error.
pub(crate) fn load_default_env() {
    let _ = dotenvy::dotenv();
}
