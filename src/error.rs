use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the client.
///
/// Driver errors pass through unchanged; everything this crate adds on top
/// (configuration, parameter binding, SQL file handling) gets its own variant.
#[derive(Debug, Error)]
pub enum DbClientError {
    #[error(transparent)]
    Mssql(#[from] tiberius::error::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL file not found: {}", .0.display())]
    SqlFileNotFound(PathBuf),

    #[error("Error reading SQL file {}: {source}", .path.display())]
    SqlFileRead {
        path: PathBuf,
        source: std::io::Error,
    },
}
