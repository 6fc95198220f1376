//! The database client: configuration plus a pooled engine handle.

use std::path::Path;

use tracing::{debug, error};

use crate::config::DbConfig;
use crate::env::{load_default_env, load_env_from_path};
use crate::error::DbClientError;
use crate::frame::DataFrame;
use crate::params::{SqlParams, bind_named};
use crate::pool::{self, MssqlPool};
use crate::query::run_in_transaction;
use crate::results::ResultSet;

/// A SQL Server client.
///
/// Construction assembles the configuration and the connection pool in one
/// step; there is no half-initialized state, a constructor failure is a
/// plain `Err`. Each execution method checks a connection out of the pool,
/// runs the statement inside a transaction scope and returns the rows, so
/// concurrent callers only share the pool.
///
/// ```no_run
/// use mssql_connect::{DbClient, SqlParams};
///
/// # async fn demo() -> Result<(), mssql_connect::DbClientError> {
/// let db = DbClient::connect(None)?;
/// let rows = db
///     .execute_query("SELECT name FROM sys.tables WHERE name = :t",
///                    &SqlParams::new().with("t", "orders"))
///     .await?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DbClient {
    config: DbConfig,
    pool: MssqlPool,
}

impl DbClient {
    /// Build a client from environment variables, optionally seeding them
    /// from a `.env` file first.
    ///
    /// With `Some(path)` the file is loaded through
    /// [`load_env_from_path`]; a load failure is logged but does not abort
    /// construction (the variables may already be set elsewhere). With
    /// `None` the nearest `.env` relative to the working directory is tried.
    ///
    /// # Errors
    ///
    /// `DbClientError::ConnectionError` when the pool cannot be built.
    pub fn connect(env_path: Option<&Path>) -> Result<Self, DbClientError> {
        match env_path {
            Some(path) => {
                let _ = load_env_from_path(path);
            }
            None => load_default_env(),
        }
        Self::with_config(DbConfig::from_env())
    }

    /// Build a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// `DbClientError::ConnectionError` when the pool cannot be built.
    pub fn with_config(config: DbConfig) -> Result<Self, DbClientError> {
        let pool = pool::build_pool(&config)?;
        Ok(Self { config, pool })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Execute a statement with named `:param` placeholders inside a
    /// transaction scope. Returns `Some(ResultSet)` when the statement
    /// produced rows and `None` when it did not; a statement without rows
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Parameter-binding, connection and driver errors, logged and
    /// propagated unchanged.
    pub async fn execute_query(
        &self,
        sql: &str,
        params: &SqlParams,
    ) -> Result<Option<ResultSet>, DbClientError> {
        match self.run(sql, params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Error executing query: {e}");
                Err(e)
            }
        }
    }

    /// Read `dir/file_name` and execute its contents as one opaque
    /// statement block. A missing file is a distinct
    /// [`DbClientError::SqlFileNotFound`], raised before any database call;
    /// how multiple statements inside the file are sequenced is up to the
    /// server.
    ///
    /// # Errors
    ///
    /// File and execution errors, logged and propagated unchanged.
    pub async fn execute_sql_file(
        &self,
        dir: impl AsRef<Path>,
        file_name: &str,
        params: &SqlParams,
    ) -> Result<Option<ResultSet>, DbClientError> {
        let path = dir.as_ref().join(file_name);
        let sql = read_sql_file(&path).await?;
        match self.run(&sql, params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Error executing SQL file {}: {e}", path.display());
                Err(e)
            }
        }
    }

    /// Execute a query and load the full result into a [`DataFrame`].
    /// Accepts the same named parameters as [`DbClient::execute_query`];
    /// a statement without rows loads as an empty frame.
    ///
    /// # Errors
    ///
    /// Same policy as [`DbClient::execute_query`].
    pub async fn load_data_from_query(
        &self,
        sql: &str,
        params: &SqlParams,
    ) -> Result<DataFrame, DbClientError> {
        match self.run(sql, params).await {
            Ok(Some(rows)) => Ok(DataFrame::from(rows)),
            Ok(None) => Ok(DataFrame::empty()),
            Err(e) => {
                error!("Error loading data from query: {e}");
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        sql: &str,
        params: &SqlParams,
    ) -> Result<Option<ResultSet>, DbClientError> {
        let (sql, values) = bind_named(sql, params)?;
        let mut conn = self.pool.get().await.map_err(|e| {
            DbClientError::ConnectionError(format!("failed to acquire connection: {e}"))
        })?;
        debug!("Executing statement ({} bytes)", sql.len());
        run_in_transaction(&mut *conn, &sql, &values).await
    }
}

// Manual Debug because the pool's manager type has no Debug impl; the
// password stays out of the output as well.
impl std::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbClient")
            .field("server", &self.config.server)
            .field("database", &self.config.database)
            .field("user", &self.config.user)
            .finish_non_exhaustive()
    }
}

async fn read_sql_file(path: &Path) -> Result<String, DbClientError> {
    match tokio::fs::read_to_string(path).await {
        Ok(sql) => Ok(sql),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("SQL file not found: {}", path.display());
            Err(DbClientError::SqlFileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            error!("Error reading SQL file {}: {e}", path.display());
            Err(DbClientError::SqlFileRead {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}
