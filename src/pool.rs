//! The engine handle: a Tiberius connection pool built from [`DbConfig`].
//!
//! The pool itself comes from `deadpool-tiberius`; building it performs no
//! network I/O, connections are dialed on first checkout. The driver is
//! configured field by field, never through an interpolated connection
//! string.

use tokio::net::TcpStream;
use tokio_util::compat::Compat;
use tracing::error;

use crate::config::DbConfig;
use crate::error::DbClientError;

/// A pooled SQL Server client.
pub type MssqlClient = tiberius::Client<Compat<TcpStream>>;

/// The shared connection factory, checked out from per query.
pub type MssqlPool = deadpool_tiberius::Pool;

const POOL_MAX_SIZE: usize = 20;

/// Build the connection pool for the given configuration.
///
/// # Errors
///
/// `DbClientError::ConnectionError` when the pool cannot be constructed.
pub fn build_pool(config: &DbConfig) -> Result<MssqlPool, DbClientError> {
    let (host, port) = config.server_address();
    deadpool_tiberius::Manager::new()
        .host(host)
        .port(port)
        .database(&config.database)
        .basic_authentication(&config.user, &config.password)
        .trust_cert()
        .max_size(POOL_MAX_SIZE)
        .create_pool()
        .map_err(|e| {
            error!("Error creating SQL Server engine: {e}");
            DbClientError::ConnectionError(format!("failed to create connection pool: {e}"))
        })
}
