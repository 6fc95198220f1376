//! A thin convenience client for Microsoft SQL Server.
//!
//! Connection parameters come from environment variables (`DB_DRIVER`,
//! `DB_SERVER`, `DB_DATABASE`, `DB_USER`, `DB_PASSWORD`), optionally seeded
//! from a `.env` file. The client holds a Tiberius connection pool and
//! exposes three passthrough operations: execute SQL text, execute a SQL
//! file, and load a query result into a tabular [`DataFrame`]. Everything
//! protocol-level is the driver's business; this crate only configures and
//! delegates.

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod frame;
pub mod params;
pub mod pool;
mod query;
pub mod results;
pub mod values;

pub use client::DbClient;
pub use config::DbConfig;
pub use env::load_env_from_path;
pub use error::DbClientError;
pub use frame::DataFrame;
pub use params::{SqlParams, bind_named};
pub use pool::{MssqlClient, MssqlPool};
pub use results::{ResultSet, SqlRow};
pub use values::SqlValue;
