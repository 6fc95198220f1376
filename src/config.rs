//! Connection configuration sourced from environment variables.

use std::env;

/// Default SQL Server port, used when `DB_SERVER` carries no port of its own.
pub const DEFAULT_MSSQL_PORT: u16 = 1433;

/// Connection parameters for a SQL Server database.
///
/// All five fields map one-to-one onto the `DB_DRIVER`, `DB_SERVER`,
/// `DB_DATABASE`, `DB_USER` and `DB_PASSWORD` environment variables. A
/// variable that is absent becomes an empty string, not an error; validation
/// is deferred to the server at connect time.
///
/// The actual connection is configured field by field through the driver,
/// never by interpolating these values into a connection string, so delimiter
/// characters in a password cannot corrupt anything. The ODBC-style
/// descriptor is still available from [`DbConfig::odbc_connection_string`]
/// for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    /// ODBC driver name, e.g. "ODBC Driver 17 for SQL Server". Informational
    /// only: the TDS driver needs no ODBC bridge, but the field is kept so
    /// the descriptor matches what other tooling around the same `.env` sees.
    pub driver: String,
    /// Server address, optionally with an ODBC-style port suffix
    /// (`host,port`) and optional `tcp:` prefix.
    pub server: String,
    /// Database name.
    pub database: String,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
}

impl DbConfig {
    /// Read connection parameters from the process environment.
    pub fn from_env() -> Self {
        Self {
            driver: env_or_empty("DB_DRIVER"),
            server: env_or_empty("DB_SERVER"),
            database: env_or_empty("DB_DATABASE"),
            user: env_or_empty("DB_USER"),
            password: env_or_empty("DB_PASSWORD"),
        }
    }

    /// The classic ODBC connection descriptor, assembled verbatim from the
    /// five fields with no reordering and no escaping.
    #[must_use]
    pub fn odbc_connection_string(&self) -> String {
        format!(
            "DRIVER={{{}}};SERVER={};DATABASE={};UID={};PWD={}",
            self.driver, self.server, self.database, self.user, self.password
        )
    }

    /// Dialect-tagged URL form of the descriptor. Diagnostic only; contains
    /// the password, so keep it out of logs.
    #[must_use]
    pub fn connection_url(&self) -> String {
        format!(
            "mssql+pyodbc:///?odbc_connect={}",
            self.odbc_connection_string()
        )
    }

    /// Split `server` into host and port. Accepts the ODBC forms
    /// `host`, `host,port` and `tcp:host,port`; an unparsable port falls
    /// back to [`DEFAULT_MSSQL_PORT`].
    #[must_use]
    pub fn server_address(&self) -> (&str, u16) {
        let server = self.server.strip_prefix("tcp:").unwrap_or(&self.server);
        match server.split_once(',') {
            Some((host, port)) => (host, port.trim().parse().unwrap_or(DEFAULT_MSSQL_PORT)),
            None => (server, DEFAULT_MSSQL_PORT),
        }
    }
}

fn env_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DbConfig {
        DbConfig {
            driver: "ODBC Driver 17 for SQL Server".to_string(),
            server: "db.example.com".to_string(),
            database: "sales".to_string(),
            user: "app".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn descriptor_is_deterministic_concatenation() {
        assert_eq!(
            sample().odbc_connection_string(),
            "DRIVER={ODBC Driver 17 for SQL Server};SERVER=db.example.com;\
             DATABASE=sales;UID=app;PWD=s3cret"
        );
    }

    #[test]
    fn connection_url_wraps_descriptor() {
        let cfg = sample();
        let url = cfg.connection_url();
        assert!(url.starts_with("mssql+pyodbc:///?odbc_connect=DRIVER={"));
        assert!(url.ends_with("PWD=s3cret"));
    }

    #[test]
    fn server_address_splits_odbc_forms() {
        let mut cfg = sample();
        assert_eq!(cfg.server_address(), ("db.example.com", 1433));

        cfg.server = "db.example.com,14330".to_string();
        assert_eq!(cfg.server_address(), ("db.example.com", 14330));

        cfg.server = "tcp:db.example.com,1434".to_string();
        assert_eq!(cfg.server_address(), ("db.example.com", 1434));

        cfg.server = "db.example.com,nonsense".to_string();
        assert_eq!(cfg.server_address(), ("db.example.com", 1433));
    }

    #[test]
    fn empty_fields_still_format() {
        let cfg = DbConfig::default();
        assert_eq!(
            cfg.odbc_connection_string(),
            "DRIVER={};SERVER=;DATABASE=;UID=;PWD="
        );
    }
}
