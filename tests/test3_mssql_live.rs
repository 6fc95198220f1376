//! End-to-end test against a real SQL Server. Self-skips unless the usual
//! `DB_*` variables are exported (at minimum `DB_SERVER`).

use std::io::Write;

use mssql_connect::{DbClient, SqlParams, SqlValue};
use tokio::runtime::Runtime;

#[test]
fn round_trip_against_live_server() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("DB_SERVER").is_err() {
        eprintln!("skipping live SQL Server test: DB_SERVER not set");
        return Ok(());
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = DbClient::connect(None)?;
        let table = format!("mssql_connect_test_{}", std::process::id());
        let none = SqlParams::new();

        // Row-returning statement: exactly one row, one column, value 1.
        let rows = db
            .execute_query("SELECT 1 AS x", &none)
            .await?
            .expect("SELECT should return rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows()[0].get("x"), Some(&SqlValue::Int(1)));

        // Non-row statement comes back absent, not empty and not an error.
        let created = db
            .execute_query(
                &format!("CREATE TABLE {table} (id INT NOT NULL, label NVARCHAR(64) NULL)"),
                &none,
            )
            .await?;
        assert!(created.is_none());

        let result = async {
            let inserted = db
                .execute_query(
                    &format!("INSERT INTO {table} (id, label) VALUES (:id, :label)"),
                    &SqlParams::new().with("id", 1i64).with("label", "first"),
                )
                .await?;
            assert!(inserted.is_none());

            // A failing batch rolls back the insert that preceded the error.
            let failed = db
                .execute_query(
                    &format!(
                        "INSERT INTO {table} (id, label) VALUES (2, 'doomed'); \
                         SELECT 1 / 0 AS boom"
                    ),
                    &none,
                )
                .await;
            assert!(failed.is_err());

            let frame = db
                .load_data_from_query(
                    &format!("SELECT id, label FROM {table} ORDER BY id"),
                    &none,
                )
                .await?;
            assert_eq!(frame.shape(), (1, 2));
            assert_eq!(frame.columns(), ["id", "label"]);
            assert_eq!(frame.get(0, "id"), Some(&SqlValue::Int(1)));
            assert_eq!(
                frame.get(0, "label"),
                Some(&SqlValue::Text("first".to_string()))
            );

            // Same statements by way of a SQL file.
            let dir = tempfile::tempdir()?;
            let mut file = std::fs::File::create(dir.path().join("query.sql"))?;
            writeln!(file, "SELECT COUNT(*) AS n FROM {table} WHERE id = :id")?;
            drop(file);

            let counted = db
                .execute_sql_file(dir.path(), "query.sql", &SqlParams::new().with("id", 1i64))
                .await?
                .expect("COUNT should return a row");
            assert_eq!(counted.rows()[0].get("n"), Some(&SqlValue::Int(1)));

            Ok::<(), Box<dyn std::error::Error>>(())
        }
        .await;

        // Best-effort cleanup before reporting the outcome.
        let _ = db
            .execute_query(&format!("DROP TABLE {table}"), &none)
            .await;

        result
    })
}
