//! Statement execution against a checked-out connection.

use std::sync::Arc;

use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::ToSql;
use tracing::warn;

use crate::error::DbClientError;
use crate::pool::MssqlClient;
use crate::results::{ResultSet, SqlRow};
use crate::values::SqlValue;

/// Run one statement inside a transaction scope: `BEGIN TRANSACTION`,
/// commit on success, roll back on any failure. The original error wins
/// over a secondary rollback failure.
pub(crate) async fn run_in_transaction(
    client: &mut MssqlClient,
    sql: &str,
    values: &[&SqlValue],
) -> Result<Option<ResultSet>, DbClientError> {
    exec_simple(client, "BEGIN TRANSACTION").await?;
    match run_statement(client, sql, values).await {
        Ok(result) => {
            exec_simple(client, "COMMIT TRANSACTION").await?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback) = exec_simple(client, "ROLLBACK TRANSACTION").await {
                warn!("Rollback after failed statement also failed: {rollback}");
            }
            Err(e)
        }
    }
}

/// Execute one parameterized statement. Returns `Some(ResultSet)` when the
/// statement produced a rowset, `None` when it did not (DDL, DML). The
/// server sequences any multi-statement batch on its own; no splitting
/// happens here.
pub(crate) async fn run_statement(
    client: &mut MssqlClient,
    sql: &str,
    values: &[&SqlValue],
) -> Result<Option<ResultSet>, DbClientError> {
    let bound: Vec<&dyn ToSql> = values.iter().map(|v| *v as &dyn ToSql).collect();
    let mut stream = client.query(sql, &bound).await?;

    let column_names: Option<Vec<String>> = stream
        .columns()
        .await?
        .filter(|cols| !cols.is_empty())
        .map(|cols| cols.iter().map(|c| c.name().to_string()).collect());

    let Some(columns) = column_names else {
        // Drain the stream so the connection is clean for the commit.
        stream.into_results().await?;
        return Ok(None);
    };

    let columns = Arc::new(columns);
    let mut result = ResultSet::new(columns.clone(), 16);
    let mut rows = stream.into_row_stream();
    while let Some(row) = rows.try_next().await? {
        let mut cells = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            cells.push(column_value(&row, idx));
        }
        result.push(SqlRow::new(columns.clone(), cells));
    }

    Ok(Some(result))
}

async fn exec_simple(client: &mut MssqlClient, sql: &str) -> Result<(), DbClientError> {
    client.simple_query(sql).await?.into_results().await?;
    Ok(())
}

/// Pull one cell out of a driver row. Tiberius types vary with the column
/// definition, so probe from most to least specific; anything unrecognized
/// comes back as NULL.
fn column_value(row: &tiberius::Row, idx: usize) -> SqlValue {
    if let Ok(Some(v)) = row.try_get::<u8, _>(idx) {
        return SqlValue::Int(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<i16, _>(idx) {
        return SqlValue::Int(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<i32, _>(idx) {
        return SqlValue::Int(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<i64, _>(idx) {
        return SqlValue::Int(v);
    }
    if let Ok(Some(v)) = row.try_get::<f32, _>(idx) {
        return SqlValue::Float(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<f64, _>(idx) {
        return SqlValue::Float(v);
    }
    if let Ok(Some(v)) = row.try_get::<bool, _>(idx) {
        return SqlValue::Bool(v);
    }
    if let Ok(Some(v)) = row.try_get::<NaiveDateTime, _>(idx) {
        return SqlValue::Timestamp(v);
    }
    if let Ok(Some(v)) = row.try_get::<&str, _>(idx) {
        return SqlValue::Text(v.to_string());
    }
    if let Ok(Some(v)) = row.try_get::<&[u8], _>(idx) {
        return SqlValue::Blob(v.to_vec());
    }
    SqlValue::Null
}
