//! The crate-wide value type for query parameters and result cells.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use tiberius::{ColumnData, ToSql};

/// A single database value, usable both as a query parameter and as a
/// result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// 64-bit integer (SQL Server tinyint through bigint all land here)
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Text value
    Text(String),
    /// Bit / boolean value
    Bool(bool),
    /// Date-and-time value
    Timestamp(NaiveDateTime),
    /// NULL
    Null,
    /// JSON document
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl SqlValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let SqlValue::Int(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Boolean view of the value; integer 0/1 coerces, anything else is `None`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(v) => Some(*v),
            SqlValue::Int(0) => Some(false),
            SqlValue::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamp view; text in the common `YYYY-MM-DD HH:MM:SS[.fff]`
    /// shapes parses through.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(v) => Some(*v),
            SqlValue::Text(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.3f"))
                .ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(v) = self {
            Some(v)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Lossy JSON rendering, used by the frame serializer. Timestamps become
    /// strings, blobs become byte arrays, non-finite floats become null.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            SqlValue::Int(v) => JsonValue::from(*v),
            SqlValue::Float(v) => serde_json::Number::from_f64(*v)
                .map_or(JsonValue::Null, JsonValue::Number),
            SqlValue::Text(v) => JsonValue::String(v.clone()),
            SqlValue::Bool(v) => JsonValue::Bool(*v),
            SqlValue::Timestamp(v) => {
                JsonValue::String(v.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
            }
            SqlValue::Null => JsonValue::Null,
            SqlValue::Json(v) => v.clone(),
            SqlValue::Blob(v) => JsonValue::Array(v.iter().map(|b| JsonValue::from(*b)).collect()),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            SqlValue::Int(v) => ColumnData::I64(Some(*v)),
            SqlValue::Float(v) => ColumnData::F64(Some(*v)),
            SqlValue::Text(v) => ColumnData::String(Some(Cow::from(v.as_str()))),
            SqlValue::Bool(v) => ColumnData::Bit(Some(*v)),
            // The server casts ISO-8601 text to datetime2 on its own.
            SqlValue::Timestamp(v) => ColumnData::String(Some(Cow::from(
                v.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            ))),
            SqlValue::Null => ColumnData::String(None),
            SqlValue::Json(v) => ColumnData::String(Some(Cow::from(v.to_string()))),
            SqlValue::Blob(v) => ColumnData::Binary(Some(Cow::from(v.as_slice()))),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v.into())
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Blob(v)
    }
}

impl From<JsonValue> for SqlValue {
    fn from(v: JsonValue) -> Self {
        SqlValue::Json(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}
