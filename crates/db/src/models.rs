//! Driver-neutral row representation.
//!
//! Queries in this crate return untyped rows: the `workflows` table has no
//! schema the application relies on, so every row is kept as an ordered
//! column-name → value mapping exactly as the database reported it.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use sqlx::{Column, ColumnIndex, TypeInfo, ValueRef};

use crate::DbError;

// ---------------------------------------------------------------------------
// SqlValue
// ---------------------------------------------------------------------------

/// A single column value (or bind parameter).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Serialised as RFC 3339. Zone-less database values are taken as UTC.
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One result row, columns in the order the driver returned them.
pub type Row = IndexMap<String, SqlValue>;

/// Column type names handed to a per-backend value decoder.
pub(crate) struct ColumnTypes<'a> {
    /// Type the column was declared with (or inferred by the server).
    pub declared: &'a str,
    /// Type of the value actually stored; differs from `declared` only on
    /// SQLite, where storage classes are per value.
    pub stored: &'a str,
}

/// Convert a native sqlx row into a [`Row`].
///
/// NULLs are handled here; every other value goes through `decode`, which
/// returns `None` for a type it does not understand.
pub(crate) fn decode_with<R>(
    row: &R,
    decode: fn(&R, usize, ColumnTypes<'_>) -> Option<SqlValue>,
) -> Result<Row, DbError>
where
    R: sqlx::Row,
    usize: ColumnIndex<R>,
{
    let mut out = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let index = column.ordinal();
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            let stored = raw.type_info().name().to_string();
            let declared = column.type_info().name();
            let types = ColumnTypes {
                declared,
                stored: &stored,
            };
            decode(row, index, types).ok_or_else(|| DbError::Decode {
                column: column.name().to_string(),
                message: format!("unsupported column type {declared}"),
            })?
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}
