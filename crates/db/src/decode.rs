//! Per-backend value decoding and binding for the native sqlx drivers.
//!
//! Each decoder picks a Rust type from the column's type name and falls
//! back to text. SQLite is the odd one out: its declared types are only
//! hints, so anything not recognised there is decoded by storage class.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::query::Query;
use sqlx::sqlite::SqliteRow;
use sqlx::{ColumnIndex, Database, Decode, Encode, Type};

use crate::models::ColumnTypes;
use crate::SqlValue;

fn get<'r, T, R>(row: &'r R, index: usize) -> Option<T>
where
    R: sqlx::Row,
    usize: ColumnIndex<R>,
    T: Decode<'r, R::Database> + Type<R::Database>,
{
    row.try_get::<T, usize>(index).ok()
}

fn int_or_text(value: u64) -> SqlValue {
    i64::try_from(value).map_or_else(|_| SqlValue::Text(value.to_string()), SqlValue::Int)
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

pub(crate) fn postgres_value(row: &PgRow, index: usize, types: ColumnTypes<'_>) -> Option<SqlValue> {
    match types.declared {
        "BOOL" => get::<bool, _>(row, index).map(SqlValue::Bool),
        "INT2" => get::<i16, _>(row, index).map(|v| SqlValue::Int(v.into())),
        "INT4" => get::<i32, _>(row, index).map(|v| SqlValue::Int(v.into())),
        "INT8" => get::<i64, _>(row, index).map(SqlValue::Int),
        "FLOAT4" => get::<f32, _>(row, index).map(|v| SqlValue::Float(v.into())),
        "FLOAT8" => get::<f64, _>(row, index).map(SqlValue::Float),
        // Kept as text so no precision is lost.
        "NUMERIC" => get::<Decimal, _>(row, index).map(|v| SqlValue::Text(v.to_string())),
        "TIMESTAMPTZ" => get::<DateTime<Utc>, _>(row, index).map(SqlValue::Timestamp),
        "TIMESTAMP" => get::<NaiveDateTime, _>(row, index).map(|v| SqlValue::Timestamp(v.and_utc())),
        "DATE" => get::<NaiveDate, _>(row, index).map(SqlValue::Date),
        "TIME" => get::<NaiveTime, _>(row, index).map(|v| SqlValue::Text(v.to_string())),
        "BYTEA" => get::<Vec<u8>, _>(row, index).map(SqlValue::Bytes),
        _ => get::<String, _>(row, index).map(SqlValue::Text),
    }
}

// ---------------------------------------------------------------------------
// MySQL
// ---------------------------------------------------------------------------

pub(crate) fn mysql_value(row: &MySqlRow, index: usize, types: ColumnTypes<'_>) -> Option<SqlValue> {
    let declared = types.declared;
    if declared.ends_with("UNSIGNED") {
        return get::<u64, _>(row, index).map(int_or_text);
    }
    match declared {
        "BOOLEAN" => get::<bool, _>(row, index).map(SqlValue::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => get::<i64, _>(row, index)
            .map(SqlValue::Int)
            .or_else(|| get::<u64, _>(row, index).map(int_or_text)),
        "FLOAT" => get::<f32, _>(row, index).map(|v| SqlValue::Float(v.into())),
        "DOUBLE" => get::<f64, _>(row, index).map(SqlValue::Float),
        "DECIMAL" => get::<Decimal, _>(row, index).map(|v| SqlValue::Text(v.to_string())),
        "TIMESTAMP" => get::<DateTime<Utc>, _>(row, index).map(SqlValue::Timestamp),
        "DATETIME" => get::<NaiveDateTime, _>(row, index).map(|v| SqlValue::Timestamp(v.and_utc())),
        "DATE" => get::<NaiveDate, _>(row, index).map(SqlValue::Date),
        "TIME" => get::<NaiveTime, _>(row, index).map(|v| SqlValue::Text(v.to_string())),
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            get::<Vec<u8>, _>(row, index).map(SqlValue::Bytes)
        }
        _ => get::<String, _>(row, index)
            .map(SqlValue::Text)
            .or_else(|| get::<Vec<u8>, _>(row, index).map(SqlValue::Bytes)),
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

pub(crate) fn sqlite_value(row: &SqliteRow, index: usize, types: ColumnTypes<'_>) -> Option<SqlValue> {
    let by_declared = match types.declared {
        "BOOLEAN" => get::<bool, _>(row, index)
            .or_else(|| get::<i64, _>(row, index).map(|v| v != 0))
            .map(SqlValue::Bool),
        "DATETIME" => get::<DateTime<Utc>, _>(row, index)
            .or_else(|| get::<NaiveDateTime, _>(row, index).map(|v| v.and_utc()))
            .map(SqlValue::Timestamp),
        "DATE" => get::<NaiveDate, _>(row, index).map(SqlValue::Date),
        _ => None,
    };

    by_declared.or_else(|| match types.stored {
        "INTEGER" => get::<i64, _>(row, index).map(SqlValue::Int),
        "REAL" => get::<f64, _>(row, index).map(SqlValue::Float),
        "TEXT" => get::<String, _>(row, index).map(SqlValue::Text),
        "BLOB" => get::<Vec<u8>, _>(row, index).map(SqlValue::Bytes),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Bind every value in placeholder order.
pub(crate) fn bind_all<'q, DB>(
    query: Query<'q, DB, <DB as Database>::Arguments<'q>>,
    values: Vec<SqlValue>,
) -> Query<'q, DB, <DB as Database>::Arguments<'q>>
where
    DB: Database,
    Option<String>: Encode<'q, DB> + Type<DB>,
    bool: Encode<'q, DB> + Type<DB>,
    i64: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    Vec<u8>: Encode<'q, DB> + Type<DB>,
    DateTime<Utc>: Encode<'q, DB> + Type<DB>,
    NaiveDate: Encode<'q, DB> + Type<DB>,
{
    values.into_iter().fold(query, |query, value| match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(v),
        SqlValue::Int(v) => query.bind(v),
        SqlValue::Float(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Bytes(v) => query.bind(v),
        SqlValue::Timestamp(v) => query.bind(v),
        SqlValue::Date(v) => query.bind(v),
    })
}
