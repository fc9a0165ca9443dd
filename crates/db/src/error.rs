//! Typed error type for the db crate.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Anything raised by a sqlx driver while connecting or executing.
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Anything raised by the Oracle client while connecting or executing.
    #[error("oracle error: {0}")]
    Oracle(#[from] oracle::Error),

    #[error("unsupported database driver '{0}'")]
    UnsupportedDriver(String),

    #[error("malformed connection URI: {0}")]
    InvalidUri(String),

    #[error("no connection available within {0:?}")]
    AcquireTimeout(Duration),

    /// A blocking driver call panicked or was cancelled.
    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("statement references unbound parameter ':{0}'")]
    UnboundParameter(String),

    #[error("invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),

    /// The session was already committed, rolled back or released.
    #[error("session is closed")]
    SessionClosed,

    #[error("cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },
}
