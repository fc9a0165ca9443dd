//! Engine-level error types.

use thiserror::Error;

/// Errors produced while running an automation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Persistence error from the db crate.
    #[error("database error: {0}")]
    Database(#[from] db::DbError),
}
