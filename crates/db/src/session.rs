//! The session seam between the unit of work and a concrete driver.

use async_trait::async_trait;

use crate::{DbError, Row, Statement};

/// An open database session bound to one transaction.
///
/// Releasing the session is dropping it: implementations must give their
/// connection back (rolling back anything uncommitted) in `Drop`.
#[async_trait]
pub trait Session: Send {
    /// Run one statement and materialise every returned row.
    async fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, DbError>;

    async fn commit(&mut self) -> Result<(), DbError>;

    async fn rollback(&mut self) -> Result<(), DbError>;
}

/// Opens fresh sessions on demand.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn Session>, DbError>;
}
