//! `db` crate — the data access layer.
//!
//! Provides the session seam ([`Session`] / [`SessionFactory`]), a scoped
//! [`UnitOfWork`] on top of it, native sqlx and Oracle implementations, and
//! the repository functions the automation runs.  No business logic lives
//! here.

pub mod connect;
mod decode;
pub mod error;
pub mod mock;
pub mod models;
pub mod oracle_session;
pub mod pool;
pub mod repository;
pub mod session;
pub mod statement;
pub mod unit_of_work;

pub use connect::connect;
pub use error::DbError;
pub use models::{Row, SqlValue};
pub use oracle_session::{OracleConnectOptions, OracleSessionFactory};
pub use pool::{DbPool, SqlxSessionFactory};
pub use session::{Session, SessionFactory};
pub use statement::{Dialect, Statement};
pub use unit_of_work::{ReleasePolicy, UnitOfWork, UnitOfWorkScope};
