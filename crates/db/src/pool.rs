//! Connection pools and the sqlx-backed session implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{MySql, Postgres, Sqlite, Transaction};
use tracing::{debug, info};

use crate::decode::{bind_all, mysql_value, postgres_value, sqlite_value};
use crate::models::decode_with;
use crate::session::{Session, SessionFactory};
use crate::statement::Dialect;
use crate::{DbError, Row, Statement};

/// A pool on one of the natively supported sqlx backends.
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Postgres(_) => Dialect::Postgres,
            Self::MySql(_) => Dialect::MySql,
            Self::Sqlite(_) => Dialect::Sqlite,
        }
    }

    async fn begin(&self) -> Result<Tx, DbError> {
        Ok(match self {
            Self::Postgres(pool) => Tx::Postgres(pool.begin().await?),
            Self::MySql(pool) => Tx::MySql(pool.begin().await?),
            Self::Sqlite(pool) => Tx::Sqlite(pool.begin().await?),
        })
    }

    pub async fn close(&self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::MySql(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Create a new connection pool from the given `database_url`.
///
/// `max_connections` controls the pool ceiling and `acquire_timeout` how
/// long a caller waits for a free connection.
///
/// # Errors
/// [`DbError::UnsupportedDriver`] for schemes sqlx has no driver for
/// (Oracle goes through [`crate::oracle_session`]), before any network
/// traffic happens.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DbPool, DbError> {
    let dialect = Dialect::from_uri(database_url)?;
    let url = dialect.normalize_uri(database_url);
    info!(
        "Connecting to {:?} database (max_connections={}, acquire_timeout={:?})",
        dialect, max_connections, acquire_timeout
    );

    let pool = match dialect {
        Dialect::Postgres => DbPool::Postgres(
            PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(acquire_timeout)
                .connect(&url)
                .await?,
        ),
        Dialect::MySql => DbPool::MySql(
            MySqlPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(acquire_timeout)
                .connect(&url)
                .await?,
        ),
        Dialect::Sqlite => DbPool::Sqlite(
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(acquire_timeout)
                .connect(&url)
                .await?,
        ),
        Dialect::Oracle => return Err(DbError::UnsupportedDriver("oracle (sqlx)".to_string())),
    };
    Ok(pool)
}

// ---------------------------------------------------------------------------
// SqlxSessionFactory
// ---------------------------------------------------------------------------

/// Hands out one pooled transaction per session.
#[derive(Clone)]
pub struct SqlxSessionFactory {
    pool: DbPool,
}

impl SqlxSessionFactory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Resolve the backend from `database_url` and open a pool for it.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DbError> {
        let pool = create_pool(database_url, max_connections, acquire_timeout).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.pool.dialect()
    }
}

#[async_trait]
impl SessionFactory for SqlxSessionFactory {
    async fn open(&self) -> Result<Box<dyn Session>, DbError> {
        let tx = self.pool.begin().await?;
        debug!("opened sqlx session ({:?})", self.dialect());
        Ok(Box::new(SqlxSession { tx: Some(tx) }))
    }
}

// ---------------------------------------------------------------------------
// SqlxSession
// ---------------------------------------------------------------------------

enum Tx {
    Postgres(Transaction<'static, Postgres>),
    MySql(Transaction<'static, MySql>),
    Sqlite(Transaction<'static, Sqlite>),
}

/// A session backed by one sqlx transaction.
///
/// Dropping it without commit rolls the transaction back and returns the
/// connection to the pool.
pub struct SqlxSession {
    tx: Option<Tx>,
}

#[async_trait]
impl Session for SqlxSession {
    async fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, DbError> {
        let tx = self.tx.as_mut().ok_or(DbError::SessionClosed)?;

        match tx {
            Tx::Postgres(tx) => {
                let compiled = statement.compile(Dialect::Postgres)?;
                let rows = bind_all(sqlx::query::<Postgres>(&compiled.sql), compiled.binds)
                    .fetch_all(&mut **tx)
                    .await?;
                rows.iter().map(|row| decode_with(row, postgres_value)).collect()
            }
            Tx::MySql(tx) => {
                let compiled = statement.compile(Dialect::MySql)?;
                let rows = bind_all(sqlx::query::<MySql>(&compiled.sql), compiled.binds)
                    .fetch_all(&mut **tx)
                    .await?;
                rows.iter().map(|row| decode_with(row, mysql_value)).collect()
            }
            Tx::Sqlite(tx) => {
                let compiled = statement.compile(Dialect::Sqlite)?;
                let rows = bind_all(sqlx::query::<Sqlite>(&compiled.sql), compiled.binds)
                    .fetch_all(&mut **tx)
                    .await?;
                rows.iter().map(|row| decode_with(row, sqlite_value)).collect()
            }
        }
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        match self.tx.take().ok_or(DbError::SessionClosed)? {
            Tx::Postgres(tx) => tx.commit().await?,
            Tx::MySql(tx) => tx.commit().await?,
            Tx::Sqlite(tx) => tx.commit().await?,
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        match self.tx.take().ok_or(DbError::SessionClosed)? {
            Tx::Postgres(tx) => tx.rollback().await?,
            Tx::MySql(tx) => tx.rollback().await?,
            Tx::Sqlite(tx) => tx.rollback().await?,
        }
        Ok(())
    }
}
