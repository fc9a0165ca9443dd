//! `FakeSessionFactory` — an in-memory test double for `SessionFactory`.
//!
//! Every statement is answered by a caller-supplied handler, and every
//! session lifecycle event is recorded so tests can assert on what the code
//! under test did to the database.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::session::{Session, SessionFactory};
use crate::{DbError, Row, Statement};

type Handler = dyn Fn(&Statement) -> Result<Vec<Row>, DbError> + Send + Sync;

/// Everything the fake has observed, in call order.
#[derive(Debug, Default, Clone)]
pub struct FakeLog {
    pub opened: usize,
    pub released: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub statements: Vec<Statement>,
}

/// A session factory whose sessions never touch a real database.
#[derive(Clone)]
pub struct FakeSessionFactory {
    handler: Arc<Handler>,
    log: Arc<Mutex<FakeLog>>,
    fail_open: Option<String>,
}

impl FakeSessionFactory {
    /// Answer every statement with `handler`.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Statement) -> Result<Vec<Row>, DbError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            log: Arc::new(Mutex::new(FakeLog::default())),
            fail_open: None,
        }
    }

    /// Serve `rows` as a table: a statement binding `:status` gets back the
    /// rows whose `status` column equals the bound value.
    pub fn with_table(rows: Vec<Row>) -> Self {
        Self::new(move |stmt| {
            let wanted = stmt.param("status");
            Ok(rows
                .iter()
                .filter(|row| wanted.is_none() || row.get("status") == wanted)
                .cloned()
                .collect())
        })
    }

    /// Every statement fails with a driver protocol error.
    pub fn failing(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        Self::new(move |_| Err(DbError::Sqlx(sqlx::Error::Protocol(msg.clone()))))
    }

    /// Opening a session fails, as if the database were unreachable.
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self {
            fail_open: Some(msg.into()),
            ..Self::new(|_| Ok(Vec::new()))
        }
    }

    /// Snapshot of the recorded events.
    pub fn log(&self) -> FakeLog {
        lock(&self.log).clone()
    }
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    async fn open(&self) -> Result<Box<dyn Session>, DbError> {
        if let Some(msg) = &self.fail_open {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(msg.clone())));
        }
        lock(&self.log).opened += 1;
        Ok(Box::new(FakeSession {
            handler: Arc::clone(&self.handler),
            log: Arc::clone(&self.log),
            closed: false,
        }))
    }
}

struct FakeSession {
    handler: Arc<Handler>,
    log: Arc<Mutex<FakeLog>>,
    closed: bool,
}

#[async_trait]
impl Session for FakeSession {
    async fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, DbError> {
        if self.closed {
            return Err(DbError::SessionClosed);
        }
        lock(&self.log).statements.push(statement.clone());
        (self.handler)(statement)
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        if std::mem::replace(&mut self.closed, true) {
            return Err(DbError::SessionClosed);
        }
        lock(&self.log).commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        if std::mem::replace(&mut self.closed, true) {
            return Err(DbError::SessionClosed);
        }
        lock(&self.log).rollbacks += 1;
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        lock(&self.log).released += 1;
    }
}

// A panicking test must not poison the log for the assertions that follow.
fn lock(log: &Mutex<FakeLog>) -> MutexGuard<'_, FakeLog> {
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
