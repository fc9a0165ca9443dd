//! Unit of work: one session, one transaction boundary, one scope.
//!
//! ```ignore
//! let mut scope = uow.begin().await?;
//! let rows = scope.execute(&statement).await;
//! scope.finish().await?;
//! ```
//!
//! A scope releases its session exactly once: through [`UnitOfWorkScope::commit`],
//! [`UnitOfWorkScope::rollback`], [`UnitOfWorkScope::finish`], or by being
//! dropped. Every release path consumes the scope, so a released session can
//! never be reached again.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::session::{Session, SessionFactory};
use crate::{DbError, Row, Statement};

/// What [`UnitOfWorkScope::finish`] does with the open transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleasePolicy {
    /// Discard anything the scope did. Reads are unaffected.
    #[default]
    Rollback,
    Commit,
}

/// Factory for scoped sessions.
#[derive(Clone)]
pub struct UnitOfWork {
    factory: Arc<dyn SessionFactory>,
    policy: ReleasePolicy,
}

impl UnitOfWork {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            factory,
            policy: ReleasePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReleasePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ReleasePolicy {
        self.policy
    }

    /// Open a session and enter its scope.
    pub async fn begin(&self) -> Result<UnitOfWorkScope, DbError> {
        let session = self.factory.open().await?;
        debug!("unit of work scope entered");
        Ok(UnitOfWorkScope {
            session: Some(session),
            policy: self.policy,
        })
    }
}

/// An entered unit of work. Owns its session until released.
pub struct UnitOfWorkScope {
    session: Option<Box<dyn Session>>,
    policy: ReleasePolicy,
}

impl UnitOfWorkScope {
    pub async fn execute(&mut self, statement: &Statement) -> Result<Vec<Row>, DbError> {
        let session = self.session.as_mut().ok_or(DbError::SessionClosed)?;
        session.execute(statement).await
    }

    pub async fn commit(self) -> Result<(), DbError> {
        self.release(ReleasePolicy::Commit).await
    }

    pub async fn rollback(self) -> Result<(), DbError> {
        self.release(ReleasePolicy::Rollback).await
    }

    /// Leave the scope applying the unit of work's release policy.
    pub async fn finish(self) -> Result<(), DbError> {
        let policy = self.policy;
        self.release(policy).await
    }

    async fn release(mut self, policy: ReleasePolicy) -> Result<(), DbError> {
        let mut session = self.session.take().ok_or(DbError::SessionClosed)?;
        let result = match policy {
            ReleasePolicy::Commit => session.commit().await,
            ReleasePolicy::Rollback => session.rollback().await,
        };
        drop(session);
        debug!("unit of work scope released ({:?})", policy);
        result
    }
}

impl Drop for UnitOfWorkScope {
    fn drop(&mut self) {
        if self.session.take().is_some() {
            warn!("unit of work scope dropped without finish; session released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FakeSessionFactory;

    fn uow(fake: &FakeSessionFactory) -> UnitOfWork {
        UnitOfWork::new(Arc::new(fake.clone()))
    }

    #[tokio::test]
    async fn default_policy_rolls_back_on_finish() {
        let fake = FakeSessionFactory::new(|_| Ok(Vec::new()));
        let uow = uow(&fake);
        assert_eq!(uow.policy(), ReleasePolicy::Rollback);

        uow.begin().await.unwrap().finish().await.unwrap();

        let log = fake.log();
        assert_eq!((log.opened, log.rollbacks, log.commits, log.released), (1, 1, 0, 1));
    }

    #[tokio::test]
    async fn explicit_commit_overrides_policy() {
        let fake = FakeSessionFactory::new(|_| Ok(Vec::new()));
        let scope = uow(&fake).begin().await.unwrap();

        scope.commit().await.unwrap();

        let log = fake.log();
        assert_eq!((log.commits, log.rollbacks, log.released), (1, 0, 1));
    }

    #[tokio::test]
    async fn dropped_scope_releases_without_round_trip() {
        let fake = FakeSessionFactory::new(|_| Ok(Vec::new()));
        {
            let mut scope = uow(&fake).begin().await.unwrap();
            scope.execute(&Statement::new("SELECT 1")).await.unwrap();
        }

        let log = fake.log();
        assert_eq!(log.released, 1);
        assert_eq!((log.commits, log.rollbacks), (0, 0));
    }

    #[tokio::test]
    async fn each_scope_gets_its_own_session() {
        let fake = FakeSessionFactory::new(|_| Ok(Vec::new()));
        let uow = uow(&fake);

        for _ in 0..3 {
            uow.begin().await.unwrap().finish().await.unwrap();
        }

        let log = fake.log();
        assert_eq!((log.opened, log.released), (3, 3));
    }
}
