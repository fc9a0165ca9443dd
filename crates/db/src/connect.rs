//! Pick a session factory from a connection URI.

use std::sync::Arc;
use std::time::Duration;

use crate::oracle_session::OracleSessionFactory;
use crate::pool::SqlxSessionFactory;
use crate::session::SessionFactory;
use crate::statement::Dialect;
use crate::DbError;

/// Open the session factory the URI's scheme calls for.
///
/// `oracle` goes to the ODPI-C pool, everything sqlx knows to a native sqlx
/// pool.
///
/// # Errors
/// [`DbError::UnsupportedDriver`] for an unknown scheme, before any network
/// traffic happens.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<Arc<dyn SessionFactory>, DbError> {
    let factory: Arc<dyn SessionFactory> = match Dialect::from_uri(database_url)? {
        Dialect::Oracle => Arc::new(
            OracleSessionFactory::connect(database_url, max_connections, acquire_timeout).await?,
        ),
        Dialect::Postgres | Dialect::MySql | Dialect::Sqlite => Arc::new(
            SqlxSessionFactory::connect(database_url, max_connections, acquire_timeout).await?,
        ),
    };
    Ok(factory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_scheme_fails_before_connecting() {
        let err = connect("mssql://sa:pw@localhost:1433/db", 1, Duration::from_secs(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DbError::UnsupportedDriver(s) if s == "mssql"));
    }

    #[tokio::test]
    async fn malformed_oracle_uri_fails_before_connecting() {
        let err = connect("oracle+cx_oracle://localhost:1521/orcl", 1, Duration::from_secs(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, DbError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn sqlite_uri_gets_a_sqlx_factory() {
        let factory = connect("sqlite::memory:", 1, Duration::from_secs(5)).await.unwrap();
        let mut session = factory.open().await.unwrap();
        let rows = session
            .execute(&crate::Statement::new("SELECT 1 AS one"))
            .await
            .unwrap();
        assert_eq!(rows[0]["one"], crate::SqlValue::Int(1));
    }
}
