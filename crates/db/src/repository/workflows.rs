//! Workflow queries.

use tracing::{debug, instrument};

use crate::statement::ensure_identifier;
use crate::{DbError, Row, Statement, UnitOfWork};

/// Status filter the automation runs with by default.
pub const FINISHED: &str = "FINISHED";

/// `SELECT * FROM <owner>.workflows WHERE status = :status` with `status` bound.
///
/// # Errors
/// [`DbError::InvalidIdentifier`] if `schema_owner` is not a bare identifier.
pub fn workflows_by_status_statement(schema_owner: &str, status: &str) -> Result<Statement, DbError> {
    let owner = ensure_identifier(schema_owner)?;
    Ok(
        Statement::new(format!("SELECT * FROM {owner}.workflows WHERE status = :status"))
            .bind("status", status),
    )
}

/// Fetch every workflow row with the given `status`.
///
/// Runs exactly one statement inside its own unit-of-work scope. The scope
/// is released on both the success and the error path; query errors are
/// returned as the driver reported them. Rows come back in database order.
#[instrument(skip(uow))]
pub async fn get_workflows_by_status(
    uow: &UnitOfWork,
    schema_owner: &str,
    status: &str,
) -> Result<Vec<Row>, DbError> {
    let statement = workflows_by_status_statement(schema_owner, status)?;

    let mut scope = uow.begin().await?;
    let result = scope.execute(&statement).await;
    let released = scope.finish().await;

    let rows = result?;
    released?;

    debug!("fetched {} workflow rows", rows.len());
    Ok(rows)
}
