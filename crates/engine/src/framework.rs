//! The automation entry point.
//!
//! `AutomationFramework` holds the status it filters on and the unit of work
//! it queries through. A run fetches the matching workflows once and drops
//! them; the rows are only traced, never returned.

use tracing::{info, instrument, trace};

use config::db_config::DEFAULT_SCHEMA_OWNER;
use db::repository::workflows::{self as wf_repo, FINISHED};
use db::UnitOfWork;

use crate::EngineError;

/// Status used when none is configured.
pub const DEFAULT_STATUS: &str = FINISHED;

pub struct AutomationFramework {
    status: String,
    schema_owner: String,
    uow: UnitOfWork,
}

impl AutomationFramework {
    /// Query `status` in the default schema owner's `workflows` table.
    pub fn new(status: impl Into<String>, uow: UnitOfWork) -> Self {
        Self {
            status: status.into(),
            schema_owner: DEFAULT_SCHEMA_OWNER.to_string(),
            uow,
        }
    }

    pub fn with_schema_owner(mut self, schema_owner: impl Into<String>) -> Self {
        self.schema_owner = schema_owner.into();
        self
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Run the workflow query once and discard the result.
    ///
    /// # Errors
    /// Any configuration, connectivity or query failure from the db crate.
    #[instrument(skip(self), fields(status = %self.status, owner = %self.schema_owner))]
    pub async fn run(&self) -> Result<(), EngineError> {
        let rows = wf_repo::get_workflows_by_status(&self.uow, &self.schema_owner, &self.status)
            .await?;

        info!("{} workflows with status '{}'", rows.len(), self.status);
        if tracing::enabled!(tracing::Level::TRACE) {
            for row in &rows {
                trace!(row = %serde_json::to_string(row).unwrap_or_default());
            }
        }

        Ok(())
    }
}
