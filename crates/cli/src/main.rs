//! `rusty-automation-tool` CLI entry-point.
//!
//! Loads `.env`, builds the database configuration from `DB_*` variables,
//! and runs the workflow status query once. Nothing is printed on success;
//! any failure is reported on stderr with a non-zero exit code.
//!
//! The env file is loaded before logging is set up so it can carry
//! `RUST_LOG`. Without `--env-file` it is looked up from the current working
//! directory upwards, so run the tool from the project directory (or point
//! `ENV_FILE` at the project's `.env`) to get a project-root load.

mod tracing_setup;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::DbConfig;
use db::UnitOfWork;
use engine::{AutomationFramework, DEFAULT_STATUS};

#[derive(Debug, Parser)]
#[command(
    name = "rusty-automation-tool",
    about = "Fetch workflows by status from the automation database",
    version
)]
struct Cli {
    /// Env file to load before reading `DB_*` variables
    /// (default: search for `.env` from the working directory upwards).
    #[arg(long, env = "ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Workflow status to filter on.
    #[arg(long, default_value = DEFAULT_STATUS)]
    status: String,

    /// Debug-level logging (ignored when RUST_LOG is set).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_file = load_environment(cli.env_file.as_deref())?;
    tracing_setup::init_tracing(cli.verbose)?;
    match &env_file {
        Some(path) => info!("Loaded environment from {}", path.display()),
        None => info!("No env file found, using process environment only"),
    }

    let cfg = DbConfig::from_env().context("invalid database configuration")?;
    info!("Connecting to {}", cfg.redacted_uri());

    let factory = db::connect(&cfg.connection_uri(), cfg.max_connections, cfg.pool_timeout)
        .await
        .with_context(|| format!("failed to connect to {}", cfg.redacted_uri()))?;
    let uow = UnitOfWork::new(factory);

    AutomationFramework::new(cli.status, uow)
        .with_schema_owner(cfg.schema_owner)
        .run()
        .await
        .context("workflow query failed")?;

    Ok(())
}

/// Load the env file into the process environment.
///
/// Runs before any tracing subscriber exists, so it reports what it loaded
/// instead of logging it.
fn load_environment(env_file: Option<&Path>) -> Result<Option<PathBuf>> {
    config::load_env_file(env_file).context("failed to load env file")
}
