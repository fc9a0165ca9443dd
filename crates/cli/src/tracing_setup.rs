//! Console logging for the binary.
//!
//! `RUST_LOG` always wins; otherwise `--verbose` selects `debug` and the
//! default is `info`. `RUST_LOG` is read when the subscriber is installed,
//! so a value coming from the env file only counts if that file was loaded
//! first.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

pub fn init_tracing(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
