//! `config` crate — environment-driven settings.
//!
//! Loads an optional `.env` file and turns the `DB_*` variables into a
//! [`DbConfig`].  Nothing happens at link time; callers decide when to load.

pub mod db_config;
pub mod env_file;
pub mod error;

pub use db_config::DbConfig;
pub use env_file::load_env_file;
pub use error::ConfigError;
