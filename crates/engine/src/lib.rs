//! `engine` crate — the automation service layer and its entry point.

pub mod error;
pub mod framework;

pub use error::EngineError;
pub use framework::{AutomationFramework, DEFAULT_STATUS};
