//! `.env` loading.
//!
//! Loading is an explicit call made by the binary at startup, never a side
//! effect of linking this crate. Variables already present in the process
//! environment always win over the file.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::ConfigError;

/// Load variables from an env file into the process environment.
///
/// With `Some(path)` exactly that file is read; with `None` the current
/// working directory and then each of its parents is searched for `.env`,
/// so the file that wins depends on where the binary is started from, not
/// on where it is installed. Pass an explicit path (or `ENV_FILE`) to pin
/// it to a project root.
///
/// Call this before installing a tracing subscriber if the file may set
/// `RUST_LOG`. The log lines emitted here are dropped in that case; callers
/// log the returned path themselves once logging is up.
///
/// Returns the path that was loaded, or `None` when no file was found.
/// A file that exists but cannot be parsed is an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            if !path.exists() {
                debug!("env file {} does not exist, skipping", path.display());
                return Ok(None);
            }
            dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Loaded environment from {}", path.display());
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                info!("Loaded environment from {}", found.display());
                Ok(Some(found))
            }
            Err(e) if e.not_found() => {
                debug!("No .env file found, using process environment only");
                Ok(None)
            }
            Err(source) => Err(ConfigError::EnvFile {
                path: PathBuf::from(".env"),
                source,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn env_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.env");
        assert!(load_env_file(Some(&path)).unwrap().is_none());
    }

    #[test]
    fn explicit_file_populates_environment() {
        let file = env_file("CONFIG_TEST_POPULATE_HOST=db.internal\n");
        let loaded = load_env_file(Some(file.path())).unwrap();
        assert_eq!(loaded.as_deref(), Some(file.path()));
        assert_eq!(
            std::env::var("CONFIG_TEST_POPULATE_HOST").as_deref(),
            Ok("db.internal")
        );
    }

    #[test]
    fn file_does_not_override_existing_variables() {
        std::env::set_var("CONFIG_TEST_PRESET_USER", "from-process");
        let file = env_file("CONFIG_TEST_PRESET_USER=from-file\n");
        load_env_file(Some(file.path())).unwrap();
        assert_eq!(
            std::env::var("CONFIG_TEST_PRESET_USER").as_deref(),
            Ok("from-process")
        );
    }

    #[test]
    fn malformed_file_is_reported() {
        let file = env_file("CONFIG_TEST_BROKEN='unterminated\n");
        let err = load_env_file(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[test]
    fn scratch_files_are_removed_when_dropped() {
        let file = env_file("CONFIG_TEST_SCRATCH=1\n");
        let path = file.path().to_path_buf();
        load_env_file(Some(&path)).unwrap();
        drop(file);
        assert!(!path.exists());
    }
}
