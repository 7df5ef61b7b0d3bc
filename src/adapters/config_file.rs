//! Tool configuration and credentials loading from the local environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::config::{self, parse_config_content};
use crate::domain::{AppError, CiConfig, Credentials, PRIVATE_TOKEN_ENV};

/// Load `.env` from the working directory (or a parent) into the process environment.
///
/// Variables already set in the environment take precedence. Returns the loaded file,
/// `None` when there is none. Runs before logging is installed, so callers report the outcome.
pub fn load_dotenv() -> Result<Option<PathBuf>, AppError> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>, AppError> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(AppError::config_error(format!("unreadable .env file: {}", e))),
    }
}

/// Load the tool configuration.
///
/// An explicit path must exist. Otherwise `dbnomics-ci.toml` in `cwd` is used
/// when present, and built-in defaults apply when it is not.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<CiConfig, AppError> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(AppError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => {
            let default_path = config::paths::config(cwd);
            if !default_path.is_file() {
                return Ok(CiConfig::default());
            }
            default_path
        }
    };

    tracing::debug!("loading configuration from {}", path.display());
    let content = fs::read_to_string(&path)?;
    parse_config_content(&content)
}

/// Read the GitLab private token from the environment.
pub fn load_credentials() -> Result<Credentials, AppError> {
    Credentials::from_lookup(std::env::var(PRIVATE_TOKEN_ENV).ok())
}
