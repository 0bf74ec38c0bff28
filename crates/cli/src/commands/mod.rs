//! Command implementations.
//!
//! Each command talks to the backend through the admin console's
//! [`ApiClient`], so the CLI sees the same sorting and validation.

use bazaar_admin::api::{ApiClient, ApiError};
use bazaar_admin::config::{ApiConfig, ConfigError};
use bazaar_core::{ExportError, ReorderError};
use thiserror::Error;

pub mod categories;
pub mod orders;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Reorder(#[from] ReorderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Build a backend client from `API_*` environment variables.
///
/// # Errors
///
/// Returns [`CliError::Config`] for missing or invalid settings.
pub fn client() -> Result<ApiClient, CliError> {
    let config = ApiConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Using backend");
    Ok(ApiClient::new(&config)?)
}

/// Print command output.
#[allow(clippy::print_stdout)]
fn emit(text: &str) {
    print!("{text}");
}
