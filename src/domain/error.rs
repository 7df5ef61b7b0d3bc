use std::io;

use thiserror::Error;

/// Library-wide error type for dbnomics-ci operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Private token missing from the environment and `.env`.
    #[error(
        "Please set PRIVATE_TOKEN environment variable before using this tool (or put it in a local .env file)"
    )]
    MissingPrivateToken,

    /// A remote resource (project, namespace, trigger...) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The token was rejected or lacks privilege.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Job kind is not one of download, convert, index.
    #[error("Unknown job kind '{0}': must be one of download, convert, index")]
    UnknownJobKind(String),

    /// Transport failure talking to a remote service.
    #[error("Network error: {0}")]
    Network(String),

    /// Remote API answered with an unexpected status.
    #[error("API error ({status}) on {endpoint}: {message}")]
    Api { status: u16, endpoint: String, message: String },

    /// Provider slug is invalid.
    #[error(
        "Invalid provider slug '{0}': must be lowercase alphanumeric with hyphens or underscores"
    )]
    InvalidProviderSlug(String),

    /// GitLab project path is invalid.
    #[error("Invalid project path '{0}': expected 'group/project'")]
    InvalidProjectPath(String),

    /// Schedule time is not a valid `H:MM`.
    #[error("Invalid time '{0}': expected HOUR:MINUTE with 0 <= HOUR <= 23 and 0 <= MINUTE <= 59")]
    InvalidScheduleTime(String),

    /// More than one trigger could be used and none is described by the provider slug.
    #[error("Project '{project}' has {count} pipeline triggers and none is described '{description}'. See {settings_url}")]
    AmbiguousTrigger { project: String, count: usize, description: String, settings_url: String },

    /// Operator declined a confirmation prompt.
    #[error("Aborted by operator")]
    Aborted,

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn not_found<S: Into<String>>(what: S) -> Self {
        AppError::NotFound(what.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers matching on error categories.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::UnknownJobKind(_)
            | AppError::InvalidProviderSlug(_)
            | AppError::InvalidProjectPath(_)
            | AppError::InvalidScheduleTime(_)
            | AppError::AmbiguousTrigger { .. }
            | AppError::TomlParseError(_) => io::ErrorKind::InvalidInput,
            AppError::NotFound(_) => io::ErrorKind::NotFound,
            AppError::MissingPrivateToken | AppError::Authorization(_) => {
                io::ErrorKind::PermissionDenied
            }
            AppError::Network(_) => io::ErrorKind::ConnectionAborted,
            AppError::Api { .. } => io::ErrorKind::Other,
            AppError::Aborted => io::ErrorKind::Interrupted,
        }
    }
}
