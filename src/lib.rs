//! dbnomics-ci: configure and drive the GitLab CI of DBnomics data providers.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;


pub use app::api;
pub use app::api::{ConfigureOptions, ConfigureOutcome, GlobalOptions, RepositoryStatus};
pub use domain::{AppError, JobKind, JobRun, ProviderSlug, SettingsSnapshot};
