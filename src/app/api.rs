//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together configuration
//! loading, adapter construction and command execution.

use std::path::PathBuf;

use url::Url;

use crate::adapters::browser_command::CommandBrowser;
use crate::adapters::config_file;
use crate::adapters::dashboard_template::render_markdown;
use crate::adapters::gitlab_http::HttpGitLabClient;
use crate::adapters::solr_http::HttpSolrIndex;
use crate::app::{
    AppContext,
    commands::{
        cancel_pipelines, configure, configure_dev_data, create_repositories, dashboard,
        delete_provider, generate_ci_yml, ls_providers, open_urls, trigger,
    },
};
use crate::domain::{CiConfig, JobKind, ProjectPath, ProviderSlug};

pub use crate::app::commands::configure::{ConfigureOptions, ConfigureOutcome};
pub use crate::app::commands::create_repositories::RepositoryStatus;
pub use crate::app::commands::dashboard::DashboardFormat;
pub use crate::domain::{AppError, JobRun, Pipeline, SettingChange};

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit configuration file; `dbnomics-ci.toml` in the working directory otherwise.
    pub config_path: Option<PathBuf>,
    /// GitLab base URL overriding the configuration.
    pub gitlab_url: Option<String>,
}

/// Load and validate the configuration, applying command-line overrides.
pub fn load_config(options: &GlobalOptions) -> Result<CiConfig, AppError> {
    let cwd = std::env::current_dir()?;
    let mut config = config_file::load_config(options.config_path.as_deref(), &cwd)?;
    if let Some(gitlab_url) = &options.gitlab_url {
        config.gitlab.base_url = Url::parse(gitlab_url).map_err(|e| {
            AppError::config_error(format!("Invalid GitLab URL '{}': {}", gitlab_url, e))
        })?;
    }
    config.validate()?;
    Ok(config)
}

/// Create an `AppContext` talking to the configured GitLab instance.
fn create_context(options: &GlobalOptions) -> Result<AppContext<HttpGitLabClient>, AppError> {
    let config = load_config(options)?;
    let credentials = config_file::load_credentials()?;
    let gitlab = HttpGitLabClient::new(&config.gitlab, credentials)?;
    Ok(AppContext::new(gitlab, config))
}

// =============================================================================
// Provider CI API
// =============================================================================

/// Bring the CI settings of a provider to their desired state.
pub fn configure(
    options: &GlobalOptions,
    slug: &str,
    configure_options: &ConfigureOptions,
) -> Result<ConfigureOutcome, AppError> {
    let slug = ProviderSlug::new(slug)?;
    let ctx = create_context(options)?;
    configure::execute(&ctx, &slug, configure_options)
}

/// Fire a job of a provider.
///
/// The job kind is validated before any configuration or network access.
pub fn trigger(
    options: &GlobalOptions,
    job_kind: &str,
    slug: &str,
    git_ref: Option<&str>,
) -> Result<JobRun, AppError> {
    let kind: JobKind = job_kind.parse()?;
    let slug = ProviderSlug::new(slug)?;
    let ctx = create_context(options)?;
    trigger::execute(&ctx, &slug, kind.as_str(), git_ref)
}

/// List the inspection URLs of a provider, opening them in the browser when `open` is set.
pub fn open_urls(
    options: &GlobalOptions,
    slug: &str,
    open: bool,
) -> Result<Vec<(&'static str, String)>, AppError> {
    let slug = ProviderSlug::new(slug)?;
    let config = load_config(options)?;
    let browser = open.then(CommandBrowser::system);
    open_urls::execute(&config, &slug, browser.as_ref())
}

/// Ensure the data repositories of a provider exist.
pub fn create_repositories(
    options: &GlobalOptions,
    slug: &str,
) -> Result<Vec<RepositoryStatus>, AppError> {
    let slug = ProviderSlug::new(slug)?;
    let ctx = create_context(options)?;
    create_repositories::execute(&ctx, &slug)
}

/// Copy the CI deploy key of a provider onto its development data repositories.
pub fn configure_dev_data(
    options: &GlobalOptions,
    slug: &str,
) -> Result<Vec<SettingChange>, AppError> {
    let slug = ProviderSlug::new(slug)?;
    let ctx = create_context(options)?;
    configure_dev_data::execute(&ctx, &slug)
}

// =============================================================================
// Maintenance API
// =============================================================================

/// Delete every indexed document of a provider from the search index.
pub fn delete_provider(options: &GlobalOptions, slug: &str) -> Result<(), AppError> {
    let slug = ProviderSlug::new(slug)?;
    let config = load_config(options)?;
    let index = HttpSolrIndex::new(&config.search)?;
    delete_provider::execute(&index, &slug)
}

/// Slugs of the configured providers.
pub fn ls_providers(
    options: &GlobalOptions,
    only_scheduled: bool,
) -> Result<Vec<ProviderSlug>, AppError> {
    let ctx = create_context(options)?;
    ls_providers::execute(&ctx, only_scheduled)
}

/// Cancel running and pending pipelines of a project.
pub fn cancel_pipelines(options: &GlobalOptions, project: &str) -> Result<Vec<Pipeline>, AppError> {
    let project = ProjectPath::new(project)?;
    let ctx = create_context(options)?;
    cancel_pipelines::execute(&ctx, &project)
}

/// Render the reference `.gitlab-ci.yml` of a fetcher.
pub fn generate_ci_yml(options: &GlobalOptions, slug: &str) -> Result<String, AppError> {
    let slug = ProviderSlug::new(slug)?;
    let config = load_config(options)?;
    generate_ci_yml::execute(&config, &slug)
}

/// Render the schedule and job overview of the fetchers (all of them when `fetchers` is empty).
pub fn dashboard(
    options: &GlobalOptions,
    fetchers: &[String],
    format: &str,
) -> Result<String, AppError> {
    let format: DashboardFormat = format.parse()?;
    let only =
        fetchers.iter().map(|slug| ProviderSlug::new(slug)).collect::<Result<Vec<_>, _>>()?;
    let ctx = create_context(options)?;
    let dashboard = dashboard::execute(&ctx, &only)?;
    match format {
        DashboardFormat::Markdown => render_markdown(&dashboard),
        DashboardFormat::Json => serde_json::to_string_pretty(&dashboard)
            .map(|json| json + "\n")
            .map_err(|e| AppError::config_error(format!("Failed to serialize dashboard: {}", e))),
    }
}
