//! Tool configuration domain models.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{AppError, ProjectPath, ScheduleTime};

/// Configuration loaded from `dbnomics-ci.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CiConfig {
    /// GitLab instance configuration.
    #[serde(default)]
    pub gitlab: GitLabConfig,
    /// Namespaces holding the provider projects.
    #[serde(default)]
    pub namespaces: NamespaceConfig,
    /// Download pipeline schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Search index used by `delete-provider`.
    #[serde(default)]
    pub search: SearchConfig,
}

impl CiConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.gitlab.validate()?;
        self.namespaces.validate()?;
        self.schedule.validate()?;
        self.search.validate()?;
        Ok(())
    }
}

/// GitLab instance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitLabConfig {
    /// Base URL of the GitLab instance (without `/api/v4`).
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Path (or numeric id) of the importer project that indexes JSON data.
    #[serde(default = "default_importer_project")]
    pub importer_project: String,
    /// Ref on which importer pipelines run.
    #[serde(default = "default_ref")]
    pub importer_ref: String,
    /// Ref on which fetcher pipelines run unless overridden.
    #[serde(default = "default_ref")]
    pub default_ref: String,
    /// Container image referenced by generated fetcher CI files.
    #[serde(default = "default_ci_image")]
    pub ci_image: String,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            importer_project: default_importer_project(),
            importer_ref: default_ref(),
            default_ref: default_ref(),
            ci_image: default_ci_image(),
        }
    }
}

impl GitLabConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("gitlab.timeout_secs must be greater than 0"));
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(AppError::config_error(format!(
                "gitlab.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        ProjectPath::new(&self.importer_project)?;
        for (field, git_ref) in
            [("gitlab.importer_ref", &self.importer_ref), ("gitlab.default_ref", &self.default_ref)]
        {
            if git_ref.is_empty() || git_ref.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(AppError::config_error(format!(
                    "{} must be a non-empty git ref without whitespace, got '{}'",
                    field, git_ref
                )));
            }
        }
        if self.ci_image.trim().is_empty() {
            return Err(AppError::config_error("gitlab.ci_image must not be empty"));
        }
        Ok(())
    }

    /// Web base URL without trailing slash (`https://git.nomics.world`).
    pub fn web_base(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    /// REST API base URL (`https://git.nomics.world/api/v4`).
    pub fn api_base(&self) -> String {
        format!("{}/api/v4", self.web_base())
    }

    /// Host name used in SSH clone URLs.
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or("localhost")
    }

    /// SSH clone URL of a project (`git@host:group/project.git`).
    pub fn ssh_clone_url(&self, project: &ProjectPath) -> String {
        format!("git@{}:{}.git", self.host(), project)
    }

    /// Importer project reference.
    pub fn importer_project(&self) -> Result<ProjectPath, AppError> {
        ProjectPath::new(&self.importer_project)
    }
}

fn default_base_url() -> Url {
    Url::parse("https://git.nomics.world").expect("Default GitLab URL must be valid")
}

fn default_timeout() -> u64 {
    30
}

fn default_importer_project() -> String {
    "dbnomics/dbnomics-importer".to_string()
}

fn default_ref() -> String {
    "master".to_string()
}

fn default_ci_image() -> String {
    "registry.git.nomics.world/dbnomics/dbnomics-ci:latest".to_string()
}

/// Namespaces (groups) holding each kind of provider project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    #[serde(default = "default_fetchers_namespace")]
    pub fetchers: String,
    #[serde(default = "default_source_data_namespace")]
    pub source_data: String,
    #[serde(default = "default_json_data_namespace")]
    pub json_data: String,
    /// Sandbox namespace holding development copies of the data repositories.
    #[serde(default = "default_dev_data_namespace")]
    pub dev_data: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            fetchers: default_fetchers_namespace(),
            source_data: default_source_data_namespace(),
            json_data: default_json_data_namespace(),
            dev_data: default_dev_data_namespace(),
        }
    }
}

impl NamespaceConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("fetchers", &self.fetchers),
            ("source_data", &self.source_data),
            ("json_data", &self.json_data),
            ("dev_data", &self.dev_data),
        ] {
            if ProjectPath::new(value).is_err() {
                return Err(AppError::config_error(format!(
                    "namespaces.{} is not a valid namespace path: '{}'",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

fn default_fetchers_namespace() -> String {
    "dbnomics-fetchers".to_string()
}

fn default_source_data_namespace() -> String {
    "dbnomics-source-data".to_string()
}

fn default_json_data_namespace() -> String {
    "dbnomics-json-data".to_string()
}

fn default_dev_data_namespace() -> String {
    "dbnomics-data-dev".to_string()
}

/// Download pipeline schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Daily time (`HOUR:MINUTE`) of the download pipeline.
    #[serde(default = "default_schedule_time")]
    pub time: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { time: default_schedule_time() }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.time()?;
        Ok(())
    }

    pub fn time(&self) -> Result<ScheduleTime, AppError> {
        self.time.parse()
    }
}

fn default_schedule_time() -> String {
    ScheduleTime::default().to_string()
}

/// Solr search index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Solr core URL (`http://localhost:8983/solr/dbnomics`).
    #[serde(default = "default_solr_url")]
    pub solr_url: Url,
    /// Document field holding the provider identifier.
    #[serde(default = "default_provider_field")]
    pub provider_field: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            solr_url: default_solr_url(),
            provider_field: default_provider_field(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.provider_field.is_empty()
            || !self.provider_field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::config_error(format!(
                "search.provider_field must be a plain field name, got '{}'",
                self.provider_field
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("search.timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

fn default_solr_url() -> Url {
    Url::parse("http://localhost:8983/solr/dbnomics").expect("Default Solr URL must be valid")
}

fn default_provider_field() -> String {
    "provider_code".to_string()
}
