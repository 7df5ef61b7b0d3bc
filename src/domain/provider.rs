//! Provider project layout and desired CI settings.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::domain::{AppError, JobKind, NamespaceConfig, ProjectPath, ProviderSlug};

/// Suffix appended to the slug to describe generated schedules and deploy keys.
pub const GENERATED_OBJECTS_TAG: &str = "CI jobs";

/// Variable holding the provider slug in the fetcher project.
pub const PROVIDER_SLUG_VARIABLE: &str = "PROVIDER_SLUG";
/// Variable holding the private deploy key used by fetcher jobs to push data.
pub const SSH_PRIVATE_KEY_VARIABLE: &str = "SSH_PRIVATE_KEY";
/// Pipeline variable selecting the fetcher job to run.
pub const JOB_VARIABLE: &str = "JOB";

/// A provider and the GitLab projects it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    slug: ProviderSlug,
    fetcher: ProjectPath,
    source_data: ProjectPath,
    json_data: ProjectPath,
    dev_source_data: ProjectPath,
    dev_json_data: ProjectPath,
}

impl Provider {
    pub fn new(slug: ProviderSlug, namespaces: &NamespaceConfig) -> Result<Self, AppError> {
        let fetcher = ProjectPath::join(&namespaces.fetchers, &format!("{}-fetcher", slug))?;
        let source_data =
            ProjectPath::join(&namespaces.source_data, &format!("{}-source-data", slug))?;
        let json_data = ProjectPath::join(&namespaces.json_data, &format!("{}-json-data", slug))?;
        let dev_source_data = ProjectPath::join(&namespaces.dev_data, source_data.name())?;
        let dev_json_data = ProjectPath::join(&namespaces.dev_data, json_data.name())?;
        Ok(Self { slug, fetcher, source_data, json_data, dev_source_data, dev_json_data })
    }

    pub fn slug(&self) -> &ProviderSlug {
        &self.slug
    }

    /// Project running download and convert jobs.
    pub fn fetcher(&self) -> &ProjectPath {
        &self.fetcher
    }

    /// Project storing data as downloaded from the provider.
    pub fn source_data(&self) -> &ProjectPath {
        &self.source_data
    }

    /// Project storing data converted to JSON.
    pub fn json_data(&self) -> &ProjectPath {
        &self.json_data
    }

    /// Development copy of the source data project.
    pub fn dev_source_data(&self) -> &ProjectPath {
        &self.dev_source_data
    }

    /// Development copy of the JSON data project.
    pub fn dev_json_data(&self) -> &ProjectPath {
        &self.dev_json_data
    }

    /// Description of the fetcher pipeline trigger owned by this provider.
    pub fn trigger_description(&self) -> &str {
        self.slug.as_str()
    }

    /// Description of the generated download schedule.
    pub fn schedule_description(&self) -> String {
        format!("{} {}", self.slug, GENERATED_OBJECTS_TAG)
    }

    /// Title of the deploy key shared by the data projects.
    pub fn deploy_key_title(&self) -> String {
        format!("{} {}", self.slug, GENERATED_OBJECTS_TAG)
    }

    /// Whether a daily download schedule should exist for this provider.
    pub fn is_schedulable(&self) -> bool {
        !self.slug.is_dummy()
    }

    /// Variables the fetcher project must carry.
    pub fn desired_variables(&self, ssh_private_key: Option<&str>) -> BTreeMap<String, String> {
        let mut variables = BTreeMap::new();
        variables.insert(PROVIDER_SLUG_VARIABLE.to_string(), self.slug.to_string());
        if let Some(key) = ssh_private_key {
            variables.insert(SSH_PRIVATE_KEY_VARIABLE.to_string(), key.to_string());
        }
        variables
    }

    /// Pipeline variables sent when firing `kind` for this provider.
    pub fn job_variables(&self, kind: JobKind) -> Vec<(String, String)> {
        if kind.runs_in_fetcher() {
            vec![(JOB_VARIABLE.to_string(), kind.as_str().to_string())]
        } else {
            vec![(PROVIDER_SLUG_VARIABLE.to_string(), self.slug.to_string())]
        }
    }
}

/// Build a GitLab pipeline trigger endpoint URL, as used by webhooks.
///
/// `<api>/projects/<id>/ref/<ref>/trigger/pipeline?token=<token>&variables[K]=V`
///
/// The ref, token and variable values are form-encoded, so `feature/x` becomes `feature%2Fx`.
pub fn pipeline_trigger_url(
    api_base: &str,
    project_id: u64,
    git_ref: &str,
    token: &str,
    variables: &[(String, String)],
) -> String {
    let mut url = format!(
        "{}/projects/{}/ref/{}/trigger/pipeline?token={}",
        api_base,
        project_id,
        form_encode(git_ref),
        form_encode(token)
    );
    for (key, value) in variables {
        url.push_str(&format!("&variables[{}]={}", key, form_encode(value)));
    }
    url
}

fn form_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Marker identifying URLs that fire pipelines of `project_id`.
pub fn trigger_endpoint_marker(project_id: u64) -> String {
    format!("/projects/{}/", project_id)
}
