//! Records owned by the remote GitLab instance, as read and written through its REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitLab project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    pub web_url: String,
}

/// A project-level CI/CD variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CiVariable {
    pub key: String,
    pub value: String,
}

/// A pipeline trigger. The token lets callers fire pipelines without full API privileges.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Trigger {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    pub token: String,
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// A project webhook. Push events are the repository events firing the callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub push_events: bool,
}

impl Webhook {
    /// Whether the hook fires on pushes.
    pub fn is_enabled(&self) -> bool {
        self.push_events
    }
}

/// An SSH deploy key attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeployKey {
    pub id: u64,
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub can_push: bool,
}

/// A cron-driven pipeline schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSchedule {
    pub id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub cron: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub next_run_at: Option<DateTime<Utc>>,
}

/// A pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub status: String,
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A CI job of a pipeline, most recent first when listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub stage: String,
    pub status: String,
    #[serde(default)]
    pub web_url: String,
    /// Run time in seconds, absent until the job starts.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A user or group namespace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Namespace {
    pub id: u64,
    pub name: String,
    pub full_path: String,
}

/// The user owning the private token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

/// Deploy key creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeployKey {
    pub title: String,
    pub key: String,
    pub can_push: bool,
}

/// Pipeline schedule creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPipelineSchedule {
    pub description: String,
    pub git_ref: String,
    pub cron: String,
    pub active: bool,
}

/// Project creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub namespace_id: u64,
    pub description: String,
    pub visibility: Visibility,
}

/// Project visibility level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Internal,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::Public => "public",
        }
    }
}

/// Pipeline trigger request fired with a trigger token.
#[derive(Clone, PartialEq, Eq)]
pub struct PipelineTriggerRequest {
    pub token: String,
    pub git_ref: String,
    pub variables: Vec<(String, String)>,
}

impl std::fmt::Debug for PipelineTriggerRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineTriggerRequest")
            .field("token", &"[REDACTED]")
            .field("git_ref", &self.git_ref)
            .field("variables", &self.variables)
            .finish()
    }
}

/// Mask the `token=` query parameter of a trigger URL for display.
pub fn redact_token(url: &str) -> String {
    let Some(start) = url.find("token=") else {
        return url.to_string();
    };
    let value_start = start + "token=".len();
    let value_end = url[value_start..].find('&').map(|i| value_start + i).unwrap_or(url.len());
    format!("{}[REDACTED]{}", &url[..value_start], &url[value_end..])
}
