//! Reconciled CI settings and job runs reported to the operator.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::remote::redact_token;
use crate::domain::{DeployKey, JobKind, PipelineSchedule, SSH_PRIVATE_KEY_VARIABLE, Trigger, Webhook};

/// What happened to a remote setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingAction {
    Created,
    Updated,
    Deleted,
    Enabled,
}

impl SettingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingAction::Created => "created",
            SettingAction::Updated => "updated",
            SettingAction::Deleted => "deleted",
            SettingAction::Enabled => "enabled",
        }
    }
}

/// Kind of remote setting touched by the configurator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Variable,
    Trigger,
    Webhook,
    DeployKey,
    PipelineSchedule,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKind::Variable => "variable",
            SettingKind::Trigger => "trigger",
            SettingKind::Webhook => "webhook",
            SettingKind::DeployKey => "deploy key",
            SettingKind::PipelineSchedule => "pipeline schedule",
        }
    }
}

/// One write applied to a remote project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    pub action: SettingAction,
    pub kind: SettingKind,
    /// Human label of the setting (variable key, trigger description, redacted hook URL...).
    pub label: String,
    /// Project path the setting belongs to.
    pub project: String,
}

impl SettingChange {
    pub fn new(
        action: SettingAction,
        kind: SettingKind,
        label: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self { action, kind, label: label.into(), project: project.into() }
    }
}

impl fmt::Display for SettingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} '{}' on {}",
            self.action.as_str(),
            self.kind.as_str(),
            self.label,
            self.project
        )
    }
}

/// Remote CI settings of a provider after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub fetcher_project: String,
    pub variables: BTreeMap<String, String>,
    pub trigger: Option<Trigger>,
    pub source_data_project: String,
    pub source_data_hooks: Vec<Webhook>,
    pub json_data_project: String,
    pub json_data_hooks: Vec<Webhook>,
    pub deploy_key: Option<DeployKey>,
    pub schedule: Option<PipelineSchedule>,
}

impl fmt::Display for SettingsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.fetcher_project)?;
        writeln!(f, "  variables:")?;
        for (key, value) in &self.variables {
            if key == SSH_PRIVATE_KEY_VARIABLE {
                writeln!(f, "    {} = [REDACTED, {} bytes]", key, value.len())?;
            } else {
                writeln!(f, "    {} = {}", key, value)?;
            }
        }
        match &self.trigger {
            Some(trigger) => writeln!(f, "  trigger: #{} '{}'", trigger.id, trigger.description)?,
            None => writeln!(f, "  trigger: none")?,
        }
        match &self.schedule {
            Some(schedule) => writeln!(
                f,
                "  schedule: '{}' cron '{}' on {}{}",
                schedule.description,
                schedule.cron,
                schedule.git_ref,
                if schedule.active { "" } else { " (inactive)" }
            )?,
            None => writeln!(f, "  schedule: none")?,
        }
        for (project, hooks) in [
            (&self.source_data_project, &self.source_data_hooks),
            (&self.json_data_project, &self.json_data_hooks),
        ] {
            writeln!(f, "{}", project)?;
            if hooks.is_empty() {
                writeln!(f, "  webhooks: none")?;
            }
            for hook in hooks {
                writeln!(
                    f,
                    "  webhook #{}: {}{}",
                    hook.id,
                    redact_token(&hook.url),
                    if hook.is_enabled() { "" } else { " (disabled)" }
                )?;
            }
        }
        if let Some(key) = &self.deploy_key {
            writeln!(f, "deploy key: #{} '{}' (push: {})", key.id, key.title, key.can_push)?;
        }
        Ok(())
    }
}

/// A fired pipeline, returned without waiting for completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRun {
    pub kind: JobKind,
    pub project: String,
    pub pipeline_id: u64,
    pub status: String,
    /// Status page of the pipeline.
    pub web_url: String,
    /// Job list of the project.
    pub jobs_url: String,
}
