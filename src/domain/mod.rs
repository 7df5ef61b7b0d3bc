pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod identifiers;
pub mod job_kind;
pub mod provider;
pub mod remote;
pub mod schedule_time;
pub mod settings;
pub mod urls;

pub use config::{CiConfig, GitLabConfig, NamespaceConfig, ScheduleConfig, SearchConfig};
pub use credentials::{Credentials, PRIVATE_TOKEN_ENV};
pub use dashboard::{Dashboard, ProviderDashboard, ScheduleStatus};
pub use error::AppError;
pub use identifiers::{ProjectPath, ProviderSlug};
pub use job_kind::JobKind;
pub use provider::{
    GENERATED_OBJECTS_TAG, JOB_VARIABLE, PROVIDER_SLUG_VARIABLE, Provider, SSH_PRIVATE_KEY_VARIABLE,
    pipeline_trigger_url, trigger_endpoint_marker,
};
pub use remote::{
    CiVariable, DeployKey, Job, Namespace, NewDeployKey, NewPipelineSchedule, NewProject,
    Pipeline, PipelineSchedule, PipelineTriggerRequest, Project, Trigger, User, Visibility, Webhook,
};
pub use schedule_time::ScheduleTime;
pub use settings::{JobRun, SettingAction, SettingChange, SettingKind, SettingsSnapshot};
