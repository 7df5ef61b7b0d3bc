//! GitLab REST API port definition.

use crate::domain::{
    AppError, CiVariable, DeployKey, Job, Namespace, NewDeployKey, NewPipelineSchedule, NewProject,
    Pipeline, PipelineSchedule, PipelineTriggerRequest, Project, ProjectPath, Trigger, User,
    Webhook,
};

/// Port for the GitLab operations used by the CI commands.
///
/// Project ids returned by [`GitLabApi::project`] address every other call.
pub trait GitLabApi {
    /// User owning the token. Fails with `Authorization` when the token is rejected.
    fn current_user(&self) -> Result<User, AppError>;

    /// Resolve a project by path or id. Fails with `NotFound` when it does not exist.
    fn project(&self, path: &ProjectPath) -> Result<Project, AppError>;

    /// Resolve a project, mapping `NotFound` to `None`.
    fn find_project(&self, path: &ProjectPath) -> Result<Option<Project>, AppError> {
        match self.project(path) {
            Ok(project) => Ok(Some(project)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create_project(&self, request: &NewProject) -> Result<Project, AppError>;

    /// Projects of a group, sorted by name.
    fn list_group_projects(&self, group: &str) -> Result<Vec<Project>, AppError>;

    /// Namespace whose full path equals `full_path`.
    fn find_namespace(&self, full_path: &str) -> Result<Option<Namespace>, AppError>;

    fn list_variables(&self, project_id: u64) -> Result<Vec<CiVariable>, AppError>;
    fn create_variable(&self, project_id: u64, key: &str, value: &str) -> Result<(), AppError>;
    fn update_variable(&self, project_id: u64, key: &str, value: &str) -> Result<(), AppError>;
    fn delete_variable(&self, project_id: u64, key: &str) -> Result<(), AppError>;

    fn list_triggers(&self, project_id: u64) -> Result<Vec<Trigger>, AppError>;
    fn create_trigger(&self, project_id: u64, description: &str) -> Result<Trigger, AppError>;
    fn delete_trigger(&self, project_id: u64, trigger_id: u64) -> Result<(), AppError>;

    fn list_hooks(&self, project_id: u64) -> Result<Vec<Webhook>, AppError>;
    /// Create a push-event webhook.
    fn create_hook(&self, project_id: u64, url: &str) -> Result<Webhook, AppError>;
    fn delete_hook(&self, project_id: u64, hook_id: u64) -> Result<(), AppError>;

    fn list_deploy_keys(&self, project_id: u64) -> Result<Vec<DeployKey>, AppError>;
    fn create_deploy_key(
        &self,
        project_id: u64,
        request: &NewDeployKey,
    ) -> Result<DeployKey, AppError>;
    /// Enable a deploy key of another project on `project_id`.
    fn enable_deploy_key(&self, project_id: u64, key_id: u64) -> Result<DeployKey, AppError>;
    /// Grant or revoke write access of a deploy key enabled on `project_id`.
    fn update_deploy_key(
        &self,
        project_id: u64,
        key_id: u64,
        can_push: bool,
    ) -> Result<DeployKey, AppError>;
    fn delete_deploy_key(&self, project_id: u64, key_id: u64) -> Result<(), AppError>;

    fn list_pipeline_schedules(&self, project_id: u64) -> Result<Vec<PipelineSchedule>, AppError>;
    fn create_pipeline_schedule(
        &self,
        project_id: u64,
        request: &NewPipelineSchedule,
    ) -> Result<PipelineSchedule, AppError>;
    fn create_pipeline_schedule_variable(
        &self,
        project_id: u64,
        schedule_id: u64,
        key: &str,
        value: &str,
    ) -> Result<(), AppError>;
    fn delete_pipeline_schedule(&self, project_id: u64, schedule_id: u64) -> Result<(), AppError>;

    /// Fire a pipeline with a trigger token.
    fn trigger_pipeline(
        &self,
        project_id: u64,
        request: &PipelineTriggerRequest,
    ) -> Result<Pipeline, AppError>;

    /// Pipelines of a project having `status` (`running`, `pending`...).
    fn list_pipelines(&self, project_id: u64, status: &str) -> Result<Vec<Pipeline>, AppError>;
    fn cancel_pipeline(&self, project_id: u64, pipeline_id: u64) -> Result<Pipeline, AppError>;

    /// The `limit` latest jobs of a project, most recent first.
    fn list_jobs(&self, project_id: u64, limit: usize) -> Result<Vec<Job>, AppError>;
    /// Raw log of a job.
    fn job_trace(&self, project_id: u64, job_id: u64) -> Result<String, AppError>;
}
