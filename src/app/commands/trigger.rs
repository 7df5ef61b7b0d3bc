//! Fire a provider job through a pipeline trigger.

use crate::app::AppContext;
use crate::domain::{
    AppError, JobKind, JobRun, PipelineTriggerRequest, Project, Provider, ProviderSlug, Trigger,
};
use crate::ports::GitLabApi;

/// Fire `job_kind` for a provider and return the created pipeline without waiting for it.
///
/// `download` and `convert` run in the fetcher project on `git_ref` (default from
/// configuration); `index` always runs in the importer project on the importer ref.
pub fn execute<G: GitLabApi>(
    ctx: &AppContext<G>,
    slug: &ProviderSlug,
    job_kind: &str,
    git_ref: Option<&str>,
) -> Result<JobRun, AppError> {
    let kind: JobKind = job_kind.parse()?;
    let config = ctx.config();
    let provider = Provider::new(slug.clone(), &config.namespaces)?;

    let (project_path, git_ref) = if kind.runs_in_fetcher() {
        (provider.fetcher().clone(), git_ref.unwrap_or(&config.gitlab.default_ref))
    } else {
        if let Some(ignored) = git_ref {
            tracing::warn!(
                "--ref {} only applies to fetcher jobs; indexing on {}",
                ignored,
                config.gitlab.importer_ref
            );
        }
        (config.gitlab.importer_project()?, config.gitlab.importer_ref.as_str())
    };

    let gitlab = ctx.gitlab();
    let project = gitlab.project(&project_path)?;
    let trigger = select_trigger(gitlab.list_triggers(project.id)?, slug.as_str(), &project)?;

    let request = PipelineTriggerRequest {
        token: trigger.token,
        git_ref: git_ref.to_string(),
        variables: provider.job_variables(kind),
    };
    tracing::debug!("firing {} on {} ({:?})", kind, project.path_with_namespace, request);
    let pipeline = gitlab.trigger_pipeline(project.id, &request)?;

    let web_url = pipeline
        .web_url
        .clone()
        .unwrap_or_else(|| format!("{}/-/pipelines/{}", project.web_url, pipeline.id));
    tracing::info!("{} job for {} started: {}", kind, slug, web_url);

    Ok(JobRun {
        kind,
        project: project.path_with_namespace.clone(),
        pipeline_id: pipeline.id,
        status: pipeline.status,
        web_url,
        jobs_url: format!("{}/-/jobs", project.web_url),
    })
}

/// Pick the trigger described by `description`, or the only trigger of the project.
pub(crate) fn select_trigger(
    triggers: Vec<Trigger>,
    description: &str,
    project: &Project,
) -> Result<Trigger, AppError> {
    let count = triggers.len();
    if count == 0 {
        return Err(AppError::not_found(format!(
            "pipeline trigger in project '{}' (run `dbnomics-ci configure` first)",
            project.path_with_namespace
        )));
    }

    let mut triggers = triggers;
    if let Some(index) = triggers.iter().position(|t| t.description == description) {
        return Ok(triggers.swap_remove(index));
    }
    if count == 1 {
        return Ok(triggers.remove(0));
    }
    Err(AppError::AmbiguousTrigger {
        project: project.path_with_namespace.clone(),
        count,
        description: description.to_string(),
        settings_url: format!("{}/-/settings/ci_cd", project.web_url),
    })
}
