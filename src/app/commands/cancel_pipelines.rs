use crate::app::AppContext;
use crate::domain::{AppError, Pipeline, ProjectPath};
use crate::ports::GitLabApi;

const CANCELLABLE_STATUSES: [&str; 2] = ["running", "pending"];

/// Cancel every running or pending pipeline of a project.
pub fn execute<G: GitLabApi>(
    ctx: &AppContext<G>,
    project: &ProjectPath,
) -> Result<Vec<Pipeline>, AppError> {
    let gitlab = ctx.gitlab();
    let project = gitlab.project(project)?;

    let mut cancelled = Vec::new();
    for status in CANCELLABLE_STATUSES {
        for pipeline in gitlab.list_pipelines(project.id, status)? {
            tracing::info!("cancelling {} pipeline #{}", status, pipeline.id);
            cancelled.push(gitlab.cancel_pipeline(project.id, pipeline.id)?);
        }
    }
    Ok(cancelled)
}
