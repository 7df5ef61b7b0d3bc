//! List providers from the fetcher projects.

use crate::app::AppContext;
use crate::domain::{AppError, Project, ProviderSlug, GENERATED_OBJECTS_TAG};
use crate::ports::GitLabApi;

const FETCHER_SUFFIX: &str = "-fetcher";

/// Slugs of all fetcher projects, by project name, skipping dummy providers.
///
/// With `only_scheduled`, keep providers having an active generated download schedule.
pub fn execute<G: GitLabApi>(
    ctx: &AppContext<G>,
    only_scheduled: bool,
) -> Result<Vec<ProviderSlug>, AppError> {
    let gitlab = ctx.gitlab();

    let mut slugs = Vec::new();
    for (slug, project) in fetcher_projects(ctx)? {
        if only_scheduled && !has_active_schedule(gitlab, &project, &slug)? {
            continue;
        }
        slugs.push(slug);
    }
    Ok(slugs)
}

/// Fetcher projects by name with their provider slug, skipping dummy providers.
pub(crate) fn fetcher_projects<G: GitLabApi>(
    ctx: &AppContext<G>,
) -> Result<Vec<(ProviderSlug, Project)>, AppError> {
    let projects = ctx.gitlab().list_group_projects(&ctx.config().namespaces.fetchers)?;
    Ok(projects
        .into_iter()
        .filter_map(|project| provider_slug(&project).map(|slug| (slug, project)))
        .collect())
}

fn provider_slug(project: &Project) -> Option<ProviderSlug> {
    let name = project.name.strip_suffix(FETCHER_SUFFIX)?;
    if name.starts_with(ProviderSlug::DUMMY) {
        return None;
    }
    match ProviderSlug::new(name) {
        Ok(slug) => Some(slug),
        Err(e) => {
            tracing::warn!("skipping {}: {}", project.path_with_namespace, e);
            None
        }
    }
}

fn has_active_schedule<G: GitLabApi>(
    gitlab: &G,
    project: &Project,
    slug: &ProviderSlug,
) -> Result<bool, AppError> {
    let description = format!("{} {}", slug, GENERATED_OBJECTS_TAG);
    Ok(gitlab
        .list_pipeline_schedules(project.id)?
        .iter()
        .any(|s| s.active && s.description == description))
}
