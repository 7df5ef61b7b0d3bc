//! Create the data repositories of a provider.

use crate::app::AppContext;
use crate::domain::{AppError, NewProject, Project, ProjectPath, Provider, ProviderSlug, Visibility};
use crate::ports::GitLabApi;

/// Whether a data repository was created or already existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryStatus {
    Created(Project),
    Existing(Project),
}

impl RepositoryStatus {
    pub fn project(&self) -> &Project {
        match self {
            RepositoryStatus::Created(project) | RepositoryStatus::Existing(project) => project,
        }
    }
}

/// Ensure the source data and JSON data projects of a provider exist as public projects.
pub fn execute<G: GitLabApi>(
    ctx: &AppContext<G>,
    slug: &ProviderSlug,
) -> Result<Vec<RepositoryStatus>, AppError> {
    let gitlab = ctx.gitlab();
    let provider = Provider::new(slug.clone(), &ctx.config().namespaces)?;

    let source_data_description = format!("Source data as downloaded from provider {}", slug);
    let json_data_description =
        format!("JSON data as converted from source data of provider {}", slug);

    let mut statuses = Vec::new();
    for (path, description) in [
        (provider.source_data(), source_data_description),
        (provider.json_data(), json_data_description),
    ] {
        statuses.push(ensure_repository(gitlab, path, description)?);
    }
    Ok(statuses)
}

fn ensure_repository<G: GitLabApi>(
    gitlab: &G,
    path: &ProjectPath,
    description: String,
) -> Result<RepositoryStatus, AppError> {
    if let Some(project) = gitlab.find_project(path)? {
        tracing::info!("repository exists: {}", project.web_url);
        return Ok(RepositoryStatus::Existing(project));
    }

    let namespace = gitlab
        .find_namespace(path.namespace())?
        .ok_or_else(|| AppError::not_found(format!("namespace '{}'", path.namespace())))?;
    let request = NewProject {
        name: path.name().to_string(),
        namespace_id: namespace.id,
        description,
        visibility: Visibility::Public,
    };
    let project = gitlab.create_project(&request)?;
    tracing::info!("repository created: {}", project.web_url);
    Ok(RepositoryStatus::Created(project))
}
