use crate::adapters::ci_template::render_gitlab_ci;
use crate::domain::{AppError, CiConfig, Provider, ProviderSlug};

/// Render the reference `.gitlab-ci.yml` of a fetcher project.
pub fn execute(config: &CiConfig, slug: &ProviderSlug) -> Result<String, AppError> {
    let provider = Provider::new(slug.clone(), &config.namespaces)?;
    render_gitlab_ci(&provider, &config.gitlab)
}
