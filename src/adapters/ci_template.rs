//! Reference `.gitlab-ci.yml` rendering for fetcher projects.

use minijinja::{Environment, UndefinedBehavior, context};

use crate::domain::{AppError, GitLabConfig, Provider};

const TEMPLATE_NAME: &str = "gitlab-ci.yml";
static GITLAB_CI_TEMPLATE: &str = include_str!("../assets/ci/gitlab-ci.yml.j2");

/// Render the reference CI configuration of a provider's fetcher.
pub fn render_gitlab_ci(provider: &Provider, gitlab: &GitLabConfig) -> Result<String, AppError> {
    let context = context! {
        provider_slug => provider.slug().as_str(),
        image => gitlab.ci_image.as_str(),
        git_host => gitlab.host(),
        source_data_repo => gitlab.ssh_clone_url(provider.source_data()),
        json_data_repo => gitlab.ssh_clone_url(provider.json_data()),
    };

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template(TEMPLATE_NAME, GITLAB_CI_TEMPLATE).map_err(|err| {
        AppError::config_error(format!("Failed to load CI template: {}", err))
    })?;
    env.get_template(TEMPLATE_NAME)
        .map_err(|err| AppError::config_error(format!("Failed to access CI template: {}", err)))?
        .render(context)
        .map_err(|err| AppError::config_error(format!("Failed to render CI template: {}", err)))
}
