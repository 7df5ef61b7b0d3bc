//! Give a provider's CI jobs write access to the development data repositories.

use crate::app::AppContext;
use crate::domain::{
    AppError, DeployKey, NewDeployKey, Project, Provider, ProviderSlug, SettingAction,
    SettingChange, SettingKind,
};
use crate::ports::GitLabApi;

/// Copy the `<slug> CI jobs` deploy key of the production source data project onto the
/// development source data and JSON data projects, with push access on both.
///
/// Every project is resolved before the first write. Running it twice makes no change.
pub fn execute<G: GitLabApi>(
    ctx: &AppContext<G>,
    slug: &ProviderSlug,
) -> Result<Vec<SettingChange>, AppError> {
    let gitlab = ctx.gitlab();
    let user = gitlab.current_user()?;
    tracing::debug!("authenticated as {}", user.username);

    let provider = Provider::new(slug.clone(), &ctx.config().namespaces)?;
    let source_data = gitlab.project(provider.source_data())?;
    let dev_source_data = gitlab.project(provider.dev_source_data())?;
    let dev_json_data = gitlab.project(provider.dev_json_data())?;

    let title = provider.deploy_key_title();
    let public_key = gitlab
        .list_deploy_keys(source_data.id)?
        .into_iter()
        .find(|key| key.title == title)
        .ok_or_else(|| {
            AppError::not_found(format!(
                "deploy key '{}' on project '{}' (run `dbnomics-ci configure {}` first)",
                title, source_data.path_with_namespace, slug
            ))
        })?;

    let mut changes = Vec::new();
    let key = ensure_writable_key(gitlab, &dev_source_data, &public_key, &mut changes)?;
    ensure_key_enabled(gitlab, &dev_json_data, &key, &mut changes)?;
    Ok(changes)
}

fn record(changes: &mut Vec<SettingChange>, action: SettingAction, title: &str, project: &Project) {
    let change =
        SettingChange::new(action, SettingKind::DeployKey, title, &project.path_with_namespace);
    tracing::info!("{}", change);
    changes.push(change);
}

/// Keep a pushable copy of `public_key` on `project`, replacing stale keys with the same title.
fn ensure_writable_key<G: GitLabApi>(
    gitlab: &G,
    project: &Project,
    public_key: &DeployKey,
    changes: &mut Vec<SettingChange>,
) -> Result<DeployKey, AppError> {
    let title = public_key.title.as_str();
    let mut reusable = None;
    for key in gitlab.list_deploy_keys(project.id)? {
        if key.title != title {
            continue;
        }
        if reusable.is_none() && key.key.trim() == public_key.key.trim() && key.can_push {
            reusable = Some(key);
        } else {
            gitlab.delete_deploy_key(project.id, key.id)?;
            record(changes, SettingAction::Deleted, title, project);
        }
    }

    if let Some(key) = reusable {
        return Ok(key);
    }
    let request =
        NewDeployKey { title: title.to_string(), key: public_key.key.clone(), can_push: true };
    let key = gitlab.create_deploy_key(project.id, &request)?;
    record(changes, SettingAction::Created, title, project);
    Ok(key)
}

/// Enable `key` on `project` with push access.
fn ensure_key_enabled<G: GitLabApi>(
    gitlab: &G,
    project: &Project,
    key: &DeployKey,
    changes: &mut Vec<SettingChange>,
) -> Result<(), AppError> {
    let existing = gitlab.list_deploy_keys(project.id)?.into_iter().find(|k| k.id == key.id);
    let can_push = match existing {
        Some(existing) => existing.can_push,
        None => {
            gitlab.enable_deploy_key(project.id, key.id)?;
            record(changes, SettingAction::Enabled, &key.title, project);
            false
        }
    };
    if !can_push {
        gitlab.update_deploy_key(project.id, key.id, true)?;
        record(changes, SettingAction::Updated, &key.title, project);
    }
    Ok(())
}
