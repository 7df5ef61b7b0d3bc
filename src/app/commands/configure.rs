//! Bring the CI settings of a provider to their desired state.

use std::collections::BTreeMap;

use crate::app::AppContext;
use crate::app::commands::trigger::select_trigger;
use crate::domain::{
    AppError, JOB_VARIABLE, JobKind, NewDeployKey, NewPipelineSchedule, Project, Provider,
    ProviderSlug, ScheduleTime, SettingAction, SettingChange, SettingKind, SettingsSnapshot,
    Trigger, pipeline_trigger_url, trigger_endpoint_marker,
};
use crate::domain::remote::redact_token;
use crate::ports::GitLabApi;

/// Options of the `configure` command.
#[derive(Debug, Clone, Default)]
pub struct ConfigureOptions {
    /// Delete existing settings before writing the desired ones.
    pub purge: bool,
    /// Skip the daily download schedule.
    pub no_schedule: bool,
    /// Schedule time; the configured time applies when absent.
    pub schedule_time: Option<ScheduleTime>,
    /// Private key stored as `SSH_PRIVATE_KEY` on the fetcher project.
    pub ssh_private_key: Option<String>,
    /// Public key registered as deploy key on the data projects.
    pub deploy_public_key: Option<String>,
}

/// Result of a configuration run.
#[derive(Debug, Clone)]
pub struct ConfigureOutcome {
    /// Settings re-read after the writes.
    pub snapshot: SettingsSnapshot,
    /// Writes in the order they were applied.
    pub changes: Vec<SettingChange>,
}

/// Projects of a provider, resolved before any write.
struct ResolvedProjects {
    fetcher: Project,
    source_data: Project,
    json_data: Project,
    importer: Project,
}

/// Applies writes and keeps the ordered change log.
struct Reconciler<'a, G: GitLabApi> {
    gitlab: &'a G,
    changes: Vec<SettingChange>,
}

impl<'a, G: GitLabApi> Reconciler<'a, G> {
    fn record(&mut self, action: SettingAction, kind: SettingKind, label: &str, project: &Project) {
        let change = SettingChange::new(action, kind, label, &project.path_with_namespace);
        tracing::info!("{}", change);
        self.changes.push(change);
    }
}

pub fn execute<G: GitLabApi>(
    ctx: &AppContext<G>,
    slug: &ProviderSlug,
    options: &ConfigureOptions,
) -> Result<ConfigureOutcome, AppError> {
    let config = ctx.config();
    let gitlab = ctx.gitlab();

    let user = gitlab.current_user()?;
    tracing::debug!("authenticated as {}", user.username);

    let provider = Provider::new(slug.clone(), &config.namespaces)?;
    let schedule_time = match options.schedule_time {
        Some(time) => time,
        None => config.schedule.time()?,
    };
    let projects = ResolvedProjects {
        fetcher: gitlab.project(provider.fetcher())?,
        source_data: gitlab.project(provider.source_data())?,
        json_data: gitlab.project(provider.json_data())?,
        importer: gitlab.project(&config.gitlab.importer_project()?)?,
    };
    let importer_trigger =
        select_trigger(gitlab.list_triggers(projects.importer.id)?, slug.as_str(), &projects.importer)?;

    let mut reconciler = Reconciler { gitlab, changes: Vec::new() };

    if options.purge {
        tracing::info!("purging CI settings of {}", slug);
        purge(&mut reconciler, &provider, &projects)?;
    }

    let fetcher_trigger = ensure_trigger(&mut reconciler, &provider, &projects.fetcher)?;
    ensure_variables(
        &mut reconciler,
        &projects.fetcher,
        &provider.desired_variables(options.ssh_private_key.as_deref()),
    )?;

    let api_base = config.gitlab.api_base();
    let convert_url = pipeline_trigger_url(
        &api_base,
        projects.fetcher.id,
        &config.gitlab.default_ref,
        &fetcher_trigger.token,
        &provider.job_variables(JobKind::Convert),
    );
    ensure_hook(&mut reconciler, &projects.source_data, &convert_url, projects.fetcher.id)?;

    let index_url = pipeline_trigger_url(
        &api_base,
        projects.importer.id,
        &config.gitlab.importer_ref,
        &importer_trigger.token,
        &provider.job_variables(JobKind::Index),
    );
    ensure_hook(&mut reconciler, &projects.json_data, &index_url, projects.importer.id)?;

    if let Some(public_key) = options.deploy_public_key.as_deref() {
        ensure_deploy_key(&mut reconciler, &provider, &projects, public_key)?;
    }

    if !provider.is_schedulable() {
        tracing::debug!("no schedule for {}", slug);
    } else if options.no_schedule {
        tracing::debug!("schedule skipped on request");
    } else {
        ensure_schedule(
            &mut reconciler,
            &provider,
            &projects.fetcher,
            &config.gitlab.default_ref,
            schedule_time,
        )?;
    }

    let snapshot = snapshot(gitlab, &provider, &projects)?;
    Ok(ConfigureOutcome { snapshot, changes: reconciler.changes })
}

fn purge<G: GitLabApi>(
    reconciler: &mut Reconciler<'_, G>,
    provider: &Provider,
    projects: &ResolvedProjects,
) -> Result<(), AppError> {
    let gitlab = reconciler.gitlab;
    let fetcher = &projects.fetcher;

    for variable in gitlab.list_variables(fetcher.id)? {
        gitlab.delete_variable(fetcher.id, &variable.key)?;
        reconciler.record(SettingAction::Deleted, SettingKind::Variable, &variable.key, fetcher);
    }
    for trigger in gitlab.list_triggers(fetcher.id)? {
        gitlab.delete_trigger(fetcher.id, trigger.id)?;
        reconciler.record(
            SettingAction::Deleted,
            SettingKind::Trigger,
            &trigger.description,
            fetcher,
        );
    }
    for schedule in gitlab.list_pipeline_schedules(fetcher.id)? {
        gitlab.delete_pipeline_schedule(fetcher.id, schedule.id)?;
        reconciler.record(
            SettingAction::Deleted,
            SettingKind::PipelineSchedule,
            &schedule.description,
            fetcher,
        );
    }

    let key_title = provider.deploy_key_title();
    for project in [&projects.source_data, &projects.json_data] {
        for hook in gitlab.list_hooks(project.id)? {
            gitlab.delete_hook(project.id, hook.id)?;
            reconciler.record(
                SettingAction::Deleted,
                SettingKind::Webhook,
                &redact_token(&hook.url),
                project,
            );
        }
        for key in gitlab.list_deploy_keys(project.id)? {
            if key.title == key_title {
                gitlab.delete_deploy_key(project.id, key.id)?;
                reconciler.record(SettingAction::Deleted, SettingKind::DeployKey, &key.title, project);
            }
        }
    }
    Ok(())
}

/// Keep one trigger described by the slug, creating it when missing.
fn ensure_trigger<G: GitLabApi>(
    reconciler: &mut Reconciler<'_, G>,
    provider: &Provider,
    fetcher: &Project,
) -> Result<Trigger, AppError> {
    let gitlab = reconciler.gitlab;
    let description = provider.trigger_description();
    let mut matching =
        gitlab.list_triggers(fetcher.id)?.into_iter().filter(|t| t.description == description);

    let kept = match matching.next() {
        Some(trigger) => trigger,
        None => {
            let trigger = gitlab.create_trigger(fetcher.id, description)?;
            reconciler.record(SettingAction::Created, SettingKind::Trigger, description, fetcher);
            trigger
        }
    };
    for duplicate in matching {
        gitlab.delete_trigger(fetcher.id, duplicate.id)?;
        reconciler.record(SettingAction::Deleted, SettingKind::Trigger, description, fetcher);
    }
    Ok(kept)
}

fn ensure_variables<G: GitLabApi>(
    reconciler: &mut Reconciler<'_, G>,
    fetcher: &Project,
    desired: &BTreeMap<String, String>,
) -> Result<(), AppError> {
    let gitlab = reconciler.gitlab;
    let current: BTreeMap<String, String> = gitlab
        .list_variables(fetcher.id)?
        .into_iter()
        .map(|v| (v.key, v.value))
        .collect();

    for (key, value) in desired {
        match current.get(key) {
            None => {
                gitlab.create_variable(fetcher.id, key, value)?;
                reconciler.record(SettingAction::Created, SettingKind::Variable, key, fetcher);
            }
            Some(existing) if existing != value => {
                gitlab.update_variable(fetcher.id, key, value)?;
                reconciler.record(SettingAction::Updated, SettingKind::Variable, key, fetcher);
            }
            Some(_) => tracing::debug!("variable {} is up to date", key),
        }
    }
    Ok(())
}

/// Leave exactly one enabled hook with `url` among the hooks aimed at `target_project_id`.
///
/// The desired hook is created before stale ones are deleted.
fn ensure_hook<G: GitLabApi>(
    reconciler: &mut Reconciler<'_, G>,
    project: &Project,
    url: &str,
    target_project_id: u64,
) -> Result<(), AppError> {
    let gitlab = reconciler.gitlab;
    let hooks = gitlab.list_hooks(project.id)?;

    let kept_id = match hooks.iter().find(|h| h.url == url && h.is_enabled()) {
        Some(hook) => hook.id,
        None => {
            let hook = gitlab.create_hook(project.id, url)?;
            reconciler.record(SettingAction::Created, SettingKind::Webhook, &redact_token(url), project);
            hook.id
        }
    };

    let marker = trigger_endpoint_marker(target_project_id);
    for stale in hooks.iter().filter(|h| h.id != kept_id && h.url.contains(&marker)) {
        gitlab.delete_hook(project.id, stale.id)?;
        reconciler.record(
            SettingAction::Deleted,
            SettingKind::Webhook,
            &redact_token(&stale.url),
            project,
        );
    }
    Ok(())
}

/// Register the public key with push access on the source data project and enable it
/// on the JSON data project.
fn ensure_deploy_key<G: GitLabApi>(
    reconciler: &mut Reconciler<'_, G>,
    provider: &Provider,
    projects: &ResolvedProjects,
    public_key: &str,
) -> Result<(), AppError> {
    let gitlab = reconciler.gitlab;
    let title = provider.deploy_key_title();
    let public_key = public_key.trim();
    let source_data = &projects.source_data;

    let mut reusable = None;
    for key in gitlab.list_deploy_keys(source_data.id)? {
        if key.title != title {
            continue;
        }
        if reusable.is_none() && key.key.trim() == public_key && key.can_push {
            reusable = Some(key);
        } else {
            gitlab.delete_deploy_key(source_data.id, key.id)?;
            reconciler.record(SettingAction::Deleted, SettingKind::DeployKey, &title, source_data);
        }
    }

    let key = match reusable {
        Some(key) => key,
        None => {
            let request =
                NewDeployKey { title: title.clone(), key: public_key.to_string(), can_push: true };
            let key = gitlab.create_deploy_key(source_data.id, &request)?;
            reconciler.record(SettingAction::Created, SettingKind::DeployKey, &title, source_data);
            key
        }
    };

    let json_data = &projects.json_data;
    if !gitlab.list_deploy_keys(json_data.id)?.iter().any(|k| k.id == key.id) {
        gitlab.enable_deploy_key(json_data.id, key.id)?;
        reconciler.record(SettingAction::Enabled, SettingKind::DeployKey, &title, json_data);
    }
    Ok(())
}

/// Create the daily download schedule when absent. An existing schedule is left untouched.
fn ensure_schedule<G: GitLabApi>(
    reconciler: &mut Reconciler<'_, G>,
    provider: &Provider,
    fetcher: &Project,
    git_ref: &str,
    time: ScheduleTime,
) -> Result<(), AppError> {
    let gitlab = reconciler.gitlab;
    let description = provider.schedule_description();

    if gitlab.list_pipeline_schedules(fetcher.id)?.iter().any(|s| s.description == description) {
        tracing::debug!("schedule '{}' already exists", description);
        return Ok(());
    }

    let request = NewPipelineSchedule {
        description: description.clone(),
        git_ref: git_ref.to_string(),
        cron: time.daily_cron(),
        active: true,
    };
    let schedule = gitlab.create_pipeline_schedule(fetcher.id, &request)?;
    gitlab.create_pipeline_schedule_variable(
        fetcher.id,
        schedule.id,
        JOB_VARIABLE,
        JobKind::Download.as_str(),
    )?;
    reconciler.record(SettingAction::Created, SettingKind::PipelineSchedule, &description, fetcher);
    Ok(())
}

fn snapshot<G: GitLabApi>(
    gitlab: &G,
    provider: &Provider,
    projects: &ResolvedProjects,
) -> Result<SettingsSnapshot, AppError> {
    let fetcher = &projects.fetcher;
    let variables =
        gitlab.list_variables(fetcher.id)?.into_iter().map(|v| (v.key, v.value)).collect();
    let trigger = gitlab
        .list_triggers(fetcher.id)?
        .into_iter()
        .find(|t| t.description == provider.trigger_description());
    let schedule_description = provider.schedule_description();
    let schedule = gitlab
        .list_pipeline_schedules(fetcher.id)?
        .into_iter()
        .find(|s| s.description == schedule_description);
    let key_title = provider.deploy_key_title();
    let deploy_key = gitlab
        .list_deploy_keys(projects.source_data.id)?
        .into_iter()
        .find(|k| k.title == key_title);

    Ok(SettingsSnapshot {
        fetcher_project: fetcher.path_with_namespace.clone(),
        variables,
        trigger,
        source_data_project: projects.source_data.path_with_namespace.clone(),
        source_data_hooks: gitlab.list_hooks(projects.source_data.id)?,
        json_data_project: projects.json_data.path_with_namespace.clone(),
        json_data_hooks: gitlab.list_hooks(projects.json_data.id)?,
        deploy_key,
        schedule,
    })
}
