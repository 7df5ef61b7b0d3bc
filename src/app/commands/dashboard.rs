//! Overview of provider schedules and latest jobs.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::Utc;

use crate::app::AppContext;
use crate::app::commands::ls_providers::fetcher_projects;
use crate::domain::dashboard::{
    JOBS_PER_KIND, fetcher_job_kind_from_trace, indexed_provider_from_trace,
};
use crate::domain::{
    AppError, Dashboard, Job, JobKind, Project, Provider, ProviderDashboard, ProviderSlug,
    ScheduleStatus,
};
use crate::ports::GitLabApi;

/// Latest importer jobs scanned for indexations.
pub const IMPORTER_JOBS_SCANNED: usize = 100;
/// Latest fetcher jobs scanned for downloads and conversions.
const FETCHER_JOBS_SCANNED: usize = 100;

/// Output format of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardFormat {
    Markdown,
    Json,
}

impl FromStr for DashboardFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(DashboardFormat::Markdown),
            "json" => Ok(DashboardFormat::Json),
            other => Err(AppError::config_error(format!(
                "Unknown dashboard format '{}' (expected markdown or json)",
                other
            ))),
        }
    }
}

/// Collect the schedule and latest download, convert and index jobs of each fetcher.
///
/// `only` restricts the dashboard to those providers; empty means every fetcher.
pub fn execute<G: GitLabApi>(
    ctx: &AppContext<G>,
    only: &[ProviderSlug],
) -> Result<Dashboard, AppError> {
    let gitlab = ctx.gitlab();
    let config = ctx.config();

    let fetchers: Vec<(ProviderSlug, Project)> = fetcher_projects(ctx)?
        .into_iter()
        .filter(|(slug, _)| only.is_empty() || only.contains(slug))
        .collect();
    for slug in only {
        if !fetchers.iter().any(|(known, _)| known == slug) {
            tracing::warn!("no fetcher project for provider {}", slug);
        }
    }

    let importer = gitlab.project(&config.gitlab.importer_project()?)?;
    let mut indexations = if fetchers.is_empty() {
        BTreeMap::new()
    } else {
        index_jobs_by_provider(gitlab, &importer)?
    };

    let mut providers = Vec::with_capacity(fetchers.len());
    for (slug, project) in fetchers {
        tracing::debug!("collecting jobs of {}", project.path_with_namespace);
        let provider = Provider::new(slug.clone(), &config.namespaces)?;
        let (downloads, converts) = latest_fetcher_jobs(gitlab, &project)?;
        providers.push(ProviderDashboard {
            schedule: current_schedule(gitlab, &project, &provider)?,
            fetcher_url: project.web_url,
            downloads,
            converts,
            indexations: indexations.remove(slug.as_str()).unwrap_or_default(),
            slug: slug.to_string(),
        });
    }

    Ok(Dashboard {
        generated_at: Utc::now(),
        importer: importer.path_with_namespace,
        importer_jobs_scanned: IMPORTER_JOBS_SCANNED,
        providers,
    })
}

/// The generated download schedule, or the first schedule of the fetcher.
fn current_schedule<G: GitLabApi>(
    gitlab: &G,
    project: &Project,
    provider: &Provider,
) -> Result<Option<ScheduleStatus>, AppError> {
    let mut schedules = gitlab.list_pipeline_schedules(project.id)?;
    if schedules.len() > 1 {
        let count = schedules.len();
        tracing::warn!("{} has {} pipeline schedules", project.path_with_namespace, count);
    }
    if schedules.is_empty() {
        return Ok(None);
    }

    let description = provider.schedule_description();
    let index = schedules.iter().position(|s| s.description == description).unwrap_or(0);
    let schedule = schedules.swap_remove(index);
    Ok(Some(ScheduleStatus {
        url: format!("{}/-/pipeline_schedules/{}/edit", project.web_url, schedule.id),
        schedule,
    }))
}

/// Latest downloads and conversions.
///
/// Jobs not named after their kind are classified from their log.
fn latest_fetcher_jobs<G: GitLabApi>(
    gitlab: &G,
    project: &Project,
) -> Result<(Vec<Job>, Vec<Job>), AppError> {
    let mut downloads = Vec::new();
    let mut converts = Vec::new();

    for job in gitlab.list_jobs(project.id, FETCHER_JOBS_SCANNED)? {
        if downloads.len() >= JOBS_PER_KIND && converts.len() >= JOBS_PER_KIND {
            break;
        }
        let kind = match job.name.parse::<JobKind>() {
            Ok(kind) if kind.runs_in_fetcher() => Some(kind),
            _ => {
                trace_of(gitlab, project, &job)?.as_deref().and_then(fetcher_job_kind_from_trace)
            }
        };
        match kind {
            Some(JobKind::Download) if downloads.len() < JOBS_PER_KIND => downloads.push(job),
            Some(JobKind::Convert) if converts.len() < JOBS_PER_KIND => converts.push(job),
            _ => {}
        }
    }
    Ok((downloads, converts))
}

/// Latest importer jobs grouped by the provider their log says they index.
fn index_jobs_by_provider<G: GitLabApi>(
    gitlab: &G,
    importer: &Project,
) -> Result<BTreeMap<String, Vec<Job>>, AppError> {
    let mut by_provider: BTreeMap<String, Vec<Job>> = BTreeMap::new();
    for job in gitlab.list_jobs(importer.id, IMPORTER_JOBS_SCANNED)? {
        let Some(trace) = trace_of(gitlab, importer, &job)? else {
            continue;
        };
        if let Some(slug) = indexed_provider_from_trace(&trace) {
            let jobs = by_provider.entry(slug.to_string()).or_default();
            if jobs.len() < JOBS_PER_KIND {
                jobs.push(job);
            }
        }
    }
    Ok(by_provider)
}

/// Log of a job, `None` when it has none yet.
fn trace_of<G: GitLabApi>(
    gitlab: &G,
    project: &Project,
    job: &Job,
) -> Result<Option<String>, AppError> {
    match gitlab.job_trace(project.id, job.id) {
        Ok(trace) => Ok(Some(trace)),
        Err(AppError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
