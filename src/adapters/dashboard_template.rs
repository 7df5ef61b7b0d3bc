//! Markdown rendering of the provider dashboard.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::domain::dashboard::{format_timespan, format_timestamp};
use crate::domain::{AppError, Dashboard, Job, ProviderDashboard, ScheduleStatus};

const TEMPLATE_NAME: &str = "dashboard.md";
static DASHBOARD_TEMPLATE: &str = include_str!("../assets/dashboard/dashboard.md.j2");

#[derive(Serialize)]
struct DashboardView {
    providers: Vec<ProviderView>,
}

#[derive(Serialize)]
struct ProviderView {
    slug: String,
    schedule: Option<ScheduleView>,
    sections: Vec<SectionView>,
}

#[derive(Serialize)]
struct ScheduleView {
    url: String,
    status: &'static str,
    next_run_at: String,
    cron: String,
}

#[derive(Serialize)]
struct SectionView {
    title: &'static str,
    jobs: Vec<JobView>,
    /// Replaces the title when no job could be found.
    missing: Option<String>,
}

#[derive(Serialize)]
struct JobView {
    id: u64,
    url: String,
    status: String,
    duration: String,
    created_at: String,
    started_at: String,
    finished_at: String,
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            url: job.web_url.clone(),
            status: job.status.clone(),
            duration: job.duration.map(format_timespan).unwrap_or_else(|| "-".to_string()),
            created_at: format_timestamp(job.created_at),
            started_at: format_timestamp(job.started_at),
            finished_at: format_timestamp(job.finished_at),
        }
    }
}

impl From<&ScheduleStatus> for ScheduleView {
    fn from(status: &ScheduleStatus) -> Self {
        Self {
            url: status.url.clone(),
            status: if status.schedule.active { "active" } else { "inactive" },
            next_run_at: format_timestamp(status.schedule.next_run_at),
            cron: status.schedule.cron.clone(),
        }
    }
}

fn section(title: &'static str, jobs: &[Job], missing: Option<String>) -> SectionView {
    SectionView {
        title,
        jobs: jobs.iter().map(JobView::from).collect(),
        missing: if jobs.is_empty() { missing } else { None },
    }
}

fn provider_view(provider: &ProviderDashboard, dashboard: &Dashboard) -> ProviderView {
    let no_index_jobs = format!(
        "no indexation jobs found in the {} latest jobs of {}",
        dashboard.importer_jobs_scanned, dashboard.importer
    );
    ProviderView {
        slug: provider.slug.clone(),
        schedule: provider.schedule.as_ref().map(ScheduleView::from),
        sections: vec![
            section("downloads", &provider.downloads, None),
            section("converts", &provider.converts, None),
            section("indexations", &provider.indexations, Some(no_index_jobs)),
        ],
    }
}

/// Render the dashboard as a Markdown document, one section per provider.
pub fn render_markdown(dashboard: &Dashboard) -> Result<String, AppError> {
    let view = DashboardView {
        providers: dashboard.providers.iter().map(|p| provider_view(p, dashboard)).collect(),
    };

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(TEMPLATE_NAME, DASHBOARD_TEMPLATE).map_err(|err| {
        AppError::config_error(format!("Failed to load dashboard template: {}", err))
    })?;
    env.get_template(TEMPLATE_NAME)
        .map_err(|err| {
            AppError::config_error(format!("Failed to access dashboard template: {}", err))
        })?
        .render(&view)
        .map_err(|err| AppError::config_error(format!("Failed to render dashboard: {}", err)))
}
