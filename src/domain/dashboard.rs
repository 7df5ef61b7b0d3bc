//! Per-provider overview of schedules and recent jobs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Job, JobKind, PipelineSchedule};

/// Number of jobs of each kind shown per provider.
pub const JOBS_PER_KIND: usize = 3;

const RUNNING_JOB_MARKER: &str = "Running job ";
const IMPORTING_PROVIDER_MARKER: &str = "Importing provider ";

/// Overview of every fetcher.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    /// Path of the importer project whose jobs were scanned.
    pub importer: String,
    /// How many of the latest importer jobs were scanned for indexations.
    pub importer_jobs_scanned: usize,
    pub providers: Vec<ProviderDashboard>,
}

/// Schedule state and latest jobs of one provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderDashboard {
    pub slug: String,
    pub fetcher_url: String,
    pub schedule: Option<ScheduleStatus>,
    pub downloads: Vec<Job>,
    pub converts: Vec<Job>,
    pub indexations: Vec<Job>,
}

/// Download schedule of a fetcher.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStatus {
    pub url: String,
    #[serde(flatten)]
    pub schedule: PipelineSchedule,
}

/// Fetcher job kind announced by a job log (`Running job download`).
pub fn fetcher_job_kind_from_trace(trace: &str) -> Option<JobKind> {
    let kind: JobKind = word_after(trace, RUNNING_JOB_MARKER, &['$'])?.parse().ok()?;
    kind.runs_in_fetcher().then_some(kind)
}

/// Provider slug announced by an importer job log (`Importing provider boe...`).
pub fn indexed_provider_from_trace(trace: &str) -> Option<&str> {
    word_after(trace, IMPORTING_PROVIDER_MARKER, &['$', '.'])
}

fn word_after<'a>(trace: &'a str, marker: &str, stops: &[char]) -> Option<&'a str> {
    trace.match_indices(marker).find_map(|(start, _)| {
        let rest = &trace[start + marker.len()..];
        let end =
            rest.find(|c: char| c.is_whitespace() || stops.contains(&c)).unwrap_or(rest.len());
        let word = &rest[..end];
        (!word.is_empty()).then_some(word)
    })
}

/// Human duration such as `1 hour, 2 minutes and 5 seconds`.
pub fn format_timespan(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let units = [(total / 3600, "hour"), (total % 3600 / 60, "minute"), (total % 60, "second")];
    let parts: Vec<String> = units
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, unit)| format!("{} {}{}", count, unit, if *count == 1 { "" } else { "s" }))
        .collect();

    match parts.split_last() {
        None => "0 seconds".to_string(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// Timestamp shown in reports, `-` when unknown.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string()).unwrap_or_else(|| "-".to_string())
}
