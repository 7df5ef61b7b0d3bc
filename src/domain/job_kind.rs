use std::fmt;
use std::str::FromStr;

use crate::domain::AppError;

/// Kinds of CI jobs an operator can fire for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Download source data from the provider (fetcher project).
    Download,
    /// Convert source data to JSON data (fetcher project).
    Convert,
    /// Index JSON data into the search engine (importer project).
    Index,
}

impl JobKind {
    /// All job kinds in pipeline order.
    pub const ALL: [JobKind; 3] = [JobKind::Download, JobKind::Convert, JobKind::Index];

    /// Value passed as the `JOB` pipeline variable.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Download => "download",
            JobKind::Convert => "convert",
            JobKind::Index => "index",
        }
    }

    /// Whether the job runs in the provider's fetcher project rather than the importer.
    pub fn runs_in_fetcher(&self) -> bool {
        matches!(self, JobKind::Download | JobKind::Convert)
    }
}

impl FromStr for JobKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "download" => Ok(JobKind::Download),
            "convert" => Ok(JobKind::Convert),
            "index" => Ok(JobKind::Index),
            other => Err(AppError::UnknownJobKind(other.to_string())),
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
