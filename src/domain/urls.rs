//! Web URLs an operator inspects for a provider.

use crate::domain::{ProjectPath, Provider};

/// Browser URL of a project.
pub fn project_web_url(web_base: &str, project: &ProjectPath) -> String {
    format!("{}/{}", web_base, project)
}

/// Labelled URLs for checking the CI of a provider, in inspection order.
pub fn provider_urls(
    web_base: &str,
    provider: &Provider,
    importer: &ProjectPath,
) -> Vec<(&'static str, String)> {
    let fetcher = project_web_url(web_base, provider.fetcher());
    let source_data = project_web_url(web_base, provider.source_data());
    let json_data = project_web_url(web_base, provider.json_data());
    let importer = project_web_url(web_base, importer);

    vec![
        ("fetcher jobs", format!("{}/-/jobs", fetcher)),
        ("fetcher CI/CD settings", format!("{}/-/settings/ci_cd", fetcher)),
        ("fetcher pipeline schedules", format!("{}/-/pipeline_schedules", fetcher)),
        ("source data repository settings", format!("{}/-/settings/repository", source_data)),
        ("source data webhooks", format!("{}/-/hooks", source_data)),
        ("JSON data repository settings", format!("{}/-/settings/repository", json_data)),
        ("JSON data webhooks", format!("{}/-/hooks", json_data)),
        ("importer jobs", format!("{}/-/jobs", importer)),
    ]
}
