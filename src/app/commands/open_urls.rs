use crate::domain::urls::provider_urls;
use crate::domain::{AppError, CiConfig, Provider, ProviderSlug};
use crate::ports::Browser;

/// List the URLs to inspect for a provider, opening each when a browser is given.
pub fn execute<B: Browser>(
    config: &CiConfig,
    slug: &ProviderSlug,
    browser: Option<&B>,
) -> Result<Vec<(&'static str, String)>, AppError> {
    let provider = Provider::new(slug.clone(), &config.namespaces)?;
    let importer = config.gitlab.importer_project()?;
    let urls = provider_urls(&config.gitlab.web_base(), &provider, &importer);

    if let Some(browser) = browser {
        for (label, url) in &urls {
            tracing::debug!("opening {}", label);
            browser.open(url)?;
        }
    }
    Ok(urls)
}
