use crate::domain::{AppError, ProviderSlug};
use crate::ports::SearchIndex;

/// Remove every indexed document of a provider.
pub fn execute<S: SearchIndex>(index: &S, slug: &ProviderSlug) -> Result<(), AppError> {
    index.delete_provider(slug)?;
    tracing::info!("deleted {} from the search index", slug);
    Ok(())
}
