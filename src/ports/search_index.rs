use crate::domain::{AppError, ProviderSlug};

/// Port for the search index fed by the importer.
pub trait SearchIndex {
    /// Delete every indexed document of a provider and commit.
    fn delete_provider(&self, slug: &ProviderSlug) -> Result<(), AppError>;
}
