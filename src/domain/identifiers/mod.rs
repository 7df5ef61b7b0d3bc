pub mod project_path;
pub mod provider_slug;
pub mod validation;

pub use project_path::ProjectPath;
pub use provider_slug::ProviderSlug;
