use serde::{Deserialize, Deserializer};

use super::validation::validate_slug;
use crate::domain::AppError;
use crate::impl_validated_id;

/// A validated provider slug (`boe`, `bis`, `ameco`...).
///
/// Guarantees:
/// - Non-empty
/// - Contains only lowercase ASCII letters, digits, `-` or `_`
/// - No path traversal components (/, \, ., ..)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderSlug(String);

impl_validated_id!(ProviderSlug, validate_slug, AppError::InvalidProviderSlug);

impl ProviderSlug {
    /// Slug of the test provider, which never gets a pipeline schedule.
    pub const DUMMY: &'static str = "dummy";

    /// Whether this slug names the dummy provider.
    pub fn is_dummy(&self) -> bool {
        self.0 == Self::DUMMY
    }
}

impl From<ProviderSlug> for String {
    fn from(val: ProviderSlug) -> Self {
        val.0
    }
}

impl<'de> Deserialize<'de> for ProviderSlug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ProviderSlug::new(&s).map_err(serde::de::Error::custom)
    }
}
