use super::validation::validate_project_path;
use crate::domain::AppError;
use crate::impl_validated_id;

/// A GitLab project reference: a `namespace/project` path or a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectPath(String);

impl_validated_id!(ProjectPath, validate_project_path, AppError::InvalidProjectPath);

impl ProjectPath {
    /// Join a namespace and a project name.
    pub fn join(namespace: &str, name: &str) -> Result<Self, AppError> {
        Self::new(&format!("{}/{}", namespace, name))
    }

    /// Last path segment (the project name).
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment, empty for a bare id.
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once('/').map(|(namespace, _)| namespace).unwrap_or("")
    }
}
