use crate::domain::CiConfig;
use crate::ports::GitLabApi;

/// Application context holding dependencies for command execution.
pub struct AppContext<G: GitLabApi> {
    gitlab: G,
    config: CiConfig,
}

impl<G: GitLabApi> AppContext<G> {
    /// Create a new application context.
    pub fn new(gitlab: G, config: CiConfig) -> Self {
        Self { gitlab, config }
    }

    /// Get a reference to the GitLab client.
    pub fn gitlab(&self) -> &G {
        &self.gitlab
    }

    /// Get a reference to the tool configuration.
    pub fn config(&self) -> &CiConfig {
        &self.config
    }
}
