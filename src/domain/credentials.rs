use crate::domain::AppError;

/// Environment variable holding the GitLab private token.
pub const PRIVATE_TOKEN_ENV: &str = "PRIVATE_TOKEN";

/// GitLab private token, read once at start-up.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    private_token: String,
}

impl Credentials {
    pub fn new(private_token: impl Into<String>) -> Result<Self, AppError> {
        let private_token = private_token.into();
        if private_token.trim().is_empty() {
            return Err(AppError::MissingPrivateToken);
        }
        Ok(Self { private_token })
    }

    /// Build credentials from an optional token lookup result.
    pub fn from_lookup(value: Option<String>) -> Result<Self, AppError> {
        value.map(Self::new).unwrap_or(Err(AppError::MissingPrivateToken))
    }

    pub fn private_token(&self) -> &str {
        &self.private_token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("private_token", &"[REDACTED]").finish()
    }
}
