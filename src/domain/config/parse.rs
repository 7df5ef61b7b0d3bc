//! Pure parse/validate for tool configuration (`dbnomics-ci.toml`).

use crate::domain::{AppError, CiConfig};

/// Parse and validate tool configuration from TOML content.
pub fn parse_config_content(content: &str) -> Result<CiConfig, AppError> {
    let config: CiConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
