use std::process::Command;

use crate::domain::AppError;
use crate::ports::Browser;

/// Opens URLs with the platform's opener command (`xdg-open`, `open`, `start`).
#[derive(Debug, Clone)]
pub struct CommandBrowser {
    program: String,
}

impl CommandBrowser {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    /// Opener of the current platform, overridable with `BROWSER`.
    pub fn system() -> Self {
        if let Ok(program) = std::env::var("BROWSER")
            && !program.trim().is_empty()
        {
            return Self::new(program);
        }
        let program = if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(target_os = "windows") {
            "explorer"
        } else {
            "xdg-open"
        };
        Self::new(program)
    }
}

impl Browser for CommandBrowser {
    fn open(&self, url: &str) -> Result<(), AppError> {
        let status = Command::new(&self.program).arg(url).status().map_err(|e| {
            AppError::config_error(format!("Failed to run '{}': {}", self.program, e))
        })?;
        if !status.success() {
            return Err(AppError::config_error(format!(
                "'{} {}' exited with {}",
                self.program, url, status
            )));
        }
        Ok(())
    }
}
