//! Runtime configuration for the store and its logging.
//!
//! # Invariants
//! - `db_path = None` selects a private in-memory database.
//! - A validated config always carries a supported log level and, when set,
//!   an absolute log directory.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Configuration errors detected before anything is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(dir) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                dir.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Process-level settings owned by the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    pub fn with_log(mut self, level: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.log_level = level.into();
        self.log_dir = Some(dir.into());
        self
    }

    /// Checks the settings without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if normalize_level(&self.log_level).is_err() {
            return Err(ConfigError::UnsupportedLogLevel(self.log_level.clone()));
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::path::PathBuf;

    #[test]
    fn default_config_is_valid_and_in_memory() {
        let config = CoreConfig::default();
        assert!(config.db_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_level_and_relative_dir() {
        let bad_level = CoreConfig {
            log_level: "verbose".to_string(),
            ..CoreConfig::default()
        };
        assert_eq!(
            bad_level.validate(),
            Err(ConfigError::UnsupportedLogLevel("verbose".to_string()))
        );

        let relative = CoreConfig::default().with_log("info", "logs/dev");
        assert_eq!(
            relative.validate(),
            Err(ConfigError::RelativeLogDir(PathBuf::from("logs/dev")))
        );
    }
}
