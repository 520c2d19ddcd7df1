//! Configuration handling for irmark

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotation::{DEFAULT_COMMENT_END, DEFAULT_COMMENT_START};
use crate::compare::CompareOptions;

/// Directory, relative to a project root, that holds `config.toml`.
pub const CONFIG_DIR: &str = ".irmark";
/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// irmark configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Annotation comment markers
    #[serde(default)]
    pub annotations: AnnotationConfig,

    /// Comparison settings
    #[serde(default)]
    pub check: CheckConfig,
}

/// Annotation comment markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Opening marker of an annotation comment
    #[serde(default = "default_comment_start")]
    pub comment_start: String,

    /// Closing marker of an annotation comment
    #[serde(default = "default_comment_end")]
    pub comment_end: String,
}

/// Comparison settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Treat computed facts without an expectation as mismatches
    #[serde(default = "default_report_unexpected")]
    pub report_unexpected: bool,
}

fn default_comment_start() -> String {
    DEFAULT_COMMENT_START.to_string()
}

fn default_comment_end() -> String {
    DEFAULT_COMMENT_END.to_string()
}

fn default_report_unexpected() -> bool {
    true
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            comment_start: default_comment_start(),
            comment_end: default_comment_end(),
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            report_unexpected: default_report_unexpected(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from .irmark/config.toml in the given project root
    pub fn load_from_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = project_root.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Reject settings that would make annotation extraction meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.annotations.comment_start.is_empty() || self.annotations.comment_end.is_empty() {
            return Err(ConfigError::Invalid(
                "annotation comment markers must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Comparison options derived from `[check]`.
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            report_unexpected: self.check.report_unexpected,
        }
    }
}
