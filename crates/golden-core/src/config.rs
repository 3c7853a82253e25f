//! Configuration types for golden file comparison.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, PathStyle};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Golden configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenConfig {
    /// Comparator settings
    pub comparator: ComparatorSettings,
    /// Failure artifact settings
    pub failures: FailureSettings,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self {
            comparator: ComparatorSettings::default(),
            failures: FailureSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl GoldenConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: GoldenConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(Error::Config(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }

        self.failures.validate()
    }

    /// Path style to resolve goldens with, falling back to the platform.
    pub fn path_style(&self) -> PathStyle {
        self.comparator.path_style.unwrap_or_else(PathStyle::platform)
    }
}

/// Comparator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorSettings {
    /// Overwrite goldens instead of comparing against them
    pub auto_update: bool,
    /// Path style override (defaults to the platform style)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_style: Option<PathStyle>,
}

/// Where mismatching bytes are written for inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureSettings {
    /// Write failure artifacts on mismatch
    pub enabled: bool,
    /// Directory name, relative to the golden base directory
    pub dir_name: String,
}

impl Default for FailureSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            dir_name: "failures".to_string(),
        }
    }
}

impl FailureSettings {
    /// Validate the failure artifact settings.
    pub fn validate(&self) -> crate::Result<()> {
        let name = self.dir_name.trim();
        if name.is_empty() {
            return Err(Error::Config(
                "failures.dir_name cannot be empty".to_string(),
            ));
        }

        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "failures.dir_name must be a single directory name, got '{}'",
                self.dir_name
            )));
        }

        Ok(())
    }
}
