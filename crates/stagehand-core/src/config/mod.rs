//! # Stagehand Kernel Configuration
//!
//! [`KernelConfig`] holds the few knobs an `EventDrivenKernel` reads. It can
//! be built in code or loaded from a JSON, YAML (`yaml-config` feature) or
//! TOML (`toml-config` feature) file; every field has a default, so an empty
//! file is a valid configuration.
pub mod error;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

use crate::kernel::constants::{KERNEL_NAME, PRIORITY_NORMAL};
use crate::kernel::extension::Priority;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Label used in the kernel's log lines
    pub name: String,
    /// Priority given to extensions registered without one
    pub default_priority: Priority,
    /// Log failed non-blocking dispatches at `warn` instead of `debug`
    pub report_background_failures: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            name: KERNEL_NAME.to_string(),
            default_priority: PRIORITY_NORMAL,
            report_background_failures: true,
        }
    }
}

impl KernelConfig {
    /// Parse a configuration from text in the given format
    pub fn from_str(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let deserialization = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::Deserialization {
            format: format.extension().to_string(),
            source,
        };

        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| deserialization(Box::new(e))),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                // An empty YAML document is `null`, not an empty mapping.
                if content.trim().is_empty() {
                    return Ok(Self::default());
                }
                serde_yaml::from_str(content).map_err(|e| deserialization(Box::new(e)))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| deserialization(Box::new(e))),
        }
    }

    /// Load a configuration file, choosing the format from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            operation: "read_config".to_string(),
            source,
        })?;

        let config = Self::from_str(&content, format)?;
        log::debug!("Loaded kernel configuration from {}", path.display());
        Ok(config)
    }
}
