//! Tool configuration loaded from a TOML file.
//!
//! ```toml
//! log_level = "info"
//!
//! [output]
//! jpeg_quality = 90
//! create_missing_dirs = false
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos surface early.

use crate::core::error::ConfigError;
use crate::core::image::SaveOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Output encoding settings.
    pub output: OutputConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (1-100) for `.jpg`/`.jpeg` destinations.
    pub jpeg_quality: Option<u8>,
    /// Create the destination's parent directories before writing.
    pub create_missing_dirs: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output: OutputConfig::default(),
        }
    }
}

impl ToolConfig {
    /// Read and validate a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ToolConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the config as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                key: "log_level".to_string(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }

        if let Some(quality) = self.output.jpeg_quality {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Invalid {
                    key: "output.jpeg_quality".to_string(),
                    reason: format!("{} is outside 1..=100", quality),
                });
            }
        }

        Ok(())
    }

    /// Encoder settings derived from the `[output]` section.
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            jpeg_quality: self.output.jpeg_quality,
            create_missing_dirs: self.output.create_missing_dirs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ToolConfig::from_toml_str("").unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.save_options(), SaveOptions::default());
    }

    #[test]
    fn test_full_config() {
        let config = ToolConfig::from_toml_str(
            r#"
            log_level = "debug"

            [output]
            jpeg_quality = 85
            create_missing_dirs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        let options = config.save_options();
        assert_eq!(options.jpeg_quality, Some(85));
        assert!(options.create_missing_dirs);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let error = ToolConfig::from_toml_str("blur_radius = 3").unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        let error = ToolConfig::from_toml_str("[output]\njpeg_quality = 0").unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { ref key, .. } if key == "output.jpeg_quality"));
    }

    #[test]
    fn test_rejects_bad_log_level() {
        let error = ToolConfig::from_toml_str("log_level = \"loud\"").unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ToolConfig::default();
        config.output.jpeg_quality = Some(70);

        let text = config.to_toml_string().unwrap();
        assert_eq!(ToolConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = ToolConfig::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
    }
}
