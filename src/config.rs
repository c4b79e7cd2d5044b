use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::renderer::DEFAULT_FLATTEN_TOLERANCE;
use crate::style::StyleSettings;

/// Names the JSON config file read at startup
pub const CONFIG_ENV_VAR: &str = "VECTOR_SKETCH_CONFIG";

/// Startup configuration. Every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial style pickers, overridden by persisted settings
    pub style: StyleSettings,
    pub flatten_tolerance: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            style: StyleSettings::default(),
            flatten_tolerance: DEFAULT_FLATTEN_TOLERANCE,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: AppConfig = serde_json::from_str(json)?;
        if config.flatten_tolerance.is_nan() || config.flatten_tolerance <= 0.0 {
            warn!(
                "Invalid flatten tolerance {}, using {}",
                config.flatten_tolerance, DEFAULT_FLATTEN_TOLERANCE
            );
            config.flatten_tolerance = DEFAULT_FLATTEN_TOLERANCE;
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], falling back to defaults
    /// when it is unset or unreadable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(err) => {
                warn!("Ignoring config {}: {}", Path::new(&path).display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::NormalizedColor;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.flatten_tolerance, 0.25);
        assert_eq!(config.style.line_width, 1.0);
    }

    #[test]
    fn test_partial_style() {
        let config = AppConfig::from_json(
            r#"{
                "style": { "stroke": [1.0, 0.0, 0.0], "line_width": 4 },
                "flatten_tolerance": 0.5
            }"#,
        )
        .unwrap();
        assert_eq!(config.style.stroke, NormalizedColor::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(config.style.fill, StyleSettings::default().fill);
        assert_eq!(config.style.line_width, 4.0);
        assert_eq!(config.flatten_tolerance, 0.5);
    }

    #[test]
    fn test_bad_color_is_an_error() {
        let err = AppConfig::from_json(r#"{ "style": { "fill": [0.5, 0.5] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_non_positive_tolerance_falls_back() {
        let config = AppConfig::from_json(r#"{ "flatten_tolerance": 0 }"#).unwrap();
        assert_eq!(config.flatten_tolerance, DEFAULT_FLATTEN_TOLERANCE);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/vector-sketch.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
