//! Deck Configuration
//!
//! Runtime configuration for the deck core and its surfaces, loaded with
//! the usual priority (highest first):
//!
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [reveal]
//! interval_ms = 25
//!
//! [tilt]
//! max_angle_deg = 12.0
//!
//! [backend]
//! host = "localhost"
//! port = 11434
//! model = "llama3.2"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::briefing::{DEFAULT_REVEAL_INTERVAL, FALLBACK_BRIEFING};
use crate::tilt::MAX_TILT_DEG;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Resolved deck configuration
#[derive(Clone, Debug, PartialEq)]
pub struct DeckConfig {
    /// Wall time per revealed briefing character
    pub reveal_interval: Duration,
    /// Maximum tilt rotation magnitude, in degrees
    pub max_tilt_deg: f32,
    /// Narrative backend host
    pub backend_host: String,
    /// Narrative backend port
    pub backend_port: u16,
    /// Model identifier passed to the backend
    pub model: String,
    /// Briefing substituted when the backend cannot be reached
    pub fallback_text: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            max_tilt_deg: MAX_TILT_DEG,
            backend_host: "localhost".to_string(),
            backend_port: 11434,
            model: "llama3.2".to_string(),
            fallback_text: FALLBACK_BRIEFING.to_string(),
        }
    }
}

impl DeckConfig {
    /// Defaults with environment-variable overrides applied.
    ///
    /// Recognized variables: `VIBEDECK_REVEAL_MS`, `VIBEDECK_MODEL`,
    /// `VIBEDECK_OLLAMA_HOST`, `VIBEDECK_OLLAMA_PORT`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(ms) = env_parse::<u64>("VIBEDECK_REVEAL_MS") {
            self.reveal_interval = Duration::from_millis(ms);
        }
        if let Ok(model) = std::env::var("VIBEDECK_MODEL") {
            self.model = model;
        }
        if let Ok(host) = std::env::var("VIBEDECK_OLLAMA_HOST") {
            self.backend_host = host;
        }
        if let Some(port) = env_parse::<u16>("VIBEDECK_OLLAMA_PORT") {
            self.backend_port = port;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.reveal_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "reveal interval must be positive".to_string(),
            ));
        }
        if self.max_tilt_deg <= 0.0 || !self.max_tilt_deg.is_finite() {
            return Err(ConfigError::ValidationError(
                "max tilt angle must be a positive finite number".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// TOML file form of the configuration; every field optional
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckToml {
    /// `[reveal]` section
    pub reveal: RevealToml,
    /// `[tilt]` section
    pub tilt: TiltToml,
    /// `[backend]` section
    pub backend: BackendToml,
    /// Fallback briefing override
    pub fallback_text: Option<String>,
}

/// `[reveal]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealToml {
    /// Wall time per revealed character, in milliseconds
    pub interval_ms: Option<u64>,
}

/// `[tilt]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltToml {
    /// Maximum rotation magnitude, in degrees
    pub max_angle_deg: Option<f32>,
}

/// `[backend]` section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendToml {
    /// Narrative backend host
    pub host: Option<String>,
    /// Narrative backend port
    pub port: Option<u16>,
    /// Model identifier
    pub model: Option<String>,
}

impl DeckToml {
    /// Merge file values over `base` (file loses to env, wins over defaults)
    #[must_use]
    pub fn merge_into(self, mut base: DeckConfig) -> DeckConfig {
        if let Some(ms) = self.reveal.interval_ms {
            base.reveal_interval = Duration::from_millis(ms);
        }
        if let Some(deg) = self.tilt.max_angle_deg {
            base.max_tilt_deg = deg;
        }
        if let Some(host) = self.backend.host {
            base.backend_host = host;
        }
        if let Some(port) = self.backend.port {
            base.backend_port = port;
        }
        if let Some(model) = self.backend.model {
            base.model = model;
        }
        if let Some(text) = self.fallback_text {
            base.fallback_text = text;
        }
        base
    }
}

/// Load configuration from a TOML file path, then apply env overrides.
///
/// `None` skips the file layer entirely.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read or parsed, or if
/// the resolved values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<DeckConfig, ConfigError> {
    let mut config = match path {
        None => DeckConfig::default(),
        Some(path) => {
            let text =
                std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
                    path: path.clone(),
                    source,
                })?;
            let file: DeckToml = toml::from_str(&text)?;
            tracing::info!(path = %path.display(), "Loaded deck configuration");
            file.merge_into(DeckConfig::default())
        }
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeckConfig::default();
        assert_eq!(config.reveal_interval, Duration::from_millis(25));
        assert!((config.max_tilt_deg - 12.0).abs() < f32::EPSILON);
        assert_eq!(config.backend_port, 11434);
    }

    #[test]
    fn test_toml_merge() {
        let toml = r#"
            [reveal]
            interval_ms = 40

            [backend]
            model = "mistral"
        "#;
        let file: DeckToml = toml::from_str(toml).unwrap();
        let config = file.merge_into(DeckConfig::default());

        assert_eq!(config.reveal_interval, Duration::from_millis(40));
        assert_eq!(config.model, "mistral");
        // Untouched sections keep their defaults.
        assert!((config.max_tilt_deg - 12.0).abs() < f32::EPSILON);
        assert_eq!(config.backend_host, "localhost");
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let file: DeckToml = toml::from_str("").unwrap();
        let config = file.merge_into(DeckConfig::default());
        assert_eq!(config, DeckConfig::default());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = DeckConfig {
            reveal_interval: Duration::ZERO,
            ..DeckConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_negative_tilt_rejected() {
        let config = DeckConfig {
            max_tilt_deg: -3.0,
            ..DeckConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_config_from_path(Some(PathBuf::from("/nonexistent/vibedeck.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
