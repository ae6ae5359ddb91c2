//! Application configuration
//!
//! Layered with the `config` crate, lowest precedence first:
//! struct defaults, `config/default.toml`, the file named by
//! `FACE_CLASSIFIER_CONFIG`, then `FACE_CLASSIFIER__SECTION__KEY`
//! environment variables.

use std::collections::HashMap;
use std::net::SocketAddr;

use config::{Config, Environment, File, FileFormat};
use inference_engine::ModelConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rate_limit::RateLimitConfig;

/// Environment variable naming an extra config file
pub const CONFIG_PATH_ENV: &str = "FACE_CLASSIFIER_CONFIG";

/// Prefix for per-key environment overrides
pub const ENV_PREFIX: &str = "FACE_CLASSIFIER";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Largest accepted request body (bytes)
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Engine selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Serve fixed scores instead of loading the ONNX model (demo only)
    pub mock_scores: Option<Vec<f32>>,
}

/// Icon and colour shown for a predicted label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub icon: String,
    pub color: String,
}

/// Page text and per-label styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub title: String,
    pub footer: String,
    /// Styles keyed by label, matched case-insensitively
    pub styles: HashMap<String, LabelStyle>,
    /// Style for labels without an entry in `styles`
    pub fallback_style: LabelStyle,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            title: "Face Classifier".to_string(),
            footer: "Powered by tract & axum | AI Face Recognition System".to_string(),
            styles: HashMap::new(),
            fallback_style: LabelStyle {
                icon: "🚀".to_string(),
                color: "#2575fc".to_string(),
            },
        }
    }
}

impl PresentationConfig {
    /// Style for a label.
    ///
    /// The `config` crate lowercases table keys, so `[presentation.styles.Agung]`
    /// arrives as `agung`; the lookup ignores case to still match "Agung".
    pub fn style_for(&self, label: &str) -> &LabelStyle {
        self.styles
            .get(label)
            .or_else(|| {
                let wanted = label.to_lowercase();
                self.styles
                    .iter()
                    .find(|(key, _)| key.to_lowercase() == wanted)
                    .map(|(_, style)| style)
            })
            .unwrap_or(&self.fallback_style)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Model path and labels have no defaults and must be configured
    pub model: ModelConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

impl AppConfig {
    /// Load from `config/default.toml`, an optional extra file and the
    /// environment
    pub fn load(extra_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("model.labels")
                    .with_list_parse_key("engine.mock_scores")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_settings(settings)
    }

    /// Parse a TOML document (no file or environment layering)
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid(format!("server.addr '{}': {}", self.server.addr, e)))?;

        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_upload_bytes must be > 0".into()));
        }

        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::Invalid(format!("logging.level '{}'", self.logging.level)))?;

        if self.model.path.trim().is_empty() && self.engine.mock_scores.is_none() {
            return Err(ConfigError::Invalid("model.path must be set".into()));
        }

        if self.model.input_width == 0 || self.model.input_height == 0 {
            return Err(ConfigError::Invalid("model input size must be non-zero".into()));
        }

        Ok(())
    }
}
