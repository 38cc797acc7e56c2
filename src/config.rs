use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::pipeline::DEFAULT_METHOD;

/// Name used by [`Hub::register_default`](crate::Hub::register_default) and
/// by dispatches that do not name a pipeline.
pub const DEFAULT_PIPELINE: &str = "default";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for field '{field}': {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Defaults applied to every pipeline a hub creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Method used to invoke object stages
    pub method: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        validate_name("pipeline.method", &self.method)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Pipeline used when a dispatch does not name one
    pub default_pipeline: String,
    pub pipeline: PipelineConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            default_pipeline: DEFAULT_PIPELINE.to_string(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl HubConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_name("default_pipeline", &self.default_pipeline)?;
        self.pipeline.validate()
    }
}

fn validate_name(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingRequired {
            field: field.to_string(),
        });
    }

    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}
