// src/config/file.rs
// File-based configuration (JSON or TOML, flat keys)

use super::{ConfigLayer, DebaterLayer};
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Flat key layout shared by the JSON and TOML formats
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub rounds: Option<usize>,
    pub topic: Option<String>,
    pub common_persona: Option<String>,

    pub debater1_provider: Option<String>,
    pub debater1_model: Option<String>,
    pub debater1_base_url: Option<String>,
    pub debater1_persona: Option<String>,
    pub debater1_opening: Option<String>,
    pub debater1_temperature: Option<f32>,
    pub debater1_max_tokens: Option<u32>,

    pub debater2_provider: Option<String>,
    pub debater2_model: Option<String>,
    pub debater2_base_url: Option<String>,
    pub debater2_persona: Option<String>,
    pub debater2_opening: Option<String>,
    pub debater2_temperature: Option<f32>,
    pub debater2_max_tokens: Option<u32>,
}

impl FileConfig {
    /// Load an explicitly named config file. Format is chosen by extension:
    /// `.toml` is TOML, anything else is JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(shown.clone()))?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::parse_toml(&contents)
        } else {
            Self::parse_json(&contents)
        }
        .map_err(|reason| ConfigError::InvalidFile {
            path: shown,
            reason,
        })?;

        debug!(path = %path.display(), "Loaded config from file");
        Ok(config)
    }

    pub fn parse_json(contents: &str) -> Result<Self, String> {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }

    pub fn parse_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }

    pub fn into_layer(self) -> ConfigLayer {
        ConfigLayer {
            rounds: self.rounds,
            topic: self.topic,
            common_persona: self.common_persona,
            debater1: DebaterLayer {
                provider: self.debater1_provider,
                model: self.debater1_model,
                base_url: self.debater1_base_url,
                persona: self.debater1_persona,
                opening: self.debater1_opening,
                temperature: self.debater1_temperature,
                max_tokens: self.debater1_max_tokens,
            },
            debater2: DebaterLayer {
                provider: self.debater2_provider,
                model: self.debater2_model,
                base_url: self.debater2_base_url,
                persona: self.debater2_persona,
                opening: self.debater2_opening,
                temperature: self.debater2_temperature,
                max_tokens: self.debater2_max_tokens,
            },
        }
    }
}
