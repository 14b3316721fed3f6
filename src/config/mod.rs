// src/config/mod.rs
// Debate configuration: layered resolution (CLI > file > environment > built-in)

pub mod defaults;
pub mod env;
pub mod file;

pub use env::{EnvSource, ProcessEnv};
pub use file::FileConfig;

use crate::error::ConfigError;
use crate::llm::Provider;
use defaults::*;
use std::fmt;

/// Partially specified settings for one debater. `None` defers to a lower layer.
#[derive(Debug, Clone, Default)]
pub struct DebaterLayer {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub persona: Option<String>,
    pub opening: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl DebaterLayer {
    /// Overlay `self` on `lower`: values set here win
    pub fn over(self, lower: DebaterLayer) -> DebaterLayer {
        DebaterLayer {
            provider: self.provider.or(lower.provider),
            model: self.model.or(lower.model),
            base_url: self.base_url.or(lower.base_url),
            persona: self.persona.or(lower.persona),
            opening: self.opening.or(lower.opening),
            temperature: self.temperature.or(lower.temperature),
            max_tokens: self.max_tokens.or(lower.max_tokens),
        }
    }
}

/// One configuration source (command line, config file, or environment)
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    pub rounds: Option<usize>,
    pub topic: Option<String>,
    pub common_persona: Option<String>,
    pub debater1: DebaterLayer,
    pub debater2: DebaterLayer,
}

impl ConfigLayer {
    /// Overlay `self` on `lower`: values set here win
    pub fn over(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            rounds: self.rounds.or(lower.rounds),
            topic: self.topic.or(lower.topic),
            common_persona: self.common_persona.or(lower.common_persona),
            debater1: self.debater1.over(lower.debater1),
            debater2: self.debater2.over(lower.debater2),
        }
    }
}

/// Immutable per-debater configuration, resolved once before the debate starts
#[derive(Clone, PartialEq)]
pub struct DebaterConfig {
    pub display_name: String,
    pub provider: Provider,
    pub model_id: String,
    pub endpoint_override: Option<String>,
    pub credential: String,
    /// Full system message: common persona plus the debater's own persona
    pub persona_text: String,
    pub opening_statement: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl DebaterConfig {
    /// Endpoint override if set, else the provider's default base URL
    pub fn base_url(&self) -> &str {
        self.endpoint_override
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

// Keep the credential out of debug output
impl fmt::Debug for DebaterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebaterConfig")
            .field("display_name", &self.display_name)
            .field("provider", &self.provider)
            .field("model_id", &self.model_id)
            .field("endpoint_override", &self.endpoint_override)
            .field("credential", &"<redacted>")
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish_non_exhaustive()
    }
}

/// Fully resolved session configuration
#[derive(Debug, Clone)]
pub struct DebateSettings {
    pub topic: String,
    pub rounds: usize,
    pub debater1: DebaterConfig,
    pub debater2: DebaterConfig,
}

/// Resolve the merged layer into final settings, applying built-in defaults and
/// looking up credentials in `env`.
pub fn resolve(layer: ConfigLayer, env: &dyn EnvSource) -> Result<DebateSettings, ConfigError> {
    let rounds = layer.rounds.unwrap_or(DEFAULT_ROUNDS);
    if rounds == 0 {
        return Err(ConfigError::InvalidValue {
            key: "rounds",
            reason: "must be at least 1".into(),
        });
    }

    let common = layer
        .common_persona
        .unwrap_or_else(|| DEFAULT_COMMON_PERSONA.to_string());

    let debater1 = resolve_debater(
        "Debater 1",
        layer.debater1,
        &common,
        DEFAULT_DEBATER1_PERSONA,
        DEFAULT_DEBATER1_OPENING,
        env,
    )?;
    let debater2 = resolve_debater(
        "Debater 2",
        layer.debater2,
        &common,
        DEFAULT_DEBATER2_PERSONA,
        DEFAULT_DEBATER2_OPENING,
        env,
    )?;

    Ok(DebateSettings {
        topic: layer.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        rounds,
        debater1,
        debater2,
    })
}

fn resolve_debater(
    display_name: &str,
    layer: DebaterLayer,
    common_persona: &str,
    default_persona: &str,
    default_opening: &str,
    env: &dyn EnvSource,
) -> Result<DebaterConfig, ConfigError> {
    let provider: Provider = layer.provider.as_deref().unwrap_or(DEFAULT_PROVIDER).parse()?;

    let temperature = layer.temperature.unwrap_or(DEFAULT_TEMPERATURE);
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ConfigError::InvalidValue {
            key: "temperature",
            reason: format!("{} is outside 0.0..=2.0", temperature),
        });
    }

    let max_output_tokens = layer.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    if max_output_tokens == 0 {
        return Err(ConfigError::InvalidValue {
            key: "max_tokens",
            reason: "must be at least 1".into(),
        });
    }

    let persona = layer.persona.unwrap_or_else(|| default_persona.to_string());

    Ok(DebaterConfig {
        display_name: display_name.to_string(),
        provider,
        model_id: layer.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        endpoint_override: layer.base_url.filter(|u| !u.trim().is_empty()),
        credential: env::api_key(env, provider)?,
        persona_text: compose_persona(common_persona, &persona),
        opening_statement: layer
            .opening
            .unwrap_or_else(|| default_opening.to_string()),
        temperature,
        max_output_tokens,
    })
}

/// Common persona, blank line, debater persona. Empty parts are dropped.
pub fn compose_persona(common: &str, persona: &str) -> String {
    match (common.trim().is_empty(), persona.trim().is_empty()) {
        (true, _) => persona.to_string(),
        (false, true) => common.to_string(),
        (false, false) => format!("{}\n\n{}", common, persona),
    }
}
