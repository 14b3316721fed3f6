// src/config/env.rs
// Environment-based configuration: provider/model defaults and API keys

use super::{ConfigLayer, DebaterLayer};
use crate::error::ConfigError;
use crate::llm::Provider;
use tracing::debug;

/// Source of environment variables. `std::env` in production, a map in tests.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Read a variable, filtering empty values
fn read_var(env: &dyn EnvSource, name: &str) -> Option<String> {
    env.var(name).filter(|v| !v.trim().is_empty())
}

/// Environment defaults layer (DEBATER{1,2}_PROVIDER, DEBATER{1,2}_MODEL)
pub fn env_layer(env: &dyn EnvSource) -> ConfigLayer {
    let layer = ConfigLayer {
        debater1: DebaterLayer {
            provider: read_var(env, "DEBATER1_PROVIDER"),
            model: read_var(env, "DEBATER1_MODEL"),
            ..Default::default()
        },
        debater2: DebaterLayer {
            provider: read_var(env, "DEBATER2_PROVIDER"),
            model: read_var(env, "DEBATER2_MODEL"),
            ..Default::default()
        },
        ..Default::default()
    };
    debug!(
        debater1_provider = ?layer.debater1.provider,
        debater2_provider = ?layer.debater2.provider,
        "Environment defaults loaded"
    );
    layer
}

/// Look up the API key for a provider
pub fn api_key(env: &dyn EnvSource, provider: Provider) -> Result<String, ConfigError> {
    let var = provider.api_key_env_var();
    read_var(env, var).ok_or(ConfigError::MissingCredential { var })
}
