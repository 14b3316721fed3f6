// src/mcp/config.rs
// Tool provider launch specs, read from mcp_config.json

use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// How to launch one tool provider process
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderLaunchSpec {
    pub id: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

/// A single server entry as written in the file
#[derive(Deserialize)]
struct ServerEntry {
    command: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    env: HashMap<String, String>,
}

/// Result of reading the provider config: usable specs plus the entries that were skipped
#[derive(Debug, Default)]
pub struct ProviderConfig {
    pub specs: Vec<ProviderLaunchSpec>,
    pub rejected: Vec<ConfigError>,
}

impl ProviderConfig {
    /// Load provider specs from a file. A missing file means no providers.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => {
                warn!(
                    path = %path.display(),
                    "MCP config file not found, tools will not be available"
                );
                return Ok(Self::default());
            }
        };

        let config = Self::parse(&contents).map_err(|reason| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason,
        })?;

        info!(
            path = %path.display(),
            servers = ?config.specs.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            rejected = config.rejected.len(),
            "Loaded MCP server configs"
        );
        Ok(config)
    }

    /// Parse `{"servers": {...}}` (or the `mcpServers` alias). Entry order is preserved.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let root: Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        let servers = match root.get("servers").or_else(|| root.get("mcpServers")) {
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err("'servers' must be an object".into()),
            None => Map::new(),
        };

        let mut config = Self::default();
        for (id, entry) in servers {
            match Self::parse_entry(&id, entry) {
                Ok(spec) => config.specs.push(spec),
                Err(e) => {
                    warn!(server = %id, error = %e, "Skipping malformed MCP server entry");
                    config.rejected.push(e);
                }
            }
        }

        if config.specs.is_empty() {
            debug!("No MCP servers configured");
        }
        Ok(config)
    }

    fn parse_entry(id: &str, entry: Value) -> Result<ProviderLaunchSpec, ConfigError> {
        let malformed = |reason: String| ConfigError::MalformedProvider {
            provider: id.to_string(),
            reason,
        };

        let entry: ServerEntry =
            serde_json::from_value(entry).map_err(|e| malformed(e.to_string()))?;
        let command = entry
            .command
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| malformed("missing 'command'".into()))?;

        Ok(ProviderLaunchSpec {
            id: id.to_string(),
            command,
            args: entry.args,
            env: entry.env,
        })
    }
}
