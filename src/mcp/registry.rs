// src/mcp/registry.rs
// Tool registry: owns provider sessions, advertises their tools, routes invocations

use super::config::ProviderLaunchSpec;
use super::provider::{ProviderConnector, ToolProvider};
use super::types::{ToolDescriptor, ToolOutcome};
use crate::error::{ConnectError, ToolError};
use crate::llm::Tool;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Outcome of the connect phase
#[derive(Debug, Default)]
pub struct ConnectReport {
    pub attempted: usize,
    pub connected: Vec<String>,
    pub failures: Vec<ConnectError>,
}

impl ConnectReport {
    pub fn connected_count(&self) -> usize {
        self.connected.len()
    }
}

/// Registered tool and the provider that owns it
struct RegisteredTool {
    descriptor: ToolDescriptor,
    provider: String,
}

pub struct ToolRegistry {
    connector: Box<dyn ProviderConnector>,
    /// Sessions keyed by provider id. Removed on shutdown.
    providers: HashMap<String, Box<dyn ToolProvider>>,
    /// Connection order, used for deterministic shutdown
    order: Vec<String>,
    /// Advertised tools in discovery order; names are unique
    tools: Vec<RegisteredTool>,
    shut_down: bool,
}

impl ToolRegistry {
    pub fn new(connector: Box<dyn ProviderConnector>) -> Self {
        Self {
            connector,
            providers: HashMap::new(),
            order: Vec::new(),
            tools: Vec::new(),
            shut_down: false,
        }
    }

    /// Connect every configured provider. A failure is logged and skipped; the
    /// rest are still attempted. Returns what happened so the caller can decide
    /// whether zero connections means "tools disabled".
    pub async fn connect(&mut self, specs: &[ProviderLaunchSpec]) -> ConnectReport {
        let mut report = ConnectReport {
            attempted: specs.len(),
            ..Default::default()
        };

        if specs.is_empty() {
            info!("No MCP servers configured");
            return report;
        }

        info!(count = specs.len(), "Connecting to MCP servers");

        for spec in specs {
            if self.shut_down {
                warn!(server = %spec.id, "Registry already shut down, not connecting");
                break;
            }
            match self.connector.connect(spec).await {
                Ok(provider) => {
                    self.register(provider);
                    report.connected.push(spec.id.clone());
                }
                Err(e) => {
                    warn!(server = %spec.id, error = %e, "Failed to connect to MCP server");
                    report.failures.push(e);
                }
            }
        }

        info!(
            connected = report.connected_count(),
            attempted = report.attempted,
            tool_count = self.tools.len(),
            "MCP connect phase complete"
        );
        report
    }

    /// Add a connected provider and its tools. On a name collision the later
    /// provider wins and replaces the earlier descriptor in place.
    fn register(&mut self, provider: Box<dyn ToolProvider>) {
        let provider_id = provider.id().to_string();

        for descriptor in provider.tools() {
            match self
                .tools
                .iter_mut()
                .find(|t| t.descriptor.name == descriptor.name)
            {
                Some(existing) => {
                    warn!(
                        tool = %descriptor.name,
                        previous = %existing.provider,
                        replacement = %provider_id,
                        "Tool name collision, later provider wins"
                    );
                    existing.descriptor = descriptor.clone();
                    existing.provider = provider_id.clone();
                }
                None => self.tools.push(RegisteredTool {
                    descriptor: descriptor.clone(),
                    provider: provider_id.clone(),
                }),
            }
        }

        // Re-registering an id replaces the old session; it stays in `order` once
        if self.providers.insert(provider_id.clone(), provider).is_none() {
            self.order.push(provider_id);
        }
    }

    /// All tools in the completion API's function-calling shape
    pub fn list_available_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.descriptor.to_tool()).collect()
    }

    /// Advertised tools, `None` when there are none (tools are then omitted from requests)
    pub fn tools_for_request(&self) -> Option<Vec<Tool>> {
        if self.has_tools() {
            Some(self.list_available_tools())
        } else {
            None
        }
    }

    pub fn has_tools(&self) -> bool {
        !self.shut_down && !self.tools.is_empty()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.descriptor.name.as_str()).collect()
    }

    /// Route a call to the provider that owns `tool_name`
    pub async fn invoke(
        &self,
        tool_name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutcome, ToolError> {
        let owner = self
            .tools
            .iter()
            .find(|t| t.descriptor.name == tool_name)
            .map(|t| t.provider.as_str())
            .ok_or_else(|| ToolError::NotFound(tool_name.to_string()))?;

        let provider = self
            .providers
            .get(owner)
            .ok_or_else(|| ToolError::ProviderUnavailable {
                provider: owner.to_string(),
                tool: tool_name.to_string(),
            })?;

        debug!(server = %owner, tool = %tool_name, "Invoking tool");
        provider
            .call_tool(tool_name, arguments)
            .await
            .map_err(|reason| ToolError::Invocation {
                tool: tool_name.to_string(),
                reason,
            })
    }

    /// Close every provider session. Safe after a partial connect and safe to
    /// call more than once; only the first call does anything.
    pub async fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for id in std::mem::take(&mut self.order) {
            if let Some(provider) = self.providers.remove(&id) {
                provider.close().await;
            }
        }
        info!("MCP connections closed");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}
