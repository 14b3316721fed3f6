// src/mcp/client.rs
// MCP stdio client: spawns provider processes and speaks MCP over their stdio

use super::config::ProviderLaunchSpec;
use super::content::{ContentBlock, ToolOutput};
use super::provider::{ProviderConnector, ToolProvider};
use super::types::{ToolDescriptor, ToolOutcome};
use crate::error::ConnectError;
use async_trait::async_trait;
use rmcp::model::{CallToolRequestParams, CallToolResult, ClientInfo, Content};
use rmcp::service::{Peer, RunningService};
use rmcp::transport::child_process::TokioChildProcess;
use rmcp::{RoleClient, serve_client};
use serde_json::{Map, Value};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Connector that launches each provider as a child process
#[derive(Debug, Default, Clone, Copy)]
pub struct McpConnector;

impl McpConnector {
    fn client_info() -> ClientInfo {
        ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: Default::default(),
            client_info: rmcp::model::Implementation {
                name: "mcp-debate".into(),
                title: Some("MCP Debate Client".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
        }
    }
}

#[async_trait]
impl ProviderConnector for McpConnector {
    async fn connect(&self, spec: &ProviderLaunchSpec) -> Result<Box<dyn ToolProvider>, ConnectError> {
        let env_keys: Vec<&str> = spec.env.keys().map(|k| k.as_str()).collect();
        info!(
            server = %spec.id,
            command = %spec.command,
            args = ?spec.args,
            env_vars = ?env_keys,
            "Spawning MCP server child process"
        );

        let mut cmd = Command::new(&spec.command);
        cmd.args(&spec.args);
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null()); // Server stderr would interleave with the transcript

        let transport = TokioChildProcess::new(cmd).map_err(|e| ConnectError::Spawn {
            provider: spec.id.clone(),
            reason: e.to_string(),
        })?;

        let service = serve_client(Self::client_info(), transport)
            .await
            .map_err(|e| ConnectError::Handshake {
                provider: spec.id.clone(),
                reason: e.to_string(),
            })?;

        let peer = service.peer().clone();
        let listed = match peer.list_all_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                // Session is up but unusable; tear it down before reporting
                let _ = service.cancel().await;
                return Err(ConnectError::ListTools {
                    provider: spec.id.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let tools: Vec<ToolDescriptor> = listed
            .iter()
            .map(|t| {
                ToolDescriptor::new(
                    t.name.to_string(),
                    t.description.as_deref().unwrap_or("").to_string(),
                    Value::Object(t.input_schema.as_ref().clone()),
                )
            })
            .collect();

        info!(
            server = %spec.id,
            tool_count = tools.len(),
            "Connected to MCP server"
        );

        Ok(Box::new(McpSession {
            id: spec.id.clone(),
            peer,
            tools,
            service,
        }))
    }
}

/// A live MCP session with one provider process
pub struct McpSession {
    id: String,
    peer: Peer<RoleClient>,
    tools: Vec<ToolDescriptor>,
    /// Dropping or cancelling this shuts down the transport and kills the child
    service: RunningService<RoleClient, ClientInfo>,
}

#[async_trait]
impl ToolProvider for McpSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<ToolOutcome, String> {
        debug!(server = %self.id, tool = name, "Calling MCP tool");

        let result: CallToolResult = self
            .peer
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_string().into(),
                arguments: Some(arguments),
                task: None,
            })
            .await
            .map_err(|e| format!("MCP tool call failed: {}", e))?;

        let is_error = result.is_error.unwrap_or(false);
        let output = convert_result(result.content, result.structured_content);
        Ok(if is_error {
            ToolOutcome::error(output)
        } else {
            ToolOutcome::ok(output)
        })
    }

    async fn close(self: Box<Self>) {
        info!(server = %self.id, "Disconnecting from MCP server");
        if let Err(e) = self.service.cancel().await {
            warn!(server = %self.id, error = %e, "MCP server did not shut down cleanly");
        }
    }
}

/// Map MCP content into the output union: one text block stays plain text,
/// anything else becomes an ordered block list; structured content is the fallback.
fn convert_result(content: Vec<Content>, structured: Option<Value>) -> ToolOutput {
    if content.is_empty() {
        return ToolOutput::Other(structured.unwrap_or(Value::Null));
    }

    let blocks: Vec<ContentBlock> = content
        .iter()
        .map(|c| match c.as_text() {
            Some(t) => ContentBlock::Text(t.text.clone()),
            None => ContentBlock::Opaque(serde_json::to_value(c).unwrap_or(Value::Null)),
        })
        .collect();

    if let [ContentBlock::Text(t)] = blocks.as_slice() {
        return ToolOutput::Text(t.clone());
    }
    ToolOutput::Blocks(blocks)
}
