// src/mcp/provider.rs
// Seam between the registry and whatever actually executes tools

use super::config::ProviderLaunchSpec;
use super::types::{ToolDescriptor, ToolOutcome};
use crate::error::ConnectError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A connected tool provider session
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Provider identifier (the key in the provider config)
    fn id(&self) -> &str;

    /// Tools discovered when the session was established, in provider order
    fn tools(&self) -> &[ToolDescriptor];

    /// Execute one tool. `Err` means the call never produced a result (transport
    /// failure, protocol error); a tool that ran and failed returns `ToolOutcome::error`.
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Result<ToolOutcome, String>;

    /// Close the session and release the underlying process
    async fn close(self: Box<Self>);
}

/// Establishes provider sessions from launch specs
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    async fn connect(&self, spec: &ProviderLaunchSpec) -> Result<Box<dyn ToolProvider>, ConnectError>;
}
