// src/mcp/mod.rs
// MCP tool providers: launch config, stdio sessions, and the tool registry

pub mod client;
pub mod config;
pub mod content;
pub mod provider;
pub mod registry;
pub mod types;

pub use client::McpConnector;
pub use config::{ProviderConfig, ProviderLaunchSpec};
pub use content::{ContentBlock, EMPTY_RESULT, ToolOutput};
pub use provider::{ProviderConnector, ToolProvider};
pub use registry::{ConnectReport, ToolRegistry};
pub use types::{ToolDescriptor, ToolInvocationResult, ToolOutcome};
