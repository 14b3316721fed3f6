// src/lib.rs
// MCP Debate - two chat-completion debaters with MCP tool calling

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod debate;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod transcript;

pub use config::{DebateSettings, DebaterConfig};
pub use debate::{DebateRunner, DebateSummary, Debater};
pub use error::{DebateError, Result};
pub use mcp::{McpConnector, ToolRegistry};
pub use transcript::{ConsoleObserver, DebateObserver, ObserverSet};
