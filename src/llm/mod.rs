// src/llm/mod.rs
// Chat completion API client

mod client;
mod http_client;
mod logging;
mod provider;
mod request;
mod response;
mod types;

pub use client::CompletionClient;
pub use http_client::LlmHttpClient;
pub use provider::{ChatClient, Provider};
pub use request::ChatRequest;
pub use response::parse_chat_response;
pub use types::{ChatResult, FunctionCall, FunctionDef, Message, Role, Tool, ToolCall, Usage};
