// src/error.rs
// Error types for each fallible boundary: config, connect, tool, generation

use thiserror::Error;

/// Startup configuration problems. Always fatal, surfaced before any model call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} not found in environment variables")]
    MissingCredential { var: &'static str },

    #[error("unknown provider: {0} (expected 'openai' or 'openrouter')")]
    UnknownProvider(String),

    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("invalid config file {path}: {reason}")]
    InvalidFile { path: String, reason: String },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("malformed tool provider '{provider}': {reason}")]
    MalformedProvider { provider: String, reason: String },
}

/// A single tool provider failed to come up. Logged and skipped.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("failed to spawn '{provider}': {reason}")]
    Spawn { provider: String, reason: String },

    #[error("failed to initialize session with '{provider}': {reason}")]
    Handshake { provider: String, reason: String },

    #[error("failed to list tools from '{provider}': {reason}")]
    ListTools { provider: String, reason: String },
}

/// Per-invocation tool failure. Converted into tool-result text for the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Tool '{0}' not found in any connected server")]
    NotFound(String),

    #[error("Server '{provider}' not connected (tool '{tool}')")]
    ProviderUnavailable { provider: String, tool: String },

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Tool '{tool}' failed: {reason}")]
    Invocation { tool: String, reason: String },
}

/// Completion API failure. Never retried.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse chat response: {0}")]
    Parse(String),

    #[error("failed to serialize chat request: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Session-level outcome of the debate loop.
#[derive(Error, Debug)]
pub enum DebateError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("error generating response from {debater} in round {round}: {source}")]
    Generation {
        debater: String,
        round: usize,
        #[source]
        source: LlmError,
    },

    #[error("debate interrupted by user")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DebateError {
    /// Process exit code for this outcome. A user interrupt is a clean exit.
    pub fn exit_code(&self) -> u8 {
        match self {
            DebateError::Interrupted => 0,
            _ => 1,
        }
    }

    /// Round in which generation failed, if this is a generation failure
    pub fn failed_round(&self) -> Option<usize> {
        match self {
            DebateError::Generation { round, .. } => Some(*round),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DebateError>;
