// src/llm/response.rs
// OpenAI-compatible chat response parsing

use super::{ChatResult, FunctionCall, ToolCall, Usage};
use crate::error::LlmError;
use serde::Deserialize;

/// Non-streaming chat response (OpenAI-compatible format)
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ResponseChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
pub struct ResponseFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".into()
}

/// Parse an OpenAI-compatible chat response into a ChatResult.
/// An empty `tool_calls` array is normalized to `None`; a response without
/// any choice is a parse error.
pub fn parse_chat_response(
    response_body: &str,
    request_id: &str,
    duration_ms: u64,
) -> Result<ChatResult, LlmError> {
    let data: ChatResponse =
        serde_json::from_str(response_body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let choice = data
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Parse("response has no choices".into()))?;

    let msg = choice.message;
    let tool_calls: Option<Vec<ToolCall>> = msg
        .tool_calls
        .filter(|calls| !calls.is_empty())
        .map(|calls| {
            calls
                .into_iter()
                .map(|tc| ToolCall {
                    id: tc.id,
                    call_type: tc.call_type,
                    function: FunctionCall {
                        name: tc.function.name,
                        arguments: tc.function.arguments,
                    },
                })
                .collect()
        });

    Ok(ChatResult {
        request_id: request_id.to_owned(),
        content: msg.content,
        tool_calls,
        usage: data.usage,
        duration_ms,
    })
}
