// src/debate/generator.rs
// One debater turn: request, optional single round of tool calls, finalize

use super::Debater;
use crate::error::{LlmError, ToolError};
use crate::llm::{ChatClient, ChatResult, Message, Tool, ToolCall};
use crate::mcp::{ToolInvocationResult, ToolRegistry};
use crate::transcript::DebateObserver;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a turn did not produce an answer
#[derive(Debug)]
pub enum TurnError {
    Generation(LlmError),
    Interrupted,
}

/// Result of a completed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub answer: String,
    /// One entry per tool request, in request order
    pub tool_results: Vec<ToolInvocationResult>,
    /// Whether a finalize call was needed
    pub finalized: bool,
}

/// Drives turns against a shared registry, observing cancellation
pub struct ResponseGenerator<'a> {
    registry: &'a ToolRegistry,
    cancel: &'a CancellationToken,
}

impl<'a> ResponseGenerator<'a> {
    pub fn new(registry: &'a ToolRegistry, cancel: &'a CancellationToken) -> Self {
        Self { registry, cancel }
    }

    /// Run one turn for `debater` answering `incoming`. On success the incoming
    /// argument and the final answer are appended to the debater's history;
    /// on failure the history is left untouched.
    pub async fn respond(
        &self,
        debater: &mut Debater,
        incoming: &str,
        observer: &mut dyn DebateObserver,
    ) -> Result<TurnOutcome, TurnError> {
        if self.cancel.is_cancelled() {
            return Err(TurnError::Interrupted);
        }

        let mut buffer = debater.compose(incoming);
        let tools = self.registry.tools_for_request();
        debug!(
            debater = %debater.name(),
            message_count = buffer.len(),
            tool_count = tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "Composed turn request"
        );

        let first = self.request(debater.client(), buffer.clone(), tools).await?;

        if first.requested_tools().is_empty() {
            let answer = first.content.unwrap_or_default();
            debater.record_exchange(incoming, &answer);
            return Ok(TurnOutcome {
                answer,
                tool_results: Vec::new(),
                finalized: false,
            });
        }

        let calls = first.requested_tools().to_vec();
        info!(
            debater = %debater.name(),
            tool_calls = calls.len(),
            "Model requested tools"
        );
        buffer.push(Message::assistant_tool_calls(first.content.clone(), calls.clone()));

        let mut tool_results = Vec::with_capacity(calls.len());
        for call in &calls {
            if self.cancel.is_cancelled() {
                return Err(TurnError::Interrupted);
            }
            let result = self.execute(call).await?;
            observer.tool_invoked(debater.name(), call, &result);
            buffer.push(Message::tool_result(&result.call_id, &result.content));
            tool_results.push(result);
        }

        let last = self.request(debater.client(), buffer, None).await?;
        let answer = final_text(last);

        debater.record_exchange(incoming, &answer);
        Ok(TurnOutcome {
            answer,
            tool_results,
            finalized: true,
        })
    }

    /// One completion call, abandoned if the session is cancelled meanwhile
    async fn request(
        &self,
        client: &dyn ChatClient,
        messages: Vec<Message>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResult, TurnError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TurnError::Interrupted),
            result = client.chat(messages, tools) => result.map_err(TurnError::Generation),
        }
    }

    /// Execute one tool request. Every failure becomes data in the result;
    /// only cancellation escapes.
    async fn execute(&self, call: &ToolCall) -> Result<ToolInvocationResult, TurnError> {
        let name = call.function.name.as_str();

        let arguments = match parse_arguments(call) {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = %name, call_id = %call.id, error = %e, "Unusable tool arguments");
                return Ok(ToolInvocationResult::from_error(call, &e));
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(TurnError::Interrupted),
            outcome = self.registry.invoke(name, arguments) => outcome,
        };

        Ok(match outcome {
            Ok(outcome) => {
                if outcome.is_error {
                    warn!(tool = %name, call_id = %call.id, "Tool reported an error");
                }
                ToolInvocationResult::from_outcome(call, outcome)
            }
            Err(e) => {
                warn!(tool = %name, call_id = %call.id, error = %e, "Tool invocation failed");
                ToolInvocationResult::from_error(call, &e)
            }
        })
    }
}

/// Decode the JSON-encoded argument string into an object. An empty string or
/// `null` means no arguments.
fn parse_arguments(call: &ToolCall) -> Result<Map<String, Value>, ToolError> {
    let raw = call.function.arguments.trim();
    if raw.is_empty() {
        return Ok(Map::new());
    }
    let invalid = |reason: String| ToolError::InvalidArguments {
        tool: call.function.name.clone(),
        reason,
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(invalid(format!("expected a JSON object, got {}", other))),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Answer text of the finalize reply. Further tool requests are not executed.
fn final_text(reply: ChatResult) -> String {
    if !reply.requested_tools().is_empty() {
        warn!(
            tool_calls = reply.requested_tools().len(),
            "Finalize reply requested more tools; ignoring them"
        );
    }
    reply.content.unwrap_or_default()
}
