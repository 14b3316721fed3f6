// src/mcp/types.rs
// Tool descriptors and invocation results

use super::content::ToolOutput;
use crate::error::ToolError;
use crate::llm::{Tool, ToolCall};
use serde_json::{Map, Value, json};

/// A tool discovered on a provider. Immutable once discovered.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema of the accepted arguments
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Convert to the completion API's function-calling shape. Only `properties`
    /// and `required` are carried over; the top level is always an object.
    pub fn to_tool(&self) -> Tool {
        let properties = self
            .input_schema
            .get("properties")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let required = self
            .input_schema
            .get("required")
            .cloned()
            .unwrap_or_else(|| json!([]));

        Tool::function(
            &self.name,
            &self.description,
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        )
    }
}

/// What a provider returned for one call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub output: ToolOutput,
    /// Provider flagged the call as failed (output then holds the error text)
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn ok(output: ToolOutput) -> Self {
        Self {
            output,
            is_error: false,
        }
    }

    pub fn error(output: ToolOutput) -> Self {
        Self {
            output,
            is_error: true,
        }
    }
}

/// One result per tool request, correlated by `call_id`
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationResult {
    pub call_id: String,
    pub tool_name: String,
    /// Text placed in the tool-result message
    pub content: String,
    pub error: Option<String>,
    /// Raw output, absent when the call never reached a provider
    pub output: Option<ToolOutput>,
}

impl ToolInvocationResult {
    pub fn from_outcome(call: &ToolCall, outcome: ToolOutcome) -> Self {
        let text = outcome.output.flatten();
        let (content, error) = if outcome.is_error {
            (format!("Error: {}", text), Some(text))
        } else {
            (text, None)
        };
        Self {
            call_id: call.id.clone(),
            tool_name: call.function.name.clone(),
            content,
            error,
            output: Some(outcome.output),
        }
    }

    pub fn from_error(call: &ToolCall, err: &ToolError) -> Self {
        let message = err.to_string();
        Self {
            call_id: call.id.clone(),
            tool_name: call.function.name.clone(),
            content: format!("Error: {}", message),
            error: Some(message),
            output: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_tool_shape() {
        let descriptor = ToolDescriptor::new(
            "search",
            "Web search",
            json!({
                "type": "object",
                "$schema": "http://json-schema.org/draft-07/schema#",
                "properties": {"q": {"type": "string"}},
                "required": ["q"]
            }),
        );
        let value = serde_json::to_value(descriptor.to_tool()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "function",
                "function": {
                    "name": "search",
                    "description": "Web search",
                    "parameters": {
                        "type": "object",
                        "properties": {"q": {"type": "string"}},
                        "required": ["q"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_to_tool_fills_missing_schema_parts() {
        let descriptor = ToolDescriptor::new("now", "", json!({"type": "object"}));
        let tool = descriptor.to_tool();
        assert_eq!(tool.function.parameters["properties"], json!({}));
        assert_eq!(tool.function.parameters["required"], json!([]));
    }

    #[test]
    fn test_result_from_outcome() {
        let call = ToolCall::new("call_9", "search", "{}");
        let result =
            ToolInvocationResult::from_outcome(&call, ToolOutcome::ok(ToolOutput::Text("hit".into())));
        assert_eq!(result.call_id, "call_9");
        assert_eq!(result.tool_name, "search");
        assert_eq!(result.content, "hit");
        assert!(!result.is_error());
    }

    #[test]
    fn test_result_from_provider_error_outcome() {
        let call = ToolCall::new("call_1", "search", "{}");
        let result = ToolInvocationResult::from_outcome(
            &call,
            ToolOutcome::error(ToolOutput::Text("quota exceeded".into())),
        );
        assert_eq!(result.content, "Error: quota exceeded");
        assert_eq!(result.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_result_from_tool_error() {
        let call = ToolCall::new("call_2", "missing", "{}");
        let result =
            ToolInvocationResult::from_error(&call, &ToolError::NotFound("missing".into()));
        assert!(result.content.starts_with("Error: "));
        assert!(result.content.contains("missing"));
        assert!(result.output.is_none());
        assert!(result.is_error());
    }
}
