// src/mcp/content.rs
// Tool result shapes and their flattening into tool-result message text

use serde_json::Value;

/// Text used when a tool returns nothing
pub const EMPTY_RESULT: &str = "(empty result)";

/// One block of a multi-part tool result
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    /// Non-text content (image, resource, ...) kept as its JSON form
    Opaque(Value),
}

impl ContentBlock {
    fn flatten(&self) -> String {
        match self {
            ContentBlock::Text(t) => t.clone(),
            ContentBlock::Opaque(v) => v.to_string(),
        }
    }
}

/// Raw tool output as returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Blocks(Vec<ContentBlock>),
    Other(Value),
}

impl ToolOutput {
    /// Flatten to the single string placed in the tool-result message.
    /// Blocks are joined with newlines in order; empty output becomes `EMPTY_RESULT`.
    pub fn flatten(&self) -> String {
        let text = match self {
            ToolOutput::Text(t) => t.clone(),
            ToolOutput::Blocks(blocks) => blocks
                .iter()
                .map(ContentBlock::flatten)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            ToolOutput::Other(Value::Null) => String::new(),
            ToolOutput::Other(Value::String(s)) => s.clone(),
            ToolOutput::Other(v) => v.to_string(),
        };

        if text.trim().is_empty() {
            EMPTY_RESULT.to_string()
        } else {
            text
        }
    }

    /// Human-readable rendering for the tool-call log
    pub fn describe(&self) -> String {
        match self {
            ToolOutput::Text(t) => format!("  Content[0] (text):\n    {}\n", t),
            ToolOutput::Blocks(blocks) => {
                let mut out = String::new();
                for (i, block) in blocks.iter().enumerate() {
                    match block {
                        ContentBlock::Text(t) => {
                            out.push_str(&format!("  Content[{}] (text):\n    {}\n", i, t));
                        }
                        ContentBlock::Opaque(v) => {
                            let pretty =
                                serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
                            out.push_str(&format!("  Content[{}]:\n    {}\n", i, pretty));
                        }
                    }
                }
                if out.is_empty() {
                    out.push_str("  (no content)\n");
                }
                out
            }
            ToolOutput::Other(v) => {
                let pretty = serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
                format!("  {}\n", pretty)
            }
        }
    }
}
