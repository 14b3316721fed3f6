// src/llm/client.rs
// OpenAI-compatible chat completion client (OpenAI, OpenRouter, custom endpoints)

use crate::config::DebaterConfig;
use crate::error::LlmError;
use crate::llm::http_client::LlmHttpClient;
use crate::llm::provider::ChatClient;
use crate::llm::{ChatRequest, ChatResult, Message, Tool, logging, parse_chat_response};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{Span, debug, info, instrument};
use uuid::Uuid;

/// Chat completion client bound to one model and one set of sampling parameters
pub struct CompletionClient {
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    http: LlmHttpClient,
}

impl CompletionClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            url: Self::completions_url(base_url),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            max_tokens,
            http: LlmHttpClient::default(),
        }
    }

    /// Build a client from a resolved debater configuration
    pub fn from_config(config: &DebaterConfig) -> Self {
        Self::new(
            config.base_url(),
            config.credential.clone(),
            config.model_id.clone(),
            config.temperature,
            config.max_output_tokens,
        )
    }

    fn completions_url(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self, messages, tools), fields(request_id, model = %self.model, message_count = messages.len()))]
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResult, LlmError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            message_count = messages.len(),
            tool_count = tools.as_ref().map(|t| t.len()).unwrap_or(0),
            model = %self.model,
            "Starting chat request"
        );

        let request = ChatRequest::new(&self.model, messages)
            .with_tools(tools)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let body = serde_json::to_string(&request)?;
        debug!(request_id = %request_id, "Chat request: {}", body);

        let response_body = self
            .http
            .post_json(&request_id, &self.url, &self.api_key, body)
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let result = parse_chat_response(&response_body, &request_id, duration_ms)?;

        if let Some(ref u) = result.usage {
            logging::log_usage(&request_id, &self.model, u);
        }
        if let Some(ref tcs) = result.tool_calls {
            logging::log_tool_calls(&request_id, &self.model, tcs);
        }
        logging::log_completion(
            &request_id,
            &self.model,
            duration_ms,
            result.content.as_ref().map(|c| c.len()).unwrap_or(0),
            result.requested_tools().len(),
        );

        Ok(result)
    }
}

#[async_trait]
impl ChatClient for CompletionClient {
    async fn chat(
        &self,
        messages: Vec<Message>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResult, LlmError> {
        self.chat(messages, tools).await
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}
