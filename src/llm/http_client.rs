// src/llm/http_client.rs
// HTTP transport for chat completions. Single attempt per request: any
// failure aborts the debate, so there is no retry loop here.

use crate::error::LlmError;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Default request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

pub struct LlmHttpClient {
    client: Client,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl LlmHttpClient {
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            request_timeout,
            connect_timeout,
        }
    }

    /// POST a JSON body with Bearer auth and return the response body text.
    /// Non-2xx statuses become `LlmError::Api` carrying the body.
    pub async fn post_json(
        &self,
        request_id: &str,
        url: &str,
        api_key: &str,
        body: String,
    ) -> Result<String, LlmError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(
                request_id = %request_id,
                status = %status,
                error = %error_body,
                "Completion API returned an error"
            );
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: error_body,
            });
        }

        Ok(response.text().await?)
    }
}

impl Default for LlmHttpClient {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }
}
