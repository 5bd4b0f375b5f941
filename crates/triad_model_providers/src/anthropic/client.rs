//! Anthropic API client.

use super::types::{CreateMessageRequest, MessageResponse};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use triad_models::llm::GenerationError;

/// Default endpoint for the Anthropic API.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";

/// HTTP client for the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a new client.
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sends a create message request to the Anthropic API.
    pub async fn create_message(
        &self,
        request: &CreateMessageRequest,
    ) -> Result<MessageResponse, GenerationError> {
        let url = format!("{}/v1/messages", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).map_err(|err| {
                GenerationError::InvalidRequest(format!("invalid API key header: {err}"))
            })?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|err| GenerationError::Http(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GenerationError::Http(err.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Provider {
                status: Some(status.as_u16()),
                message: body,
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            GenerationError::InvalidResponse(format!(
                "Failed to parse response: {err}\nBody: {body}"
            ))
        })
    }
}

impl core::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
