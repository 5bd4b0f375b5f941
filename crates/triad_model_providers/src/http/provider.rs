//! Generic HTTP [`LlmProvider`] implementation.

use crate::openai::types::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};
use triad_models::llm::{GenerationError, GenerationRequest, GenerationResponse, LlmProvider};

/// Client for an OpenAI-compatible endpoint at a fixed URL.
///
/// Response bodies are read leniently: `choices[0].message.content` first,
/// then a top-level `content` string, then the whole JSON document, and for
/// bodies that are not JSON at all, the raw text.
#[derive(Clone)]
pub struct HttpProvider {
    client: reqwest::Client,
    url: String,
    api_key: String,
    vendor: String,
    headers: HeaderMap,
}

impl HttpProvider {
    /// Creates a provider posting to `url` with a bearer token.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            vendor: "generic".to_string(),
            headers: HeaderMap::new(),
        }
    }

    /// Sets the vendor name used in logs.
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Uses a preconfigured HTTP client (timeouts, proxies).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sends extra headers with every request. They may override the defaults.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// The endpoint requests are posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The vendor serving the endpoint.
    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }
}

impl core::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("url", &self.url)
            .field("vendor", &self.vendor)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = ChatCompletionRequest::from_generation(model, request)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|err| {
                GenerationError::InvalidRequest(format!("invalid API key header: {err}"))
            })?,
        );
        headers.extend(self.headers.clone());

        debug!(url = %self.url, vendor = %self.vendor, model, "sending http model request");
        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|err| GenerationError::Http(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| GenerationError::Http(err.to_string()))?;

        if !status.is_success() {
            warn!(vendor = %self.vendor, status = status.as_u16(), "http model request failed");
            return Err(GenerationError::Provider {
                status: Some(status.as_u16()),
                message: text,
                source: None,
            });
        }

        parse_body(&text)
    }
}

fn parse_body(text: &str) -> Result<GenerationResponse, GenerationError> {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        debug!("http model returned a non-json body; using raw text");
        return Ok(GenerationResponse::from_text(text));
    };

    let has_choices = value
        .get("choices")
        .and_then(Value::as_array)
        .is_some_and(|choices| !choices.is_empty());
    if has_choices {
        let parsed: ChatCompletionResponse = serde_json::from_value(value)?;
        return parsed.into_generation();
    }

    let content = match value.get("content") {
        Some(Value::String(content)) => content.clone(),
        _ => value.to_string(),
    };
    Ok(GenerationResponse::from_text(content))
}
