//! OpenAI-compatible [`LlmProvider`] implementation.

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use triad_models::llm::{GenerationError, GenerationRequest, GenerationResponse, LlmProvider};

/// Default endpoint for the `OpenAI` API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const CHAT_COMPLETIONS: &str = "/chat/completions";

/// Resolves the chat-completions endpoint for `base_url`.
///
/// ```
/// use triad_model_providers::openai::chat_completions_url;
///
/// assert_eq!(chat_completions_url("https://api.deepseek.com"), "https://api.deepseek.com/chat/completions");
/// assert_eq!(chat_completions_url("http://h/v1/chat/completions"), "http://h/v1/chat/completions");
/// ```
#[must_use]
pub fn chat_completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with(CHAT_COMPLETIONS) {
        base.to_string()
    } else {
        format!("{base}{CHAT_COMPLETIONS}")
    }
}

/// OpenAI-compatible [`LlmProvider`] implementation.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    headers: HeaderMap,
}

impl OpenAiProvider {
    /// Creates a provider for the public `OpenAI` endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: chat_completions_url(DEFAULT_BASE_URL),
            headers: HeaderMap::new(),
        }
    }

    /// Points the provider at another OpenAI-compatible server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.endpoint = chat_completions_url(base_url.as_ref());
        self
    }

    /// Uses a preconfigured HTTP client (timeouts, proxies).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sends extra headers with every request.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// The resolved chat-completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl core::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let body = ChatCompletionRequest::from_generation(model, request)?;

        let mut headers = self.headers.clone();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|err| {
                GenerationError::InvalidRequest(format!("invalid API key header: {err}"))
            })?,
        );

        let response = self
            .client
            .post(&self.endpoint)
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
            return Err(GenerationError::Provider {
                status: Some(status.as_u16()),
                message: text,
                source: None,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text).map_err(|err| {
            GenerationError::InvalidResponse(format!(
                "Failed to parse response: {err}\nBody: {text}"
            ))
        })?;
        parsed.into_generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn completion(content: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn endpoint_resolution() {
        assert_eq!(
            OpenAiProvider::new("k").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            OpenAiProvider::new("k")
                .with_base_url("http://localhost:11434/v1/")
                .endpoint(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn posts_bearer_authenticated_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "temperature": 0.1,
                "messages": [{"role": "user", "content": "ping"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion("pong"))
            .create_async()
            .await;

        let provider = OpenAiProvider::new("sk-test").with_base_url(format!("{}/v1", server.url()));
        let response = provider
            .generate("gpt-4o", GenerationRequest::new("ping").temperature(0.1))
            .await
            .expect("generation should succeed");

        mock.assert_async().await;
        assert_eq!(response.text(), "pong");
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = OpenAiProvider::new("k").with_base_url(server.url());
        let err = provider
            .generate("m", GenerationRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn server_error_keeps_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let provider = OpenAiProvider::new("k").with_base_url(server.url());
        let err = provider
            .generate("m", GenerationRequest::new("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("boom"));
    }
}
