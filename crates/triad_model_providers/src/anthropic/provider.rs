//! Anthropic [`LlmProvider`] implementation.

use super::client::{AnthropicClient, DEFAULT_BASE_URL};
use super::types::{ContentBlock, CreateMessageRequest, MessageParam, MessageResponse, Role};
use async_trait::async_trait;
use triad_models::config::DEFAULT_MAX_TOKENS;
use triad_models::llm::{
    AssistantBlock, GenerationError, GenerationRequest, GenerationResponse, LlmProvider, Message,
    Usage,
};

/// Anthropic [`LlmProvider`] implementation.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Creates a provider talking to the public Anthropic endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, DEFAULT_BASE_URL)
    }

    /// Creates a provider on a preconfigured HTTP client and endpoint.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: AnthropicClient::new(client, api_key.into(), base_url.into()),
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let anthropic_request = convert_request(model, request)?;

        let response = self.client.create_message(&anthropic_request).await?;

        Ok(convert_response(response))
    }
}

fn convert_request(
    model: &str,
    request: GenerationRequest,
) -> Result<CreateMessageRequest, GenerationError> {
    if request.messages.is_empty() {
        return Err(GenerationError::InvalidRequest(
            "at least one message is required".to_string(),
        ));
    }

    let messages = request
        .messages
        .into_iter()
        .map(|message| match message {
            Message::User { content } => MessageParam {
                role: Role::User,
                content,
            },
            Message::Assistant { content } => MessageParam {
                role: Role::Assistant,
                content,
            },
        })
        .collect();

    Ok(CreateMessageRequest {
        model: model.to_string(),
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        messages,
        system: request.system,
        temperature: request.temperature,
    })
}

fn convert_response(response: MessageResponse) -> GenerationResponse {
    let content = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(AssistantBlock::Text(text)),
            ContentBlock::Thinking { thinking } => Some(AssistantBlock::Reasoning(thinking)),
            ContentBlock::Other => None,
        })
        .collect();

    GenerationResponse {
        content,
        usage: Usage {
            input_tokens: Some(response.usage.input_tokens),
            output_tokens: Some(response.usage.output_tokens),
            total_tokens: Some(response.usage.input_tokens + response.usage.output_tokens),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use triad_models::llm::Llm;
    use std::sync::Arc;

    #[test]
    fn request_carries_sampling_settings() {
        let request = GenerationRequest::with_system("be brief", "hi")
            .temperature(0.3)
            .max_tokens(128);
        let converted = convert_request("claude-3-haiku-20240307", request).expect("convert");

        let body = serde_json::to_value(&converted).expect("serialize");
        assert_eq!(body["model"], "claude-3-haiku-20240307");
        assert_eq!(body["max_tokens"], 128);
        assert_eq!(body["system"], "be brief");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[test]
    fn empty_request_is_rejected() {
        let request = GenerationRequest {
            system: None,
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        };
        assert!(matches!(
            convert_request("m", request),
            Err(GenerationError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn sends_messages_request_with_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-ant-test")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-3-haiku-20240307",
                "max_tokens": 4096,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "msg_1",
                    "type": "message",
                    "role": "assistant",
                    "model": "claude-3-haiku-20240307",
                    "content": [
                        {"type": "thinking", "thinking": "hmm", "signature": "s"},
                        {"type": "text", "text": "Hello!"},
                        {"type": "tool_use", "id": "t", "name": "x", "input": {}}
                    ],
                    "stop_reason": "end_turn",
                    "usage": {"input_tokens": 5, "output_tokens": 2}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider =
            AnthropicProvider::with_client(reqwest::Client::new(), "sk-ant-test", server.url());
        let llm = Llm::new(Arc::new(provider), "claude-3-haiku-20240307").with_max_tokens(4096);
        let response = llm
            .generate(GenerationRequest::new("hi"))
            .await
            .expect("generation should succeed");

        mock.assert_async().await;
        assert_eq!(response.text(), "Hello!");
        assert_eq!(response.reasoning().as_deref(), Some("hmm"));
        assert_eq!(response.usage.total_tokens, Some(7));
    }

    #[tokio::test]
    async fn non_success_status_is_a_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body(r#"{"type":"error","error":{"type":"authentication_error"}}"#)
            .create_async()
            .await;

        let provider = AnthropicProvider::with_client(reqwest::Client::new(), "bad", server.url());
        let err = provider
            .generate("claude-3-opus-20240229", GenerationRequest::new("hi"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn debug_redacts_key() {
        let provider = AnthropicProvider::new("sk-ant-secret");
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("sk-ant-secret"));
    }
}
