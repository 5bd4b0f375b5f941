//! Chat Completions wire types.
//!
//! Shared by every OpenAI-compatible client, including the generic HTTP one.
//! See: <https://platform.openai.com/docs/api-reference/chat>

use serde::{Deserialize, Serialize};
use triad_models::llm::{
    AssistantBlock, GenerationError, GenerationRequest, GenerationResponse, Message, Usage,
};

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// The model to use.
    pub model: String,
    /// Conversation, system prompt first.
    pub messages: Vec<ChatMessage>,
    /// Temperature for sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Always `false`; streaming is not used.
    pub stream: bool,
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatCompletionRequest {
    /// Converts a provider-agnostic request.
    pub fn from_generation(
        model: &str,
        request: GenerationRequest,
    ) -> Result<Self, GenerationError> {
        if request.messages.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "at least one message is required".to_string(),
            ));
        }

        let system = request.system.map(|content| ChatMessage {
            role: ChatRole::System,
            content,
        });
        let messages = system
            .into_iter()
            .chain(request.messages.into_iter().map(|message| match message {
                Message::User { content } => ChatMessage {
                    role: ChatRole::User,
                    content,
                },
                Message::Assistant { content } => ChatMessage {
                    role: ChatRole::Assistant,
                    content,
                },
            }))
            .collect();

        Ok(Self {
            model: model.to_string(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Response body of a non-streaming completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion candidates; only the first is used.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// One completion candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ChoiceMessage,
}

/// Message inside a [`Choice`].
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text.
    #[serde(default)]
    pub content: Option<String>,
    /// Reasoning trace from DeepSeek-R1 style models.
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    /// Input tokens used.
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    /// Output tokens generated.
    #[serde(default)]
    pub completion_tokens: Option<u64>,
    /// Total tokens.
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

impl From<ChatUsage> for Usage {
    fn from(usage: ChatUsage) -> Self {
        Self {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

impl ChatCompletionResponse {
    /// Converts the first choice into a provider-agnostic response.
    pub fn into_generation(self) -> Result<GenerationResponse, GenerationError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            GenerationError::InvalidResponse("response contains no choices".to_string())
        })?;

        let mut content = Vec::new();
        if let Some(reasoning) = choice.message.reasoning_content.filter(|r| !r.is_empty()) {
            content.push(AssistantBlock::Reasoning(reasoning));
        }
        content.push(AssistantBlock::Text(
            choice.message.content.unwrap_or_default(),
        ));

        Ok(GenerationResponse {
            content,
            usage: self.usage.map(Usage::from).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn system_prompt_leads_the_conversation() {
        let request = GenerationRequest::with_system("sys", "now")
            .history(vec![Message::user("before"), Message::assistant("reply")]);
        let body = serde_json::to_value(
            ChatCompletionRequest::from_generation("deepseek-chat", request).expect("convert"),
        )
        .expect("serialize");

        let roles: Vec<_> = body["messages"]
            .as_array()
            .expect("messages")
            .iter()
            .map(|m| m["role"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(body["stream"], false);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn reasoning_content_becomes_reasoning_block() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "42", "reasoning_content": "think"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }))
        .expect("parse");

        let generation = response.into_generation().expect("convert");
        assert_eq!(generation.text(), "42");
        assert_eq!(generation.reasoning().as_deref(), Some("think"));
        assert_eq!(generation.usage.total_tokens, Some(4));
    }

    #[test]
    fn empty_choices_are_invalid() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).expect("parse");
        assert!(matches!(
            response.into_generation(),
            Err(GenerationError::InvalidResponse(_))
        ));
    }
}
