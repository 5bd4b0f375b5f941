//! Core types for LLM generation requests and responses.

use serde::{Deserialize, Serialize};

// ─────────────────────
// Request / Response
// ─────────────────────

/// A generation request to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System prompt for the model.
    pub system: Option<String>,
    /// The messages to send to the model, oldest first.
    pub messages: Vec<Message>,
    /// Sampling temperature. Filled from the model config when unset.
    pub temperature: Option<f32>,
    /// Completion budget. Filled from the model config when unset.
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Creates a new generation request with a user message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triad_models::llm::GenerationRequest;
    ///
    /// let request = GenerationRequest::new("What's the weather like?");
    /// ```
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![Message::user(message)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Creates a new generation request with a system prompt and user message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triad_models::llm::GenerationRequest;
    ///
    /// let request = GenerationRequest::with_system(
    ///     "You are a helpful assistant",
    ///     "What's the weather like?"
    /// );
    /// ```
    #[must_use]
    pub fn with_system(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(message).system(system)
    }

    /// Sets the system prompt for the model.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Adds conversation history before the current message.
    ///
    /// The messages provided will be prepended to the existing messages.
    #[must_use]
    pub fn history(mut self, mut messages: Vec<Message>) -> Self {
        messages.append(&mut self.messages);
        self.messages = messages;
        self
    }

    /// Overrides the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Overrides the completion budget.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A generation response from a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated content blocks.
    pub content: Vec<AssistantBlock>,
    /// Token usage information.
    pub usage: Usage,
}

impl GenerationResponse {
    /// Creates a response holding one text block.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![AssistantBlock::Text(text.into())],
            usage: Usage::default(),
        }
    }

    /// Returns all text content blocks concatenated into a single string.
    ///
    /// Reasoning blocks are skipped. Returns an empty string if no text
    /// content is found.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                AssistantBlock::Text(text) => Some(text.as_str()),
                AssistantBlock::Reasoning(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Returns the reasoning trace, if the model produced one.
    #[must_use]
    pub fn reasoning(&self) -> Option<String> {
        let reasoning: Vec<_> = self
            .content
            .iter()
            .filter_map(|block| match block {
                AssistantBlock::Reasoning(text) => Some(text.as_str()),
                AssistantBlock::Text(_) => None,
            })
            .collect();
        (!reasoning.is_empty()).then(|| reasoning.join(""))
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the input.
    pub input_tokens: Option<u64>,
    /// Number of tokens in the output.
    pub output_tokens: Option<u64>,
    /// Total tokens (input + output).
    pub total_tokens: Option<u64>,
}

// ─────────────────────
// Messages
// ─────────────────────

/// An input (user) or output (assistant) message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// A message from the user.
    User {
        /// The message text.
        content: String,
    },
    /// A message from the assistant.
    Assistant {
        /// The message text.
        content: String,
    },
}

impl Message {
    /// Creates a user message with text content.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            content: text.into(),
        }
    }

    /// Creates an assistant message with text content.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            content: text.into(),
        }
    }

    /// The message text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::User { content } | Self::Assistant { content } => content,
        }
    }
}

// ─────────────────────
// Content Blocks
// ─────────────────────

/// Content that can appear in an assistant response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum AssistantBlock {
    /// Plain text content.
    Text(String),
    /// Model reasoning trace (e.g. `reasoning_content` from DeepSeek-R1).
    Reasoning(String),
}
