//! The closed set of model providers.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Vendor (or protocol family) serving a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTag {
    /// `OpenAI` chat completions.
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
    /// `DeepSeek`, OpenAI-compatible.
    DeepSeek,
    /// Groq, OpenAI-compatible.
    Groq,
    /// Local Ollama server, OpenAI-compatible, no secret.
    Ollama,
    /// Any endpoint speaking the OpenAI chat-completion schema, found by discovery.
    Http,
}

impl ProviderTag {
    /// Every tag, in display order.
    pub const ALL: [Self; 6] = [
        Self::OpenAi,
        Self::Anthropic,
        Self::DeepSeek,
        Self::Groq,
        Self::Ollama,
        Self::Http,
    ];

    /// Lower-case name used in configuration and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::DeepSeek => "deepseek",
            Self::Groq => "groq",
            Self::Ollama => "ollama",
            Self::Http => "http",
        }
    }

    /// Endpoint used when a model config does not carry its own base URL.
    ///
    /// HTTP models have no default; their endpoint always comes from discovery.
    #[must_use]
    pub const fn default_base_url(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("https://api.openai.com/v1"),
            Self::Anthropic => Some("https://api.anthropic.com"),
            Self::DeepSeek => Some("https://api.deepseek.com"),
            Self::Groq => Some("https://api.groq.com/openai/v1"),
            Self::Ollama => Some("http://localhost:11434"),
            Self::Http => None,
        }
    }

    /// Whether models of this provider need a secret to be usable.
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`ProviderTag`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderTag {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}
