//! OpenAI-compatible provider backend.
//!
//! Speaks the Chat Completions API, which `OpenAI`, `DeepSeek`, Groq and
//! Ollama all expose. The endpoint is `<base_url>/chat/completions` unless the
//! base URL already ends in `/chat/completions`.
//!
//! ```no_run
//! use triad_model_providers::openai::OpenAiProvider;
//!
//! let groq = OpenAiProvider::new("gsk-...").with_base_url("https://api.groq.com/openai/v1");
//! assert_eq!(groq.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
//! ```

mod provider;
pub(crate) mod types;

pub use provider::{OpenAiProvider, chat_completions_url};
