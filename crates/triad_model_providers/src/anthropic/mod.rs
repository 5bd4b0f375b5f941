//! Anthropic provider backend.
//!
//! Uses the Anthropic messages API.
//!
//! ```no_run
//! use triad_model_providers::anthropic::AnthropicProvider;
//! use triad_models::llm::Llm;
//! use std::sync::Arc;
//!
//! let provider = AnthropicProvider::new("sk-ant-...");
//! let llm = Llm::new(Arc::new(provider), "claude-3-haiku-20240307");
//! ```

mod client;
mod provider;
mod types;

pub use provider::AnthropicProvider;
