//! LLM text generation.
//!
//! Provider-agnostic request and response types, the [`LlmProvider`] trait
//! implemented by provider clients, and the [`Llm`] handle agents talk to.

mod error;
mod model;
mod provider;
mod types;

pub use error::GenerationError;
pub use model::Llm;
pub use provider::LlmProvider;
pub use types::{AssistantBlock, GenerationRequest, GenerationResponse, Message, Usage};
