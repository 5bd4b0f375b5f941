//! The [`LlmProvider`] trait for LLM model providers.

use super::error::GenerationError;
use super::types::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;

/// Trait implemented by LLM providers for text generation.
///
/// Provider clients implement this trait; agents reach it through an
/// [`Llm`](super::Llm) handle.
#[async_trait]
pub trait LlmProvider: Send + Sync + 'static {
    /// Sends a generation request to the provider.
    ///
    /// # Arguments
    ///
    /// * `model` - The provider-side model id on which to perform generation
    /// * `request` - The generation request
    async fn generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}
