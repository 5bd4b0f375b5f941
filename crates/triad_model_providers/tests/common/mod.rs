//! Shared test helpers for provider integration tests.

use std::future::Future;
use std::sync::Once;

use triad_models::llm::{GenerationRequest, Llm, Message};

static INIT: Once = Once::new();

/// Initialize environment variables from `.env` file (once).
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// Extension trait for testing LLM providers.
pub trait LlmTestExt {
    /// Tests basic generation - expects the model to say "hello".
    fn test_basic_generation(&self) -> impl Future<Output = ()> + Send;

    /// Tests generation with a system prompt.
    fn test_system_prompt(&self) -> impl Future<Output = ()> + Send;

    /// Tests that earlier turns are visible to the model.
    fn test_history(&self) -> impl Future<Output = ()> + Send;

    /// Tests that an invalid model returns an error.
    fn test_invalid_model_error(&self) -> impl Future<Output = ()> + Send;
}

impl LlmTestExt for Llm {
    async fn test_basic_generation(&self) {
        let request = GenerationRequest::new("Say 'hello' and nothing else.");

        let response = self
            .generate(request)
            .await
            .expect("generation should succeed");

        let text = response.text().to_lowercase();
        assert!(
            text.contains("hello"),
            "response should contain 'hello': {text}"
        );
    }

    async fn test_system_prompt(&self) {
        let request = GenerationRequest::with_system(
            "You are a pirate. Always respond in pirate speak.",
            "Say hello",
        );

        let response = self
            .generate(request)
            .await
            .expect("generation should succeed");

        assert!(!response.text().is_empty(), "response should not be empty");
    }

    async fn test_history(&self) {
        let request = GenerationRequest::new("What is my name? Reply with the name only.").history(
            vec![
                Message::user("My name is Ferris."),
                Message::assistant("Nice to meet you, Ferris."),
            ],
        );

        let response = self
            .generate(request)
            .await
            .expect("generation should succeed");

        let text = response.text().to_lowercase();
        assert!(text.contains("ferris"), "model should recall the name: {text}");
    }

    async fn test_invalid_model_error(&self) {
        let request = GenerationRequest::new("Hello");
        let result = self.generate(request).await;

        assert!(result.is_err(), "should fail with invalid model");
    }
}
