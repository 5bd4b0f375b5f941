//! Live tests against real provider APIs.
//!
//! These tests are ignored by default because they require:
//! - the provider's API key environment variable (or in `.env` file)
//! - Network access to the provider API
//! - May incur API costs
//!
//! To run these tests:
//! ```sh
//! cargo test -p triad_model_providers --test live_providers -- --ignored
//! ```

mod common;

use common::{LlmTestExt, init_env};
use std::sync::Arc;
use triad_model_providers::{ClientOptions, ModelFactory, OpenAiProvider};
use triad_models::llm::Llm;
use triad_models::{Environment, ModelManager};

fn get_llm(key: &str) -> Llm {
    init_env();

    let manager = ModelManager::new(&Environment::from_process());
    ModelFactory::new(manager, ClientOptions::default())
        .create(key)
        .expect("model should be available")
}

#[tokio::test]
#[ignore = "requires ANTHROPIC_API_KEY"]
async fn anthropic_basic_generation() {
    get_llm("claude-3-haiku").test_basic_generation().await;
}

#[tokio::test]
#[ignore = "requires ANTHROPIC_API_KEY"]
async fn anthropic_history() {
    get_llm("claude-3-haiku").test_history().await;
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY"]
async fn openai_basic_generation() {
    get_llm("gpt-3.5-turbo").test_basic_generation().await;
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY"]
async fn openai_system_prompt() {
    get_llm("gpt-4o").test_system_prompt().await;
}

#[tokio::test]
#[ignore = "requires DEEPSEEK_API_KEY"]
async fn deepseek_basic_generation() {
    get_llm("deepseek-chat").test_basic_generation().await;
}

#[tokio::test]
#[ignore = "requires GROQ_API_KEY"]
async fn groq_history() {
    get_llm("llama3-70b").test_history().await;
}

#[tokio::test]
#[ignore = "requires HTTP_DEEPSEEK_R1_API_KEY_HUAWEI"]
async fn huawei_http_basic_generation() {
    get_llm("http-deepseek-r1-huawei").test_basic_generation().await;
}

#[tokio::test]
#[ignore = "requires OPENAI_API_KEY"]
async fn invalid_model_error() {
    init_env();
    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY should be set");
    Llm::new(Arc::new(OpenAiProvider::new(api_key)), "not-a-real-model")
        .test_invalid_model_error()
        .await;
}
