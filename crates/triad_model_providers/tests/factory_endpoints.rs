//! Checks that the factory wires each provider tag to the right endpoint and
//! authentication scheme, using a local mock server in place of the vendor.

use mockito::{Matcher, Server};
use serde_json::json;
use triad_model_providers::{ClientOptions, ModelFactory};
use triad_models::llm::GenerationRequest;
use triad_models::{ModelConfig, ModelManager, ModelRegistry, ProviderTag};

fn completion_body(text: &str) -> String {
    json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}],
        "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
    })
    .to_string()
}

fn factory_for(config: ModelConfig) -> ModelFactory {
    let registry = ModelRegistry::from_parts([config], Vec::new());
    ModelFactory::new(
        ModelManager::from_registry(registry),
        ClientOptions::default(),
    )
}

#[tokio::test]
async fn deepseek_uses_bearer_auth_and_config_base_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-ds")
        .match_body(Matcher::PartialJson(json!({
            "model": "deepseek-chat",
            "max_tokens": 4096
        })))
        .with_status(200)
        .with_body(completion_body("hi from deepseek"))
        .create_async()
        .await;

    let config = ModelConfig::new("deepseek-chat", "DeepSeek Chat", ProviderTag::DeepSeek, "deepseek-chat")
        .with_api_key_env("DEEPSEEK_API_KEY")
        .with_api_key("sk-ds")
        .with_base_url(server.url());
    let llm = factory_for(config).create("deepseek-chat").expect("client");

    let response = llm
        .generate(GenerationRequest::new("hello"))
        .await
        .expect("generation should succeed");

    mock.assert_async().await;
    assert_eq!(response.text(), "hi from deepseek");
}

#[tokio::test]
async fn ollama_appends_v1_and_sends_placeholder_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer ollama")
        .with_status(200)
        .with_body(completion_body("local"))
        .create_async()
        .await;

    let config = ModelConfig::new("llama2", "Llama 2", ProviderTag::Ollama, "llama2")
        .with_base_url(server.url());
    let llm = factory_for(config).create("llama2").expect("client");

    let response = llm
        .generate(GenerationRequest::new("hello"))
        .await
        .expect("generation should succeed");

    mock.assert_async().await;
    assert_eq!(response.text(), "local");
}

#[tokio::test]
async fn anthropic_uses_api_key_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-ant")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-3-haiku-20240307",
            "system": "terse"
        })))
        .with_status(200)
        .with_body(
            json!({
                "content": [{"type": "text", "text": "ok"}],
                "usage": {"input_tokens": 1, "output_tokens": 1}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = ModelConfig::new(
        "claude-3-haiku",
        "Claude 3 Haiku",
        ProviderTag::Anthropic,
        "claude-3-haiku-20240307",
    )
    .with_api_key_env("ANTHROPIC_API_KEY")
    .with_api_key("sk-ant")
    .with_base_url(server.url());
    let llm = factory_for(config).create("claude-3-haiku").expect("client");

    let response = llm
        .generate(GenerationRequest::with_system("terse", "hello"))
        .await
        .expect("generation should succeed");

    mock.assert_async().await;
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn http_model_posts_to_configured_url_with_config_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/services/aigc/text-generation/generation")
        .match_header("authorization", "Bearer abc")
        .match_header("content-type", "application/json")
        .match_header("x-vendor-tag", "alibaba")
        .with_status(200)
        .with_body(json!({"content": "flat reply"}).to_string())
        .create_async()
        .await;

    let config = ModelConfig::new("http-qwen-alibaba", "Qwen", ProviderTag::Http, "qwen-plus")
        .with_api_key_env("HTTP_QWEN_API_KEY_ALIBABA")
        .with_api_key("abc")
        .with_vendor("alibaba")
        .with_header("Content-Type", "application/json")
        .with_header("X-Vendor-Tag", "alibaba")
        .with_base_url(format!(
            "{}/api/v1/services/aigc/text-generation/generation",
            server.url()
        ));
    let llm = factory_for(config).create("http-qwen-alibaba").expect("client");

    let response = llm
        .generate(GenerationRequest::new("hello"))
        .await
        .expect("generation should succeed");

    mock.assert_async().await;
    assert_eq!(response.text(), "flat reply");
}

#[tokio::test]
async fn upstream_failure_surfaces_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let config = ModelConfig::new("gemma-7b", "Gemma", ProviderTag::Groq, "gemma-7b-it")
        .with_api_key_env("GROQ_API_KEY")
        .with_api_key("gsk")
        .with_base_url(server.url());
    let llm = factory_for(config).create("gemma-7b").expect("client");

    let err = llm
        .generate(GenerationRequest::new("hello"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(429));
}
