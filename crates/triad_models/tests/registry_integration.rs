//! End-to-end checks of registry construction from an environment snapshot.

use triad_models::{Environment, ModelManager, ModelRegistry, ProviderTag};

#[test]
fn huawei_deepseek_r1_is_discovered_and_available() {
    let env = Environment::from_pairs([("HTTP_DEEPSEEK_R1_API_KEY_HUAWEI", "abc")]);
    let manager = ModelManager::new(&env);

    assert!(manager.is_available("http-deepseek-r1-huawei"));
    let config = manager
        .get_config("http-deepseek-r1-huawei")
        .expect("discovered");
    assert_eq!(config.provider(), ProviderTag::Http);
    assert_eq!(config.model_id(), "DeepSeek-R1");
    assert_eq!(config.api_key(), Some("abc"));
    assert!((config.temperature() - 1.0).abs() < f32::EPSILON);
    assert!(
        config
            .base_url()
            .is_some_and(|url| url.ends_with("/chat/completions"))
    );

    // The statically declared entry uses a different variable and stays unavailable.
    assert!(!manager.is_available("deepseek-r1-huawei"));
}

#[test]
fn discovery_is_idempotent() {
    let env = Environment::from_pairs([
        ("HTTP_QWEN_API_KEY_HUAWEI", "k1"),
        ("HTTP_ERNIE_API_KEY_BAIDU", "k2"),
        ("HTTP_OPENAI_COMPATIBLE_API_KEY", "k3"),
        ("PATH", "/usr/bin"),
    ]);

    let first = ModelRegistry::build(&env);
    let second = ModelRegistry::build(&env);

    assert_eq!(first.list(), second.list());
    assert_eq!(first.len(), 17);
}

#[test]
fn list_order_is_static_then_sorted_discovered() {
    let env = Environment::from_pairs([
        ("HTTP_QWEN_API_KEY_HUAWEI", "k"),
        ("HTTP_OPENAI_COMPATIBLE_API_KEY", "k"),
        ("HTTP_ERNIE_API_KEY_BAIDU", "k"),
    ]);
    let registry = ModelRegistry::build(&env);
    let keys: Vec<_> = registry.keys().collect();

    assert_eq!(
        keys,
        vec![
            "gpt-4o",
            "gpt-4-turbo",
            "gpt-3.5-turbo",
            "claude-3.5-sonnet",
            "claude-3-opus",
            "claude-3-haiku",
            "llama3-70b",
            "mixtral-8x7b",
            "gemma-7b",
            "deepseek-chat",
            "deepseek-coder",
            "deepseek-r1-huawei",
            "llama2",
            "codellama",
            "http-ernie-baidu",
            "http-openai-compatible",
            "http-qwen-huawei",
        ]
    );
}

#[test]
fn unset_keys_leave_only_local_models() {
    let manager = ModelManager::new(&Environment::default());
    let available: Vec<_> = manager.available().into_iter().map(|c| c.key()).collect();
    assert_eq!(available, vec!["llama2", "codellama"]);
    assert!(manager.list_by_provider(ProviderTag::Http).is_empty());
}
