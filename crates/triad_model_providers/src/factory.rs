//! Maps model keys onto provider clients.

use crate::anthropic::AnthropicProvider;
use crate::http::HttpProvider;
use crate::openai::OpenAiProvider;
use core::time::Duration;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::{info, warn};
use triad_models::llm::{Llm, LlmProvider};
use triad_models::{ConfigurationError, ModelConfig, ModelManager, ProviderTag};

/// Ollama ignores the bearer token but the OpenAI wire format expects one.
const OLLAMA_API_KEY: &str = "ollama";

/// Per-framework overrides applied to every client a factory creates.
///
/// Unset fields fall back to the model config (sampling) or to the HTTP
/// client default (timeouts).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientOptions {
    /// Overrides the config temperature.
    pub temperature: Option<f32>,
    /// Overrides the config completion budget.
    pub max_tokens: Option<u32>,
    /// Request timeout for every provider.
    pub timeout: Option<Duration>,
    /// Request timeout for discovered HTTP models; falls back to `timeout`.
    pub http_timeout: Option<Duration>,
}

impl ClientOptions {
    /// Sets the temperature override.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the completion budget override.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the request timeout for every provider.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the request timeout for HTTP models only.
    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    fn timeout_for(&self, provider: ProviderTag) -> Option<Duration> {
        match provider {
            ProviderTag::Http => self.http_timeout.or(self.timeout),
            _ => self.timeout,
        }
    }
}

/// Creates [`Llm`] handles for model keys.
///
/// Dispatch is one `match` over [`ProviderTag`]:
///
/// | Tag | Client | Endpoint |
/// |-----|--------|----------|
/// | `openai` | [`OpenAiProvider`] | `https://api.openai.com/v1` |
/// | `anthropic` | [`AnthropicProvider`] | `https://api.anthropic.com` |
/// | `deepseek` | [`OpenAiProvider`] | config base URL or `https://api.deepseek.com` |
/// | `groq` | [`OpenAiProvider`] | `https://api.groq.com/openai/v1` |
/// | `ollama` | [`OpenAiProvider`] | `<base>/v1`, token `ollama` |
/// | `http` | [`HttpProvider`] | config URL, verbatim |
///
/// Clients are constructed, never called, by the factory.
#[derive(Debug, Clone)]
pub struct ModelFactory {
    manager: ModelManager,
    options: ClientOptions,
}

impl ModelFactory {
    /// Creates a factory over `manager`.
    #[must_use]
    pub fn new(manager: ModelManager, options: ClientOptions) -> Self {
        Self { manager, options }
    }

    /// The manager models are resolved through.
    #[must_use]
    pub fn manager(&self) -> &ModelManager {
        &self.manager
    }

    /// The overrides applied to created clients.
    #[must_use]
    pub fn options(&self) -> ClientOptions {
        self.options
    }

    /// Creates a handle for `key`.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UnknownModel`] if the key is not registered
    /// - [`ConfigurationError::MissingApiKey`] if its secret is not set
    /// - [`ConfigurationError::MissingBaseUrl`] for an HTTP model with no URL
    /// - [`ConfigurationError::InvalidHeader`] if a configured header is malformed
    /// - [`ConfigurationError::Client`] if the HTTP client cannot be built
    pub fn create(&self, key: &str) -> Result<Llm, ConfigurationError> {
        let config = self.manager.require_available(key)?;
        self.create_for(config)
    }

    /// Creates a handle for `key`, or for the first available model if `key`
    /// cannot be used. Returns the key actually chosen.
    ///
    /// # Errors
    ///
    /// Returns the error for `key` when no model at all is available, or any
    /// error from building the chosen client.
    pub fn create_or_fallback(&self, key: &str) -> Result<(String, Llm), ConfigurationError> {
        let config = match self.manager.require_available(key) {
            Ok(config) => config,
            Err(err) => {
                let Some(fallback) = self.manager.fallback_for(key) else {
                    return Err(err);
                };
                warn!(
                    requested = key,
                    fallback = fallback.key(),
                    error = %err,
                    "requested model unavailable, falling back"
                );
                fallback
            }
        };
        Ok((config.key().to_string(), self.create_for(config)?))
    }

    fn create_for(&self, config: &ModelConfig) -> Result<Llm, ConfigurationError> {
        let client = build_client(self.options.timeout_for(config.provider()))?;
        let api_key = config.api_key().unwrap_or_default();

        let provider: Arc<dyn LlmProvider> = match config.provider() {
            ProviderTag::OpenAi | ProviderTag::DeepSeek | ProviderTag::Groq => Arc::new(
                OpenAiProvider::new(api_key)
                    .with_base_url(base_url(config)?)
                    .with_client(client),
            ),
            ProviderTag::Anthropic => Arc::new(AnthropicProvider::with_client(
                client,
                api_key,
                base_url(config)?,
            )),
            ProviderTag::Ollama => Arc::new(
                OpenAiProvider::new(OLLAMA_API_KEY)
                    .with_base_url(format!("{}/v1", base_url(config)?.trim_end_matches('/')))
                    .with_client(client),
            ),
            ProviderTag::Http => Arc::new(
                HttpProvider::new(base_url(config)?, api_key)
                    .with_vendor(config.vendor().unwrap_or("generic"))
                    .with_headers(header_map(config)?)
                    .with_client(client),
            ),
        };

        info!(
            model = config.key(),
            provider = %config.provider(),
            model_id = config.model_id(),
            "created model client"
        );

        Ok(Llm::new(provider, config.model_id())
            .with_temperature(self.options.temperature.unwrap_or(config.temperature()))
            .with_max_tokens(self.options.max_tokens.unwrap_or(config.max_tokens())))
    }
}

fn base_url(config: &ModelConfig) -> Result<&str, ConfigurationError> {
    config
        .effective_base_url()
        .ok_or_else(|| ConfigurationError::MissingBaseUrl(config.key().to_string()))
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, ConfigurationError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| ConfigurationError::Client(err.to_string()))
}

fn header_map(config: &ModelConfig) -> Result<HeaderMap, ConfigurationError> {
    let invalid = |name: &str| ConfigurationError::InvalidHeader {
        model: config.key().to_string(),
        name: name.to_string(),
    };

    let mut headers = HeaderMap::new();
    for (name, value) in config.headers() {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid(name))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid(name))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triad_models::{Environment, ModelRegistry};

    fn factory(pairs: &[(&str, &str)]) -> ModelFactory {
        let env = Environment::from_pairs(pairs.iter().copied());
        ModelFactory::new(ModelManager::new(&env), ClientOptions::default())
    }

    #[test]
    fn creates_client_for_available_model() {
        let llm = factory(&[("OPENAI_API_KEY", "sk-test")])
            .create("gpt-4-turbo")
            .expect("available");
        assert_eq!(llm.model_name(), "gpt-4-turbo-preview");
        assert_eq!(llm.max_tokens(), Some(4096));
    }

    #[test]
    fn unknown_and_unconfigured_models_are_rejected() {
        let factory = factory(&[]);
        assert!(matches!(
            factory.create("gpt-5"),
            Err(ConfigurationError::UnknownModel(_))
        ));
        assert!(matches!(
            factory.create("claude-3-opus"),
            Err(ConfigurationError::MissingApiKey { .. })
        ));
        assert!(factory.create("llama2").is_ok());
    }

    #[test]
    fn options_override_config_sampling() {
        let env = Environment::from_pairs([("GROQ_API_KEY", "gsk-test")]);
        let options = ClientOptions::default().temperature(0.7).max_tokens(512);
        let llm = ModelFactory::new(ModelManager::new(&env), options)
            .create("mixtral-8x7b")
            .expect("available");

        assert_eq!(llm.temperature(), Some(0.7));
        assert_eq!(llm.max_tokens(), Some(512));
    }

    #[test]
    fn http_model_without_url_is_rejected() {
        let config = ModelConfig::new("http-bare", "Bare", ProviderTag::Http, "bare")
            .with_api_key_env("HTTP_BARE_API_KEY")
            .with_api_key("k");
        let manager = ModelManager::from_registry(ModelRegistry::from_parts(Vec::new(), [config]));
        let factory = ModelFactory::new(manager, ClientOptions::default());

        assert!(matches!(
            factory.create("http-bare"),
            Err(ConfigurationError::MissingBaseUrl(key)) if key == "http-bare"
        ));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let config = ModelConfig::new("http-x", "X", ProviderTag::Http, "x")
            .with_api_key_env("HTTP_X_API_KEY")
            .with_api_key("k")
            .with_base_url("http://localhost:1")
            .with_header("bad header", "v");
        let manager = ModelManager::from_registry(ModelRegistry::from_parts(Vec::new(), [config]));
        let factory = ModelFactory::new(manager, ClientOptions::default());

        assert!(matches!(
            factory.create("http-x"),
            Err(ConfigurationError::InvalidHeader { name, .. }) if name == "bad header"
        ));
    }

    #[test]
    fn fallback_picks_first_available_model() {
        let factory = factory(&[("DEEPSEEK_API_KEY", "sk-ds")]);

        let (key, llm) = factory.create_or_fallback("gpt-4o").expect("fallback");
        assert_eq!(key, "deepseek-chat");
        assert_eq!(llm.model_name(), "deepseek-chat");

        let (key, _) = factory.create_or_fallback("deepseek-coder").expect("direct");
        assert_eq!(key, "deepseek-coder");
    }

    #[test]
    fn http_timeout_applies_only_to_http_models() {
        let options = ClientOptions::default()
            .timeout(Duration::from_secs(60))
            .http_timeout(Duration::from_secs(30));
        assert_eq!(
            options.timeout_for(ProviderTag::Http),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            options.timeout_for(ProviderTag::Groq),
            Some(Duration::from_secs(60))
        );
    }
}
