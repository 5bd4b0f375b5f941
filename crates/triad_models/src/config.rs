//! Per-model configuration.

use crate::env::Environment;
use crate::provider::ProviderTag;
use std::collections::BTreeMap;

/// Default completion budget for models that do not declare one.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default sampling temperature for models that do not declare one.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Everything needed to reach one model.
///
/// Built with [`ModelConfig::new`] and the `with_*` methods, then frozen once
/// it enters a [`ModelRegistry`](crate::ModelRegistry). The resolved secret
/// never appears in `Debug` output.
#[derive(Clone, PartialEq)]
pub struct ModelConfig {
    key: String,
    name: String,
    provider: ProviderTag,
    model_id: String,
    api_key_env: Option<String>,
    base_url: Option<String>,
    max_tokens: u32,
    temperature: f32,
    description: String,
    vendor: Option<String>,
    headers: BTreeMap<String, String>,
    api_key: Option<String>,
}

impl ModelConfig {
    /// Creates a config with default token budget and temperature.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        provider: ProviderTag,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            provider,
            model_id: model_id.into(),
            api_key_env: None,
            base_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            description: String::new(),
            vendor: None,
            headers: BTreeMap::new(),
            api_key: None,
        }
    }

    /// Sets the environment variable that holds this model's secret.
    #[must_use]
    pub fn with_api_key_env(mut self, env_var: impl Into<String>) -> Self {
        self.api_key_env = Some(env_var.into());
        self
    }

    /// Sets the endpoint, overriding the provider default.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the completion budget.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the vendor serving an HTTP model.
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Adds an extra HTTP header sent with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the resolved secret. Blank values are treated as unset.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let trimmed = api_key.trim();
        self.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Looks up the secret named by [`api_key_env`](Self::api_key_env) in `env`.
    ///
    /// A config that already carries a secret keeps it.
    #[must_use]
    pub fn resolve_api_key(mut self, env: &Environment) -> Self {
        if self.api_key.is_none() {
            self.api_key = self
                .api_key_env
                .as_deref()
                .and_then(|name| env.get(name))
                .map(str::to_string);
        }
        self
    }

    /// Unique registry key, e.g. `gpt-4o` or `http-qwen-alibaba`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider serving the model.
    #[must_use]
    pub fn provider(&self) -> ProviderTag {
        self.provider
    }

    /// Identifier sent to the provider.
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Environment variable holding the secret, if one is needed.
    #[must_use]
    pub fn api_key_env(&self) -> Option<&str> {
        self.api_key_env.as_deref()
    }

    /// Configured endpoint, if it differs from the provider default.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Configured endpoint, falling back to the provider default.
    #[must_use]
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .or_else(|| self.provider.default_base_url())
    }

    /// Completion budget.
    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Sampling temperature.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Vendor serving an HTTP model.
    #[must_use]
    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    /// Extra HTTP headers.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// The resolved secret, if set.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Whether the model needs a secret at all.
    #[must_use]
    pub fn requires_api_key(&self) -> bool {
        self.provider == ProviderTag::Http
            || (self.provider.requires_api_key() && self.api_key_env.is_some())
    }

    /// Whether the model can be used: its required secret, if any, is set.
    ///
    /// The secret's format is not checked.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.requires_api_key() || self.api_key.is_some()
    }
}

impl core::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("model_id", &self.model_id)
            .field("api_key_env", &self.api_key_env)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("vendor", &self.vendor)
            .field("headers", &self.headers)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai() -> ModelConfig {
        ModelConfig::new("gpt-4o", "GPT-4o", ProviderTag::OpenAi, "gpt-4o")
            .with_api_key_env("OPENAI_API_KEY")
    }

    #[test]
    fn defaults() {
        let config = openai();
        assert_eq!(config.max_tokens(), DEFAULT_MAX_TOKENS);
        assert!((config.temperature() - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(
            config.effective_base_url(),
            Some("https://api.openai.com/v1")
        );
    }

    #[test]
    fn resolves_secret_from_environment() {
        let env = Environment::from_pairs([("OPENAI_API_KEY", " sk-abc ")]);
        let config = openai().resolve_api_key(&env);
        assert_eq!(config.api_key(), Some("sk-abc"));
        assert!(config.is_available());
    }

    #[test]
    fn blank_secret_is_unavailable() {
        let env = Environment::from_pairs([("OPENAI_API_KEY", "   ")]);
        let config = openai().resolve_api_key(&env);
        assert_eq!(config.api_key(), None);
        assert!(!config.is_available());
    }

    #[test]
    fn keyless_provider_is_always_available() {
        let config = ModelConfig::new("llama2", "Llama 2", ProviderTag::Ollama, "llama2");
        assert!(!config.requires_api_key());
        assert!(config.is_available());
    }

    #[test]
    fn http_model_without_secret_is_unavailable() {
        let config = ModelConfig::new("http-x", "X", ProviderTag::Http, "x");
        assert!(config.requires_api_key());
        assert!(!config.is_available());
    }

    #[test]
    fn debug_redacts_secret() {
        let config = openai().with_api_key("sk-very-secret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("sk-very-secret"));
    }
}
