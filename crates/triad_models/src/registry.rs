//! Model configuration registry.

use crate::catalog::static_models;
use crate::config::ModelConfig;
use crate::discovery::HttpModelDiscovery;
use crate::env::Environment;
use crate::error::ConfigurationError;
use crate::provider::ProviderTag;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Registry of every known model, keyed by model key.
///
/// Built once from the static catalog plus whatever [`HttpModelDiscovery`]
/// finds in an [`Environment`]; immutable afterwards.
///
/// # Ordering
///
/// [`list()`](Self::list) yields static entries in catalog order followed by
/// discovered entries sorted by key.
///
/// # Key uniqueness
///
/// A discovered entry never replaces a static one. If discovery produces a
/// key already declared statically, the discovered entry is dropped with a
/// warning.
///
/// ```
/// use triad_models::{Environment, ModelRegistry};
///
/// let env = Environment::from_pairs([("HTTP_QWEN_API_KEY_HUAWEI", "sk-test")]);
/// let registry = ModelRegistry::build(&env);
///
/// let qwen = registry.get("http-qwen-huawei").unwrap();
/// assert_eq!(qwen.model_id(), "Qwen2.5-72B-Instruct");
/// assert!(registry.get("gpt-5").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelConfig>,
    // Maps model keys to positions in `models`.
    index: HashMap<String, usize>,
}

impl core::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModelRegistry {
    /// Builds the registry from the static catalog and the default discovery.
    #[must_use]
    pub fn build(env: &Environment) -> Self {
        Self::build_with(env, &HttpModelDiscovery::new())
    }

    /// Builds the registry using a specific discovery pass.
    #[must_use]
    pub fn build_with(env: &Environment, discovery: &HttpModelDiscovery) -> Self {
        let statics = static_models()
            .into_iter()
            .map(|config| config.resolve_api_key(env));
        let registry = Self::from_parts(statics, discovery.discover(env));
        debug!(models = registry.len(), "model registry built");
        registry
    }

    /// Assembles a registry from already-resolved configs.
    ///
    /// `statics` keep their order; `discovered` are sorted by key and dropped
    /// when their key is already taken.
    #[must_use]
    pub fn from_parts(
        statics: impl IntoIterator<Item = ModelConfig>,
        discovered: impl IntoIterator<Item = ModelConfig>,
    ) -> Self {
        let mut registry = Self::default();
        for config in statics {
            if registry.contains(config.key()) {
                warn!(key = config.key(), "duplicate static model key ignored");
                continue;
            }
            registry.insert(config);
        }

        let mut discovered: Vec<_> = discovered.into_iter().collect();
        discovered.sort_by(|a, b| a.key().cmp(b.key()));
        for config in discovered {
            if registry.contains(config.key()) {
                warn!(
                    key = config.key(),
                    "discovered model clashes with an existing key and was ignored"
                );
                continue;
            }
            registry.insert(config);
        }
        registry
    }

    fn insert(&mut self, config: ModelConfig) {
        self.index.insert(config.key().to_string(), self.models.len());
        self.models.push(config);
    }

    /// Returns the config for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownModel`] if no model has this key.
    pub fn get(&self, key: impl AsRef<str>) -> Result<&ModelConfig, ConfigurationError> {
        let key = key.as_ref();
        self.index
            .get(key)
            .and_then(|&position| self.models.get(position))
            .ok_or_else(|| ConfigurationError::UnknownModel(key.to_string()))
    }

    /// Checks if a model is registered.
    #[must_use]
    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.index.contains_key(key.as_ref())
    }

    /// Every config, in registry order.
    #[must_use]
    pub fn list(&self) -> &[ModelConfig] {
        &self.models
    }

    /// Every model key, in registry order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(ModelConfig::key)
    }

    /// Configs served by `provider`, in registry order.
    pub fn by_provider(&self, provider: ProviderTag) -> impl Iterator<Item = &ModelConfig> {
        self.models
            .iter()
            .filter(move |config| config.provider() == provider)
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_entries_come_first_in_catalog_order() {
        let env = Environment::from_pairs([
            ("HTTP_QWEN_API_KEY_HUAWEI", "a"),
            ("HTTP_ERNIE_API_KEY_BAIDU", "b"),
        ]);
        let registry = ModelRegistry::build(&env);
        let keys: Vec<_> = registry.keys().collect();

        assert_eq!(keys.first(), Some(&"gpt-4o"));
        assert_eq!(keys[13], "codellama");
        assert_eq!(&keys[14..], ["http-ernie-baidu", "http-qwen-huawei"]);
    }

    #[test]
    fn discovered_entry_never_overwrites_static_key() {
        let statics = [ModelConfig::new("shared", "Static", ProviderTag::OpenAi, "a")];
        let discovered = [ModelConfig::new("shared", "Discovered", ProviderTag::Http, "b")];
        let registry = ModelRegistry::from_parts(statics, discovered);

        assert_eq!(registry.len(), 1);
        let shared = registry.get("shared").expect("registered");
        assert_eq!(shared.name(), "Static");
        assert_eq!(shared.provider(), ProviderTag::OpenAi);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let registry = ModelRegistry::build(&Environment::default());
        assert!(matches!(
            registry.get("gpt-5"),
            Err(ConfigurationError::UnknownModel(key)) if key == "gpt-5"
        ));
    }

    #[test]
    fn secrets_resolve_during_build() {
        let env = Environment::from_pairs([("ANTHROPIC_API_KEY", "sk-ant")]);
        let registry = ModelRegistry::build(&env);

        assert_eq!(
            registry.get("claude-3-haiku").expect("registered").api_key(),
            Some("sk-ant")
        );
        assert_eq!(registry.get("gpt-4o").expect("registered").api_key(), None);
    }
}
