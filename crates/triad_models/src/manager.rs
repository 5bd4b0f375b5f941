//! Read-only facade over the model registry.

use crate::config::ModelConfig;
use crate::env::Environment;
use crate::error::ConfigurationError;
use crate::provider::ProviderTag;
use crate::registry::ModelRegistry;
use std::collections::BTreeMap;

// Values shipped in sample `.env` files. Reported as a diagnostic only.
const PLACEHOLDER_KEYS: &[&str] = &[
    "sk-your-openai-key-here",
    "sk-your-api-key-here",
    "your-api-key-here",
    "gsk-your-groq-key-here",
    "hf_your-huggingface-key-here",
    "tvly-your-tavily-key-here",
    "xxxxxx",
];

/// Answers "which models exist and which can be used right now".
///
/// ```
/// use triad_models::{Environment, ModelManager};
///
/// let manager = ModelManager::new(&Environment::from_pairs([("GROQ_API_KEY", "gsk-1")]));
///
/// assert!(manager.is_available("llama3-70b"));
/// assert!(manager.is_available("llama2"));
/// assert_eq!(manager.fallback_for("gpt-4o").unwrap().key(), "llama3-70b");
/// ```
#[derive(Debug, Clone)]
pub struct ModelManager {
    registry: ModelRegistry,
}

impl ModelManager {
    /// Builds the registry from `env` and wraps it.
    #[must_use]
    pub fn new(env: &Environment) -> Self {
        Self::from_registry(ModelRegistry::build(env))
    }

    /// Wraps an existing registry.
    #[must_use]
    pub fn from_registry(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Returns `true` iff `key` exists and its required secret is set.
    #[must_use]
    pub fn is_available(&self, key: &str) -> bool {
        self.registry
            .get(key)
            .is_ok_and(ModelConfig::is_available)
    }

    /// Returns the config for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownModel`] if no model has this key.
    pub fn get_config(&self, key: &str) -> Result<&ModelConfig, ConfigurationError> {
        self.registry.get(key)
    }

    /// Returns the config for `key` if it can be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownModel`] if no model has this key, or
    /// [`ConfigurationError::MissingApiKey`] if its secret is not set.
    pub fn require_available(&self, key: &str) -> Result<&ModelConfig, ConfigurationError> {
        let config = self.registry.get(key)?;
        if config.is_available() {
            Ok(config)
        } else {
            Err(ConfigurationError::MissingApiKey {
                model: key.to_string(),
                env_var: config.api_key_env().unwrap_or_default().to_string(),
            })
        }
    }

    /// Every model served by `provider`, static and discovered.
    #[must_use]
    pub fn list_by_provider(&self, provider: ProviderTag) -> Vec<&ModelConfig> {
        self.registry.by_provider(provider).collect()
    }

    /// Every model, in registry order.
    #[must_use]
    pub fn list(&self) -> &[ModelConfig] {
        self.registry.list()
    }

    /// Models that can be used now, in registry order.
    #[must_use]
    pub fn available(&self) -> Vec<&ModelConfig> {
        self.registry
            .list()
            .iter()
            .filter(|config| config.is_available())
            .collect()
    }

    /// Returns `key` if it is available, otherwise the first available model.
    #[must_use]
    pub fn fallback_for(&self, key: &str) -> Option<&ModelConfig> {
        match self.registry.get(key) {
            Ok(config) if config.is_available() => Some(config),
            _ => self.registry.list().iter().find(|config| config.is_available()),
        }
    }

    /// Unavailable models grouped by provider, with the variable to set.
    #[must_use]
    pub fn missing_api_keys(&self) -> BTreeMap<ProviderTag, Vec<MissingApiKey>> {
        let mut missing: BTreeMap<ProviderTag, Vec<MissingApiKey>> = BTreeMap::new();
        for config in self.registry.list() {
            if config.is_available() {
                continue;
            }
            let Some(env_var) = config.api_key_env() else {
                continue;
            };
            missing
                .entry(config.provider())
                .or_default()
                .push(MissingApiKey {
                    model_key: config.key().to_string(),
                    model_name: config.name().to_string(),
                    env_var: env_var.to_string(),
                });
        }
        missing
    }

    /// Detailed diagnostic for one model.
    ///
    /// A placeholder-looking secret is reported as an issue but does not
    /// change [`is_available`](Self::is_available).
    #[must_use]
    pub fn availability_status(&self, key: &str) -> AvailabilityStatus {
        let mut status = AvailabilityStatus {
            model_key: key.to_string(),
            exists: false,
            provider: None,
            requires_api_key: false,
            has_api_key: false,
            placeholder_api_key: false,
            is_available: false,
            issues: Vec::new(),
        };

        let Ok(config) = self.registry.get(key) else {
            status.issues.push("model is not registered".to_string());
            return status;
        };

        status.exists = true;
        status.provider = Some(config.provider());
        status.requires_api_key = config.requires_api_key();
        status.is_available = config.is_available();

        if !status.requires_api_key {
            return status;
        }

        match (config.api_key(), config.api_key_env()) {
            (Some(secret), _) => {
                status.has_api_key = true;
                if looks_like_placeholder(secret) {
                    status.placeholder_api_key = true;
                    status
                        .issues
                        .push("api key looks like a placeholder value".to_string());
                }
            }
            (None, Some(env_var)) => status
                .issues
                .push(format!("api key not configured; set {env_var}")),
            (None, None) => status
                .issues
                .push("no api key environment variable defined".to_string()),
        }
        status
    }

    /// Totals across the whole registry.
    #[must_use]
    pub fn environment_report(&self) -> EnvironmentReport {
        let total_models = self.registry.len();
        let available_models = self.available().len();
        let availability_rate = if total_models == 0 {
            0.0
        } else {
            available_models as f64 / total_models as f64
        };
        EnvironmentReport {
            total_models,
            available_models,
            availability_rate,
            missing_keys: self.missing_api_keys(),
        }
    }
}

fn looks_like_placeholder(secret: &str) -> bool {
    let lowered = secret.trim().to_ascii_lowercase();
    PLACEHOLDER_KEYS.contains(&lowered.as_str())
        || lowered.contains("your-")
        || lowered.contains("-here")
}

/// A model that cannot be used until a variable is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingApiKey {
    /// The model key.
    pub model_key: String,
    /// The model's display name.
    pub model_name: String,
    /// The variable to set.
    pub env_var: String,
}

/// Diagnostic record returned by [`ModelManager::availability_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityStatus {
    /// The queried key.
    pub model_key: String,
    /// Whether the key is registered.
    pub exists: bool,
    /// Provider, when registered.
    pub provider: Option<ProviderTag>,
    /// Whether the model needs a secret.
    pub requires_api_key: bool,
    /// Whether a non-blank secret is set.
    pub has_api_key: bool,
    /// Whether the secret matches a known sample value.
    pub placeholder_api_key: bool,
    /// Same answer as [`ModelManager::is_available`].
    pub is_available: bool,
    /// Human-readable problems found.
    pub issues: Vec<String>,
}

/// Summary returned by [`ModelManager::environment_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentReport {
    /// Registered models.
    pub total_models: usize,
    /// Models usable now.
    pub available_models: usize,
    /// `available_models / total_models`, or `0.0` when nothing is registered.
    pub availability_rate: f64,
    /// Missing secrets grouped by provider.
    pub missing_keys: BTreeMap<ProviderTag, Vec<MissingApiKey>>,
}

impl EnvironmentReport {
    /// Returns `true` if every registered model is usable.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_models > 0 && self.available_models == self.total_models
    }
}
