//! Discovery of HTTP-exposed models from environment variable names.
//!
//! A variable named `HTTP_<MODEL>_API_KEY_<VENDOR>` (or `HTTP_<MODEL>_API_KEY`)
//! declares a model reachable through an OpenAI-compatible chat-completions
//! endpoint. Its value is the secret; the registry key is derived from the
//! name, e.g. `HTTP_DEEPSEEK_R1_API_KEY_HUAWEI` becomes
//! `http-deepseek-r1-huawei`.
//!
//! # Name grammar
//!
//! - `MODEL` is one or more segments of upper-case ASCII letters and digits,
//!   joined by single underscores.
//! - `VENDOR` is a single such segment.
//! - Names carrying the `_API_KEY` marker more than once are ambiguous and
//!   ignored, as are names with empty segments or lower-case letters.
//!
//! # Endpoint resolution
//!
//! 1. `HTTP_<MODEL>_BASE_URL_<VENDOR>` (or `HTTP_<MODEL>_BASE_URL`) if set.
//! 2. The built-in template for the variable, if there is one.
//!
//! Names with neither are skipped. `HTTP_<MODEL>_MODEL_ID_<VENDOR>` optionally
//! overrides the provider-side model id.

use crate::config::{DEFAULT_MAX_TOKENS, ModelConfig};
use crate::env::Environment;
use crate::provider::ProviderTag;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const PREFIX: &str = "HTTP_";
const MARKER: &str = "_API_KEY";
const DEFAULT_VENDOR: &str = "generic";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// The parts of a discovery variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpKeyName {
    /// Model segment, e.g. `DEEPSEEK_R1`.
    pub model: String,
    /// Vendor segment, e.g. `HUAWEI`.
    pub vendor: Option<String>,
}

impl HttpKeyName {
    /// Parses a variable name against the discovery grammar.
    ///
    /// Returns `None` for names that do not declare an HTTP model.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(PREFIX)?;
        if rest.matches(MARKER).count() != 1 {
            return None;
        }
        let (model, suffix) = rest.split_once(MARKER)?;

        if model.is_empty() || !model.split('_').all(is_segment) {
            return None;
        }

        let vendor = match suffix {
            "" => None,
            _ => {
                let vendor = suffix.strip_prefix('_')?;
                if !is_segment(vendor) {
                    return None;
                }
                Some(vendor.to_string())
            }
        };

        Some(Self {
            model: model.to_string(),
            vendor,
        })
    }

    /// Registry key, e.g. `http-deepseek-r1-huawei`.
    #[must_use]
    pub fn key(&self) -> String {
        let mut key = format!("http-{}", hyphenate(&self.model));
        if let Some(vendor) = &self.vendor {
            key.push('-');
            key.push_str(&vendor.to_ascii_lowercase());
        }
        key
    }

    /// Name of a companion variable, e.g. `HTTP_QWEN_BASE_URL_HUAWEI`.
    #[must_use]
    pub fn companion(&self, field: &str) -> String {
        match &self.vendor {
            Some(vendor) => format!("{PREFIX}{}_{field}_{vendor}", self.model),
            None => format!("{PREFIX}{}_{field}", self.model),
        }
    }
}

fn is_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

fn hyphenate(segment: &str) -> String {
    segment.to_ascii_lowercase().replace('_', "-")
}

/// Known settings for a discovery variable.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpModelTemplate {
    /// The variable this template applies to.
    pub env_var: String,
    /// Display name.
    pub name: String,
    /// Provider-side model id.
    pub model_id: String,
    /// Full chat-completions endpoint.
    pub base_url: String,
    /// Vendor name.
    pub vendor: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Human-readable description.
    pub description: String,
}

impl HttpModelTemplate {
    fn builtin(
        env_var: &str,
        name: &str,
        model_id: &str,
        base_url: &str,
        vendor: &str,
        temperature: f32,
        description: &str,
    ) -> Self {
        Self {
            env_var: env_var.to_string(),
            name: name.to_string(),
            model_id: model_id.to_string(),
            base_url: base_url.to_string(),
            vendor: vendor.to_string(),
            temperature,
            description: description.to_string(),
        }
    }
}

/// Synthesises [`ModelConfig`]s for HTTP models declared in the environment.
///
/// Discovery is pure: it never fails and yields the same configs for the
/// same [`Environment`].
#[derive(Debug, Clone)]
pub struct HttpModelDiscovery {
    templates: Vec<HttpModelTemplate>,
}

impl Default for HttpModelDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpModelDiscovery {
    /// Creates a discovery pass with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: builtin_templates(),
        }
    }

    /// Creates a discovery pass with no templates; every model then needs an
    /// explicit base URL variable.
    #[must_use]
    pub fn without_templates() -> Self {
        Self {
            templates: Vec::new(),
        }
    }

    /// Adds or replaces the template for `template.env_var`.
    #[must_use]
    pub fn with_template(mut self, template: HttpModelTemplate) -> Self {
        self.templates.retain(|t| t.env_var != template.env_var);
        self.templates.push(template);
        self
    }

    /// Templates known to this discovery pass, whether configured or not.
    #[must_use]
    pub fn templates(&self) -> &[HttpModelTemplate] {
        &self.templates
    }

    fn template(&self, env_var: &str) -> Option<&HttpModelTemplate> {
        self.templates.iter().find(|t| t.env_var == env_var)
    }

    /// Scans `env` and returns the discovered configs, ordered by key.
    #[must_use]
    pub fn discover(&self, env: &Environment) -> Vec<ModelConfig> {
        let mut found: BTreeMap<String, (String, ModelConfig)> = BTreeMap::new();

        // Names arrive sorted, so the first claimant of a key is the
        // lexicographically smallest name.
        for name in env.names() {
            let Some(parsed) = HttpKeyName::parse(name) else {
                if name.starts_with(PREFIX) && name.contains(MARKER) {
                    debug!(env_var = name, "ignoring ambiguous http model variable");
                }
                continue;
            };

            let Some(config) = self.build(name, &parsed, env) else {
                continue;
            };

            if let Some((winner, _)) = found.get(config.key()) {
                warn!(
                    key = config.key(),
                    kept = winner.as_str(),
                    ignored = name,
                    "http model key declared twice"
                );
                continue;
            }
            found.insert(config.key().to_string(), (name.to_string(), config));
        }

        found.into_values().map(|(_, config)| config).collect()
    }

    fn build(&self, env_var: &str, parsed: &HttpKeyName, env: &Environment) -> Option<ModelConfig> {
        let template = self.template(env_var);
        let base_url = env
            .get(&parsed.companion("BASE_URL"))
            .or_else(|| template.map(|t| t.base_url.as_str()));
        let Some(base_url) = base_url else {
            debug!(
                env_var,
                expected = %parsed.companion("BASE_URL"),
                "skipping http model with no base url"
            );
            return None;
        };

        let model_id = env
            .get(&parsed.companion("MODEL_ID"))
            .map(str::to_string)
            .or_else(|| template.map(|t| t.model_id.clone()))
            .unwrap_or_else(|| hyphenate(&parsed.model));

        let vendor = template.map_or_else(
            || {
                parsed
                    .vendor
                    .as_deref()
                    .map_or_else(|| DEFAULT_VENDOR.to_string(), str::to_ascii_lowercase)
            },
            |t| t.vendor.clone(),
        );

        let (name, temperature, description) = match template {
            Some(t) => (t.name.clone(), t.temperature, t.description.clone()),
            None => (
                format!("{model_id} ({vendor})"),
                DEFAULT_TEMPERATURE,
                format!("{model_id} served over HTTP by {vendor}"),
            ),
        };

        let mut config = ModelConfig::new(parsed.key(), name, ProviderTag::Http, model_id)
            .with_api_key_env(env_var)
            .with_base_url(base_url)
            .with_max_tokens(DEFAULT_MAX_TOKENS)
            .with_temperature(temperature)
            .with_vendor(vendor)
            .with_header("Content-Type", "application/json")
            .with_description(description);
        if let Some(secret) = env.get(env_var) {
            config = config.with_api_key(secret);
        }
        Some(config)
    }
}

fn builtin_templates() -> Vec<HttpModelTemplate> {
    vec![
        HttpModelTemplate::builtin(
            "HTTP_DEEPSEEK_R1_API_KEY_HUAWEI",
            "DeepSeek-R1 (Huawei Cloud)",
            "DeepSeek-R1",
            "https://maas-cn-southwest-2.modelarts-maas.com/v1/infers/8a062fd4-7367-4ab4-a936-5eeb8fb821c4/v1/chat/completions",
            "huawei",
            1.0,
            "DeepSeek-R1 deployed on Huawei Cloud",
        ),
        HttpModelTemplate::builtin(
            "HTTP_QWEN_API_KEY_HUAWEI",
            "Qwen (Huawei Cloud)",
            "Qwen2.5-72B-Instruct",
            "https://maas-cn-southwest-2.modelarts-maas.com/v1/infers/qwen-endpoint/v1/chat/completions",
            "huawei",
            0.7,
            "Qwen deployed on Huawei Cloud",
        ),
        HttpModelTemplate::builtin(
            "HTTP_QWEN_API_KEY_ALIBABA",
            "Qwen (Alibaba Cloud)",
            "qwen-plus",
            "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation",
            "alibaba",
            0.7,
            "Alibaba Cloud Qwen model",
        ),
        HttpModelTemplate::builtin(
            "HTTP_ERNIE_API_KEY_BAIDU",
            "ERNIE Bot (Baidu Cloud)",
            "ernie-bot-turbo",
            "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/eb-instant",
            "baidu",
            0.8,
            "Baidu Cloud ERNIE Bot model",
        ),
        HttpModelTemplate::builtin(
            "HTTP_OPENAI_COMPATIBLE_API_KEY",
            "OpenAI-compatible model",
            "gpt-3.5-turbo",
            "https://api.openai.com/v1/chat/completions",
            "openai-compatible",
            0.7,
            "Generic OpenAI-compatible HTTP API model",
        ),
    ]
}
