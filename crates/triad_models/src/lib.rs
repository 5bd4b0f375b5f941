//! Model configuration registry and LLM interface for Triad.
//!
//! Provides a single source of truth for which models exist, how to reach
//! them, and whether they can be used in the current environment.
//!
//! # Overview
//!
//! - Static catalog: built-in model entries for `OpenAI`, Anthropic,
//!   `DeepSeek`, Groq and Ollama.
//!
//! - Discovery: additional HTTP-exposed models are synthesised from
//!   environment variables named `HTTP_<MODEL>_API_KEY_<VENDOR>`.
//!
//! - Provider-agnostic generation: consumers talk to an [`llm::Llm`] handle;
//!   the provider clients live in `triad_model_providers`.
//!
//! # Example
//!
//! ```
//! use triad_models::{Environment, ModelManager, ProviderTag};
//!
//! let env = Environment::from_pairs([
//!     ("OPENAI_API_KEY", "sk-test"),
//!     ("HTTP_DEEPSEEK_R1_API_KEY_HUAWEI", "abc"),
//! ]);
//! let manager = ModelManager::new(&env);
//!
//! assert!(manager.is_available("gpt-4o"));
//! assert!(manager.is_available("http-deepseek-r1-huawei"));
//! assert!(!manager.is_available("claude-3-opus"));
//! assert_eq!(manager.list_by_provider(ProviderTag::Http).len(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod env;
pub mod error;
pub mod llm;
pub mod manager;
pub mod provider;
mod registry;

pub use config::ModelConfig;
pub use discovery::HttpModelDiscovery;
pub use env::Environment;
pub use error::ConfigurationError;
pub use manager::{AvailabilityStatus, EnvironmentReport, MissingApiKey, ModelManager};
pub use provider::ProviderTag;
pub use registry::ModelRegistry;
