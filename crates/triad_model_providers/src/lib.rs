//! Provider clients for the models in the Triad registry.
//!
//! Each client implements [`LlmProvider`](triad_models::llm::LlmProvider).
//! Most callers never construct one directly: [`ModelFactory`] maps a model
//! key from the [`ModelManager`](triad_models::ModelManager) onto the right
//! client and returns a ready [`Llm`](triad_models::llm::Llm) handle.
//!
//! # Supported Providers
//!
//! | Provider | Client | Wire format |
//! |----------|--------|-------------|
//! | `OpenAI` | [`OpenAiProvider`] | Chat Completions API |
//! | Anthropic | [`AnthropicProvider`] | Messages API |
//! | `DeepSeek` | [`OpenAiProvider`] | Chat Completions, custom base URL |
//! | Groq | [`OpenAiProvider`] | Chat Completions, custom base URL |
//! | Ollama | [`OpenAiProvider`] | Chat Completions at `<base>/v1` |
//! | HTTP | [`HttpProvider`] | Chat Completions posted to a fixed URL |
//!
//! # Usage
//!
//! ```no_run
//! use triad_model_providers::{ClientOptions, ModelFactory};
//! use triad_models::{Environment, ModelManager};
//!
//! let manager = ModelManager::new(&Environment::from_process());
//! let factory = ModelFactory::new(manager, ClientOptions::default());
//! let llm = factory.create("gpt-4o")?;
//! # Ok::<(), triad_models::ConfigurationError>(())
//! ```

pub mod anthropic;
pub mod factory;
pub mod http;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use factory::{ClientOptions, ModelFactory};
pub use http::HttpProvider;
pub use openai::OpenAiProvider;
