//! Three chat-agent styles over one model registry.
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`triad_models`] | provider tags, static catalog, HTTP model discovery, registry, manager, LLM interface |
//! | [`triad_model_providers`] | OpenAI-compatible, Anthropic and generic HTTP clients, the model factory |
//! | [`triad_agent`] | session store and the graph, team and direct agents |

pub use triad_agent;
pub use triad_model_providers;
pub use triad_models;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use triad_agent::{
        Agent, AgentError, AgentSession, DEFAULT_SESSION, DirectAgent, Framework, GraphAgent,
        Reply, SessionStore, TeamAgent, Turn, TurnRole,
    };
    pub use triad_model_providers::{ClientOptions, ModelFactory};
    pub use triad_models::llm::{GenerationError, GenerationRequest, GenerationResponse, Llm};
    pub use triad_models::{
        ConfigurationError, Environment, HttpModelDiscovery, ModelConfig, ModelManager,
        ModelRegistry, ProviderTag,
    };
}
