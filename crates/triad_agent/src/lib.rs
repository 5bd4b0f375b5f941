//! Session-scoped chat agents over the Triad model registry.
//!
//! Three agent styles share one [`AgentSession`] front end:
//!
//! | Framework | Type | Behaviour |
//! |-----------|------|-----------|
//! | `graph` | [`GraphAgent`] | classify, then simple chat or plan → research → analyse → reason → synthesise |
//! | `team` | [`TeamAgent`] | classify, then chat assistant or a member sequence merged by a lead |
//! | `direct` | [`DirectAgent`] | one system prompt, the last 20 turns, one call |
//!
//! Agents are stateless; the conversation lives in the session's
//! [`SessionStore`]. Configuration problems surface when the agent is built.
//! Upstream failures during a chat never do: they become the reply text.
//!
//! # Example
//!
//! ```no_run
//! use triad_agent::{AgentSession, DEFAULT_SESSION, Framework};
//! use triad_models::{Environment, ModelManager};
//!
//! # async fn run() -> Result<(), triad_agent::AgentError> {
//! let manager = ModelManager::new(&Environment::from_process());
//! let agent = Framework::Direct.build(&manager, "gpt-4o")?;
//! let mut session = AgentSession::from_boxed(agent);
//!
//! let reply = session.chat("Hello!", DEFAULT_SESSION).await;
//! assert_eq!(session.history(DEFAULT_SESSION).len(), 2);
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

pub mod direct;
pub mod graph;
pub mod session;
pub mod team;

pub use direct::DirectAgent;
pub use graph::GraphAgent;
pub use session::{SessionStore, Turn, TurnRole};
pub use team::TeamAgent;

use async_trait::async_trait;
use tracing::{Instrument, debug, info_span, warn};
use triad_model_providers::{ClientOptions, ModelFactory};
use triad_models::llm::{GenerationError, GenerationRequest, Llm};
use triad_models::{ConfigurationError, ModelManager};

/// Session id used when the caller does not pick one.
pub const DEFAULT_SESSION: &str = "default";

/// Errors raised by agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The requested model cannot be turned into a client.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A model call failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// What an agent produced for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// The answer shown to the user.
    pub text: String,
    /// Intermediate steps taken, in order. Empty for single-call agents.
    pub steps: Vec<String>,
}

impl Reply {
    /// A reply with no recorded steps.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            steps: Vec::new(),
        }
    }

    /// Attaches the steps taken to produce the reply.
    #[must_use]
    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }
}

/// A chat behaviour driven by an [`AgentSession`].
///
/// Implementations receive the session history (oldest first, without the
/// new message) and decide how much of it to send upstream.
#[async_trait]
pub trait Agent: Send + Sync + 'static {
    /// Answers `message` given the prior `history`.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] if any model call fails.
    async fn respond(&self, history: &[Turn], message: &str) -> Result<Reply, AgentError>;

    /// Key of the model the agent ended up bound to.
    fn model_key(&self) -> &str;

    /// Returns the agent's name for debugging and tracing.
    ///
    /// Defaults to the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Reply text recorded when [`respond`](Self::respond) fails.
    fn failure_reply(&self, error: &AgentError) -> String {
        format!("Model call failed: {error}")
    }
}

/// The three agent styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    /// [`GraphAgent`].
    Graph,
    /// [`TeamAgent`].
    Team,
    /// [`DirectAgent`].
    Direct,
}

impl Framework {
    /// Every framework, in menu order.
    pub const ALL: [Self; 3] = [Self::Graph, Self::Team, Self::Direct];

    /// The lower-case identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Team => "team",
            Self::Direct => "direct",
        }
    }

    /// One-line summary for menus.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Graph => "Routed workflow with planning, research, analysis and reasoning steps",
            Self::Team => "Specialist members coordinated by a team lead",
            Self::Direct => "Single assistant prompt with recent history",
        }
    }

    /// Client overrides used by this framework's agent.
    #[must_use]
    pub fn client_options(self) -> ClientOptions {
        match self {
            Self::Graph => GraphAgent::client_options(),
            Self::Team => TeamAgent::client_options(),
            Self::Direct => DirectAgent::client_options(),
        }
    }

    /// Builds this framework's agent for `model_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Configuration`] if neither `model_key` nor any
    /// fallback model can be turned into a client.
    pub fn build(
        self,
        manager: &ModelManager,
        model_key: &str,
    ) -> Result<Box<dyn Agent>, AgentError> {
        let agent: Box<dyn Agent> = match self {
            Self::Graph => Box::new(GraphAgent::new(manager, model_key)?),
            Self::Team => Box::new(TeamAgent::new(manager, model_key)?),
            Self::Direct => Box::new(DirectAgent::new(manager, model_key)?),
        };
        Ok(agent)
    }
}

impl core::fmt::Display for Framework {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised framework name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown framework `{0}`; expected graph, team or direct")]
pub struct UnknownFramework(pub String);

impl core::str::FromStr for Framework {
    type Err = UnknownFramework;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|framework| framework.as_str() == lowered)
            .ok_or_else(|| UnknownFramework(s.to_string()))
    }
}

/// Resolves `model_key` (or the first available fallback) into a client.
pub(crate) fn bind_model(
    manager: &ModelManager,
    model_key: &str,
    options: ClientOptions,
) -> Result<(String, Llm), AgentError> {
    let factory = ModelFactory::new(manager.clone(), options);
    Ok(factory.create_or_fallback(model_key)?)
}

/// Sends one user prompt with no history and returns the reply text.
pub(crate) async fn ask(llm: &Llm, prompt: String) -> Result<String, AgentError> {
    let response = llm.generate(GenerationRequest::new(prompt)).await?;
    Ok(response.text())
}

/// Drives an [`Agent`] and owns the history of every session it serves.
///
/// `chat` takes `&mut self`, so turns of one session are appended in call
/// order.
pub struct AgentSession {
    agent: Box<dyn Agent>,
    store: SessionStore,
}

impl core::fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AgentSession")
            .field("agent", &self.agent.name())
            .field("model_key", &self.agent.model_key())
            .field("store", &self.store)
            .finish()
    }
}

impl AgentSession {
    /// Wraps `agent` with an empty store.
    #[must_use]
    pub fn new(agent: impl Agent) -> Self {
        Self::from_boxed(Box::new(agent))
    }

    /// Wraps an already boxed agent with an empty store.
    #[must_use]
    pub fn from_boxed(agent: Box<dyn Agent>) -> Self {
        Self {
            agent,
            store: SessionStore::new(),
        }
    }

    /// Replaces the history store.
    #[must_use]
    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = store;
        self
    }

    /// Sends `message` in `session_id` and returns the reply text.
    ///
    /// Both the message and the reply are recorded, including when the agent
    /// fails; the failure is rendered into the reply.
    pub async fn chat(&mut self, message: &str, session_id: &str) -> String {
        let span = info_span!("chat", agent = self.agent.name(), session = session_id);
        let result = self
            .agent
            .respond(self.store.history(session_id), message)
            .instrument(span)
            .await;

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    agent = self.agent.name(),
                    session = session_id,
                    error = %err,
                    "agent failed to answer"
                );
                Reply::new(self.agent.failure_reply(&err))
            }
        };
        debug!(session = session_id, steps = reply.steps.len(), "reply recorded");

        self.store.append(session_id, Turn::user(message));
        self.store.append(session_id, Turn::assistant(reply.text.as_str()));
        self.store.set_reasoning_steps(session_id, reply.steps);
        reply.text
    }

    /// Turns recorded in `session_id`, oldest first.
    #[must_use]
    pub fn history(&self, session_id: &str) -> &[Turn] {
        self.store.history(session_id)
    }

    /// Steps the agent took for the latest message in `session_id`.
    #[must_use]
    pub fn reasoning_steps(&self, session_id: &str) -> &[String] {
        self.store.reasoning_steps(session_id)
    }

    /// Forgets `session_id`. Other sessions are untouched.
    pub fn clear(&mut self, session_id: &str) {
        self.store.clear(session_id);
    }

    /// The wrapped agent's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.agent.name()
    }

    /// Key of the model the agent is bound to.
    #[must_use]
    pub fn model_key(&self) -> &str {
        self.agent.model_key()
    }

    /// The history store.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Scripted;

    #[test]
    fn framework_names_parse_case_insensitively() {
        assert_eq!(" Graph ".parse::<Framework>(), Ok(Framework::Graph));
        assert_eq!("team".parse::<Framework>(), Ok(Framework::Team));
        assert_eq!("DIRECT".parse::<Framework>(), Ok(Framework::Direct));
        assert!("langgraph".parse::<Framework>().is_err());
        assert_eq!(Framework::Team.to_string(), "team");
    }

    #[tokio::test]
    async fn failed_exchange_is_still_recorded() {
        let provider = Scripted::failing(503);
        let mut session = AgentSession::new(DirectAgent::from_llm("stub", provider.llm()));

        let reply = session.chat("hello", DEFAULT_SESSION).await;

        assert!(reply.starts_with("Model call failed"));
        assert!(reply.contains("503"));
        let history = session.history(DEFAULT_SESSION);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Turn::user("hello"));
        assert_eq!(history[1].role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn clearing_one_session_keeps_the_others() {
        let provider = Scripted::new(["a", "b"]);
        let mut session = AgentSession::new(DirectAgent::from_llm("stub", provider.llm()));

        session.chat("first", "alice").await;
        session.chat("second", "bob").await;
        session.clear("alice");

        assert!(session.history("alice").is_empty());
        assert_eq!(session.history("bob").len(), 2);
        assert_eq!(session.model_key(), "stub");
    }

    #[tokio::test]
    async fn prior_turns_reach_the_agent() {
        let provider = Scripted::new(["one", "two"]);
        let mut session = AgentSession::new(DirectAgent::from_llm("stub", provider.llm()));

        session.chat("q1", DEFAULT_SESSION).await;
        session.chat("q2", DEFAULT_SESSION).await;

        let requests = provider.requests();
        assert_eq!(requests[0].messages.len(), 1);
        let texts: Vec<_> = requests[1].messages.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["q1", "one", "q2"]);
    }

    #[test]
    fn build_falls_back_to_an_available_model() {
        let manager = ModelManager::new(&triad_models::Environment::default());
        let agent = Framework::Direct
            .build(&manager, "gpt-4o")
            .expect("ollama models need no key");
        assert_eq!(agent.model_key(), "llama2");
    }
}
