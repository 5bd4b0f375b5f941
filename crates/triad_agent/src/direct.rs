//! Single-call assistant.

use crate::session::Turn;
use crate::{Agent, AgentError, Reply, bind_model};
use async_trait::async_trait;
use triad_model_providers::ClientOptions;
use triad_models::ModelManager;
use triad_models::llm::{GenerationRequest, Llm};

/// Number of prior turns sent with each message.
pub const HISTORY_WINDOW: usize = 20;

const SYSTEM_PROMPT: &str = "You are a friendly and professional AI assistant. \
You can look up information, solve math problems, discuss stock and market data, \
and reason through complex questions step by step. \
Give accurate, well-structured answers and say so when you are unsure.";

/// Answers with one model call: system prompt, the last
/// [`HISTORY_WINDOW`] turns, then the new message.
#[derive(Debug, Clone)]
pub struct DirectAgent {
    model_key: String,
    llm: Llm,
}

impl DirectAgent {
    /// Overrides applied to the model client: temperature 0.7, 4096 tokens.
    #[must_use]
    pub fn client_options() -> ClientOptions {
        ClientOptions::default().temperature(0.7).max_tokens(4096)
    }

    /// Binds the agent to `model_key`, or to the first available model.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Configuration`] if no client can be built.
    pub fn new(manager: &ModelManager, model_key: &str) -> Result<Self, AgentError> {
        let (model_key, llm) = bind_model(manager, model_key, Self::client_options())?;
        Ok(Self::from_llm(model_key, llm))
    }

    /// Uses an existing client.
    #[must_use]
    pub fn from_llm(model_key: impl Into<String>, llm: Llm) -> Self {
        Self {
            model_key: model_key.into(),
            llm,
        }
    }
}

#[async_trait]
impl Agent for DirectAgent {
    async fn respond(&self, history: &[Turn], message: &str) -> Result<Reply, AgentError> {
        let window = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
        let request = GenerationRequest::with_system(SYSTEM_PROMPT, message)
            .history(window.iter().map(Turn::to_message).collect());

        let response = self.llm.generate(request).await?;
        Ok(Reply::new(response.text()))
    }

    fn model_key(&self) -> &str {
        &self.model_key
    }

    fn name(&self) -> &str {
        "direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Scripted;

    #[tokio::test]
    async fn sends_only_the_recent_window() {
        let provider = Scripted::new(["ok"]);
        let agent = DirectAgent::from_llm("stub", provider.llm());
        let history: Vec<_> = (0..30).map(|i| Turn::user(format!("m{i}"))).collect();

        let reply = agent.respond(&history, "latest").await.expect("reply");
        assert_eq!(reply.text, "ok");
        assert!(reply.steps.is_empty());

        let request = &provider.requests()[0];
        assert_eq!(request.system.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(request.messages.len(), HISTORY_WINDOW + 1);
        assert_eq!(request.messages[0].text(), "m10");
        assert_eq!(request.messages[HISTORY_WINDOW].text(), "latest");
    }

    #[test]
    fn uses_conversational_sampling() {
        let options = DirectAgent::client_options();
        assert_eq!(options.temperature, Some(0.7));
        assert_eq!(options.max_tokens, Some(4096));
        assert_eq!(options.timeout, None);
    }
}
