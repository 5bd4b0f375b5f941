//! Per-session conversation history.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use triad_models::llm::Message;

/// Who produced a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person chatting.
    User,
    /// The agent.
    Assistant,
}

impl core::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        })
    }
}

/// One recorded message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who sent it.
    pub role: TurnRole,
    /// What was said.
    pub text: String,
}

impl Turn {
    /// A user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// An assistant turn.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }

    /// Converts the turn into a model message.
    #[must_use]
    pub fn to_message(&self) -> Message {
        match self.role {
            TurnRole::User => Message::user(self.text.as_str()),
            TurnRole::Assistant => Message::assistant(self.text.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Session {
    turns: Vec<Turn>,
    reasoning_steps: Vec<String>,
}

/// Conversation histories keyed by session id.
///
/// A session springs into existence on its first [`append`](Self::append)
/// and disappears again on [`clear`](Self::clear). Histories grow until
/// cleared; nothing is persisted.
///
/// ```
/// use triad_agent::session::{SessionStore, Turn};
///
/// let mut store = SessionStore::default();
/// store.append("a", Turn::user("hi"));
/// store.append("a", Turn::assistant("hello"));
///
/// assert_eq!(store.history("a").len(), 2);
/// assert!(store.history("b").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `turn` to the end of `session_id`'s history.
    pub fn append(&mut self, session_id: &str, turn: Turn) {
        self.session_mut(session_id).turns.push(turn);
    }

    /// Every turn of `session_id`, oldest first. Empty for unknown sessions.
    #[must_use]
    pub fn history(&self, session_id: &str) -> &[Turn] {
        self.sessions
            .get(session_id)
            .map(|session| session.turns.as_slice())
            .unwrap_or_default()
    }

    /// The last `limit` turns of `session_id`.
    #[must_use]
    pub fn recent(&self, session_id: &str, limit: usize) -> &[Turn] {
        let turns = self.history(session_id);
        &turns[turns.len().saturating_sub(limit)..]
    }

    /// Replaces the reasoning steps recorded for the latest request.
    pub fn set_reasoning_steps(&mut self, session_id: &str, steps: Vec<String>) {
        self.session_mut(session_id).reasoning_steps = steps;
    }

    /// Reasoning steps of the latest request in `session_id`.
    #[must_use]
    pub fn reasoning_steps(&self, session_id: &str) -> &[String] {
        self.sessions
            .get(session_id)
            .map(|session| session.reasoning_steps.as_slice())
            .unwrap_or_default()
    }

    /// Drops everything recorded for `session_id`. Other sessions are untouched.
    pub fn clear(&mut self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Returns `true` if `session_id` has recorded anything since its last clear.
    #[must_use]
    pub fn is_active(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Ids of every active session, sorted.
    #[must_use]
    pub fn session_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.sessions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn session_mut(&mut self, session_id: &str) -> &mut Session {
        self.sessions.entry(session_id.to_string()).or_default()
    }
}
