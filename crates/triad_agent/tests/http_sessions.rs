//! Agent sessions against a discovered HTTP model served by a mock server.

use mockito::{Matcher, Server};
use serde_json::json;
use triad_agent::{AgentSession, DEFAULT_SESSION, Framework, TurnRole};
use triad_models::{Environment, ModelManager};

fn completion_body(text: &str) -> String {
    json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]}).to_string()
}

fn manager_for(url: &str) -> ModelManager {
    ModelManager::new(&Environment::from_pairs([
        ("HTTP_ECHO_API_KEY", "sk-echo"),
        ("HTTP_ECHO_BASE_URL", url),
    ]))
}

#[tokio::test]
async fn direct_session_records_both_turns() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat")
        .match_header("authorization", "Bearer sk-echo")
        .match_body(Matcher::PartialJson(json!({"model": "echo", "max_tokens": 4096})))
        .with_status(200)
        .with_body(completion_body("pong"))
        .create_async()
        .await;

    let manager = manager_for(&format!("{}/chat", server.url()));
    let agent = Framework::Direct.build(&manager, "http-echo").expect("agent");
    let mut session = AgentSession::from_boxed(agent);

    let reply = session.chat("ping", DEFAULT_SESSION).await;

    mock.assert_async().await;
    assert_eq!(reply, "pong");
    assert_eq!(session.model_key(), "http-echo");
    let roles: Vec<_> = session
        .history(DEFAULT_SESSION)
        .iter()
        .map(|turn| turn.role)
        .collect();
    assert_eq!(roles, vec![TurnRole::User, TurnRole::Assistant]);
}

#[tokio::test]
async fn upstream_error_becomes_the_reply() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let manager = manager_for(&format!("{}/chat", server.url()));
    let mut session =
        AgentSession::from_boxed(Framework::Direct.build(&manager, "http-echo").expect("agent"));

    let reply = session.chat("ping", "s1").await;

    assert!(reply.starts_with("Model call failed"), "{reply}");
    assert!(reply.contains("500"), "{reply}");
    assert_eq!(session.history("s1").len(), 2);
    assert!(session.history(DEFAULT_SESSION).is_empty());
}

#[tokio::test]
async fn graph_session_runs_the_research_chain() {
    let mut server = Server::new_async().await;
    // Every node receives the same answer, so the classifier routes to research.
    let mock = server
        .mock("POST", "/chat")
        .with_status(200)
        .with_body(completion_body("research"))
        .expect(7)
        .create_async()
        .await;

    let manager = manager_for(&format!("{}/chat", server.url()));
    let mut session =
        AgentSession::from_boxed(Framework::Graph.build(&manager, "http-echo").expect("agent"));

    let reply = session.chat("how do async runtimes differ?", "s").await;

    mock.assert_async().await;
    assert_eq!(reply, "research");
    let steps = session.reasoning_steps("s");
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[0], "Task classification: research");
    assert_eq!(steps[2], "Completed information gathering for 1 search queries");

    session.clear("s");
    assert!(session.reasoning_steps("s").is_empty());
}

#[tokio::test]
async fn unavailable_model_falls_back() {
    let manager = manager_for("http://127.0.0.1:9/chat");
    let agent = Framework::Team
        .build(&manager, "claude-3-opus")
        .expect("fallback model");
    assert_eq!(agent.model_key(), "llama2");
    assert_eq!(agent.name(), "team");
}
