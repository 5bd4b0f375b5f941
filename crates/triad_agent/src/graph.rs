//! Routed workflow agent.
//!
//! A classifier picks a route for each message. Conversational messages get
//! one answer with the full history; everything else runs a fixed chain:
//!
//! ```text
//! classify ─┬─ simple_chat ──────────────────────────────────────────────► reply
//!           └─ research | analysis | planning
//!                 └─ plan → queries → research → analyse → reason → synthesise ► reply
//! ```
//!
//! Every node appends a line to the reply's steps.

use crate::session::Turn;
use crate::{Agent, AgentError, Reply, ask, bind_model};
use async_trait::async_trait;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;
use triad_model_providers::ClientOptions;
use triad_models::ModelManager;
use triad_models::llm::{GenerationRequest, Llm};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_QUERIES: usize = 3;

const CHAT_SYSTEM_PROMPT: &str = "You are a friendly and helpful AI assistant. You can:
1. Hold everyday conversations
2. Answer general questions
3. Work through math problems
4. Share what you know about recent events and markets
Answer directly and keep the conversation going naturally.";

/// Routes chosen by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Greetings and basic questions.
    SimpleChat,
    /// Needs information gathered first.
    Research,
    /// Needs in-depth analysis.
    Analysis,
    /// Needs a plan or strategy.
    Planning,
}

impl TaskKind {
    /// Every route, in the order offered to the classifier.
    pub const ALL: [Self; 4] = [
        Self::SimpleChat,
        Self::Research,
        Self::Analysis,
        Self::Planning,
    ];

    /// The label the classifier is asked to return.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleChat => "simple_chat",
            Self::Research => "research",
            Self::Analysis => "analysis",
            Self::Planning => "planning",
        }
    }

    /// Reads a classifier answer. Anything unrecognised is [`SimpleChat`](Self::SimpleChat).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = normalize_label(label);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == label)
            .unwrap_or(Self::SimpleChat)
    }
}

impl core::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trims whitespace, quotes and trailing punctuation, then lower-cases.
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_matches(|c: char| matches!(c, '`' | '"' | '\'' | '.' | '*'))
        .trim()
        .to_ascii_lowercase()
}

/// One step of an execution plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// What to do.
    #[serde(default)]
    pub action: String,
    /// What the step should produce.
    #[serde(default)]
    pub expected_result: String,
}

impl PlanStep {
    fn new(name: &str, action: &str, expected_result: &str) -> Self {
        Self {
            name: name.to_string(),
            action: action.to_string(),
            expected_result: expected_result.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct Plan {
    #[serde(default)]
    steps: Vec<PlanStep>,
}

/// Plan used when the model's answer holds no usable JSON.
#[must_use]
pub fn default_plan() -> Vec<PlanStep> {
    vec![
        PlanStep::new(
            "Information gathering",
            "Collect relevant information",
            "Background knowledge",
        ),
        PlanStep::new(
            "In-depth analysis",
            "Analyse the collected information",
            "Preliminary conclusions",
        ),
        PlanStep::new(
            "Reasoning and synthesis",
            "Reason through the findings",
            "Final answer",
        ),
    ]
}

/// Extracts the plan from a model answer.
///
/// Accepts bare JSON or JSON wrapped in prose or a code fence. Falls back to
/// [`default_plan`] when nothing parses or the plan is empty.
#[must_use]
pub fn parse_plan(text: &str) -> Vec<PlanStep> {
    let json = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };
    match serde_json::from_str::<Plan>(json) {
        Ok(plan) if !plan.steps.is_empty() => plan.steps,
        Ok(_) => default_plan(),
        Err(err) => {
            debug!(error = %err, "plan was not valid JSON, using the default plan");
            default_plan()
        }
    }
}

/// Splits a model answer into at most three search queries.
///
/// Blank lines are dropped and list markers (`-`, `*`, `1.`) stripped.
#[must_use]
pub fn parse_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .take(MAX_QUERIES)
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let line = match rest.strip_prefix(['.', ')']) {
        Some(stripped) if rest.len() < line.len() => stripped,
        _ => line,
    };
    line.trim_start_matches(['-', '*', '•']).trim()
}

/// Classifier-routed agent with a sequential research chain.
#[derive(Debug, Clone)]
pub struct GraphAgent {
    model_key: String,
    llm: Llm,
}

impl GraphAgent {
    /// Overrides applied to the model client: temperature 0.1 and a 30 s
    /// timeout for HTTP models.
    #[must_use]
    pub fn client_options() -> ClientOptions {
        ClientOptions::default()
            .temperature(0.1)
            .http_timeout(HTTP_TIMEOUT)
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

    async fn classify(&self, message: &str) -> Result<TaskKind, AgentError> {
        let prompt = format!(
            "Classify the user's request as exactly one of these types:
1. simple_chat - small talk, greetings, basic questions
2. research - needs information to be looked up
3. analysis - needs in-depth analysis
4. planning - needs a plan or strategy

User request: {message}

Return only the type name and nothing else."
        );
        Ok(TaskKind::from_label(&ask(&self.llm, prompt).await?))
    }

    async fn simple_chat(&self, history: &[Turn], message: &str) -> Result<String, AgentError> {
        let request = GenerationRequest::with_system(CHAT_SYSTEM_PROMPT, message)
            .history(history.iter().map(Turn::to_message).collect());
        Ok(self.llm.generate(request).await?.text())
    }

    async fn plan(&self, kind: TaskKind, task: &str) -> Result<Vec<PlanStep>, AgentError> {
        let prompt = format!(
            r#"Draw up a detailed execution plan for the following {kind} task.

Task: {task}

Break the task into concrete steps. Each step has a name, an action and an
expected result. Return the plan as JSON in this shape:
{{
  "steps": [
    {{"name": "step name", "action": "concrete action", "expected_result": "expected result"}}
  ]
}}"#
        );
        Ok(parse_plan(&ask(&self.llm, prompt).await?))
    }

    async fn search_queries(&self, task: &str) -> Result<Vec<String>, AgentError> {
        let prompt = format!(
            "Write 2-3 effective search queries for the following task.

Task: {task}

The queries should surface relevant, accurate information.
Put one query per line, without numbering."
        );
        Ok(parse_queries(&ask(&self.llm, prompt).await?))
    }

    async fn research(
        &self,
        task: &str,
        plan: &[PlanStep],
        queries: &[String],
    ) -> Result<String, AgentError> {
        let plan = plan
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}: {}", i + 1, step.name, step.action))
            .collect::<Vec<_>>()
            .join("\n");
        let queries = queries
            .iter()
            .map(|query| format!("- {query}"))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Gather what you know that bears on the task below, answering each query in turn.

Task: {task}

Plan:
{plan}

Queries:
{queries}

For each query write concise notes with the key facts, figures and sources you are aware of."
        );
        ask(&self.llm, prompt).await
    }

    async fn analyse(&self, task: &str, notes: &str) -> Result<String, AgentError> {
        let prompt = format!(
            "Using the information collected, analyse the following task in depth.

Task: {task}

Collected information:
{notes}

Cover:
1. Summary of the key information
2. Important findings and trends
3. Comparison of differing viewpoints
4. Potential impact and significance

Organise the analysis in a structured way."
        );
        ask(&self.llm, prompt).await
    }

    async fn reason(&self, task: &str, analysis: &str) -> Result<String, AgentError> {
        let prompt = format!(
            "Based on the analysis, reason step by step towards an answer to the user's question.

Original question: {task}

Analysis: {analysis}

Follow this structure:
1. Understanding: restate the core question
2. Key factors: identify what the answer depends on
3. Reasoning: derive intermediate conclusions from the evidence, then combine them
4. Verification: check that the conclusion holds up
5. Final answer: a clear, direct answer"
        );
        ask(&self.llm, prompt).await
    }

    async fn synthesise(
        &self,
        task: &str,
        analysis: &str,
        reasoning: &str,
    ) -> Result<String, AgentError> {
        let prompt = format!(
            "Combine the analysis and reasoning below into one complete, clear final answer.

Original question: {task}

Analysis: {analysis}

Reasoning: {reasoning}

Provide:
1. A direct answer
2. Supporting evidence and rationale
3. Relevant background
4. Suggested next steps, if any

Write naturally and make it easy to follow."
        );
        ask(&self.llm, prompt).await
    }
}

#[async_trait]
impl Agent for GraphAgent {
    async fn respond(&self, history: &[Turn], message: &str) -> Result<Reply, AgentError> {
        let kind = self.classify(message).await?;
        let mut steps = vec![format!("Task classification: {kind}")];
        debug!(route = %kind, "request classified");

        if kind == TaskKind::SimpleChat {
            let text = self.simple_chat(history, message).await?;
            return Ok(Reply::new(text).with_steps(steps));
        }

        let plan = self.plan(kind, message).await?;
        steps.push(format!("Created an execution plan with {} steps", plan.len()));

        let queries = self.search_queries(message).await?;
        let notes = self.research(message, &plan, &queries).await?;
        steps.push(format!(
            "Completed information gathering for {} search queries",
            queries.len()
        ));

        let analysis = self.analyse(message, &notes).await?;
        steps.push("Completed information analysis".to_string());

        let reasoning = self.reason(message, &analysis).await?;
        steps.push("Completed logical reasoning".to_string());

        let answer = self.synthesise(message, &analysis, &reasoning).await?;
        steps.push("Completed synthesis of the final answer".to_string());

        Ok(Reply::new(answer).with_steps(steps))
    }

    fn model_key(&self) -> &str {
        &self.model_key
    }

    fn name(&self) -> &str {
        "graph"
    }

    fn failure_reply(&self, error: &AgentError) -> String {
        format!("Sorry, something went wrong while processing your request: {error}")
    }
}
