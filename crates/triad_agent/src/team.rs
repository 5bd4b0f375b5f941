//! Multi-member team agent.

use crate::graph::normalize_label;
use crate::session::Turn;
use crate::{Agent, AgentError, Reply, ask, bind_model};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use triad_model_providers::ClientOptions;
use triad_models::ModelManager;
use triad_models::llm::{GenerationRequest, Llm};

/// Routes chosen by the team classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamTask {
    /// Greetings and basic questions.
    SimpleChat,
    /// Arithmetic.
    Calculation,
    /// Needs information gathered first.
    Research,
    /// Markets and companies.
    FinancialAnalysis,
    /// Needs deep analysis and reasoning.
    ComplexAnalysis,
}

impl TeamTask {
    /// Every route, in the order offered to the classifier.
    pub const ALL: [Self; 5] = [
        Self::SimpleChat,
        Self::Calculation,
        Self::Research,
        Self::FinancialAnalysis,
        Self::ComplexAnalysis,
    ];

    /// The label the classifier is asked to return.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleChat => "simple_chat",
            Self::Calculation => "calculation",
            Self::Research => "research",
            Self::FinancialAnalysis => "financial_analysis",
            Self::ComplexAnalysis => "complex_analysis",
        }
    }

    /// Reads a classifier answer. Anything unrecognised is [`SimpleChat`](Self::SimpleChat).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = normalize_label(label);
        Self::ALL
            .into_iter()
            .find(|task| task.as_str() == label)
            .unwrap_or(Self::SimpleChat)
    }

    /// Returns `true` if the whole team handles this route.
    #[must_use]
    pub fn needs_team(self) -> bool {
        !matches!(self, Self::SimpleChat | Self::Calculation)
    }
}

impl core::fmt::Display for TeamTask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specialist on the research team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    /// Display name.
    pub name: &'static str,
    /// What the member is responsible for.
    pub role: &'static str,
    /// Standing instructions.
    pub instructions: &'static [&'static str],
}

impl Member {
    fn system_prompt(&self) -> String {
        let mut prompt = format!("You are the {}. You are {}.\n", self.name, self.role);
        for instruction in self.instructions {
            prompt.push_str("- ");
            prompt.push_str(instruction);
            prompt.push('\n');
        }
        prompt.push_str("Format your contribution in Markdown.");
        prompt
    }
}

/// Research team members, in the order they contribute.
pub const MEMBERS: [Member; 3] = [
    Member {
        name: "web researcher",
        role: "responsible for finding and collecting information",
        instructions: &[
            "Focus on high-quality, authoritative sources",
            "Name the sources behind each claim",
            "Prefer the most recent information",
            "Filter and organise what you find",
        ],
    },
    Member {
        name: "financial analyst",
        role: "responsible for financial data and stock research",
        instructions: &[
            "Provide in-depth financial analysis",
            "Use tables for key figures",
            "Include a risk assessment",
            "Give a clear investment view",
        ],
    },
    Member {
        name: "reasoning expert",
        role: "responsible for logical reasoning and synthesis",
        instructions: &[
            "Solve complex problems step by step",
            "Show the complete chain of thought",
            "Look at the problem from several angles",
            "Reach conclusions backed by the reasoning",
        ],
    },
];

const LEAD_SYSTEM_PROMPT: &str = "You lead a research team. \
Combine the members' contributions into one comprehensive, accurate answer. \
Keep the reasoning clear and the structure tidy, and format the answer in Markdown.";

const CHAT_SYSTEM_PROMPT: &str = "You are a conversation assistant for everyday chat and simple questions. \
Give friendly, useful answers. Answer simple questions directly, \
and for calculations show the working and the result.";

/// Classifier-routed agent backed by a sequential research team.
#[derive(Debug, Clone)]
pub struct TeamAgent {
    model_key: String,
    llm: Llm,
}

impl TeamAgent {
    /// Overrides applied to the model client. The team keeps the model
    /// config's sampling settings.
    #[must_use]
    pub fn client_options() -> ClientOptions {
        ClientOptions::default()
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

    async fn classify(&self, message: &str) -> Result<TeamTask, AgentError> {
        let prompt = format!(
            "Analyse the following user request and classify it.

User request: {message}

Categories:
1. simple_chat - small talk, greetings, basic questions
2. calculation - math calculations
3. research - research that needs information to be looked up
4. financial_analysis - finance and stock analysis
5. complex_analysis - complex tasks that need deep analysis and reasoning

Return only the category name and nothing else."
        );
        Ok(TeamTask::from_label(&ask(&self.llm, prompt).await?))
    }

    async fn chat_assistant(&self, history: &[Turn], message: &str) -> Result<String, AgentError> {
        let request = GenerationRequest::with_system(CHAT_SYSTEM_PROMPT, message)
            .history(history.iter().map(Turn::to_message).collect());
        Ok(self.llm.generate(request).await?.text())
    }

    async fn contribute(
        &self,
        member: &Member,
        topic: &str,
        contributions: &[(Member, String)],
    ) -> Result<String, AgentError> {
        let mut prompt = topic.to_string();
        if !contributions.is_empty() {
            prompt.push_str("\n\nContributions so far:\n");
            prompt.push_str(&render(contributions));
        }
        let request = GenerationRequest::with_system(member.system_prompt(), prompt);
        Ok(self.llm.generate(request).await?.text())
    }

    async fn lead(
        &self,
        topic: &str,
        contributions: &[(Member, String)],
    ) -> Result<String, AgentError> {
        let prompt = format!(
            "{topic}\n\nTeam contributions:\n{}\nWrite the team's final answer.",
            render(contributions)
        );
        let request = GenerationRequest::with_system(LEAD_SYSTEM_PROMPT, prompt);
        Ok(self.llm.generate(request).await?.text())
    }
}

fn render(contributions: &[(Member, String)]) -> String {
    contributions
        .iter()
        .map(|(member, text)| format!("## {}\n{}\n", member.name, text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Agent for TeamAgent {
    async fn respond(&self, history: &[Turn], message: &str) -> Result<Reply, AgentError> {
        let task = self.classify(message).await?;
        let mut steps = vec![format!("Task classification: {task}")];
        debug!(route = %task, "request classified");

        if !task.needs_team() {
            let text = self.chat_assistant(history, message).await?;
            steps.push("Answered by the conversation assistant".to_string());
            return Ok(Reply::new(text).with_steps(steps));
        }

        let topic = format!("Research in depth: {message}");
        let mut contributions = Vec::with_capacity(MEMBERS.len());
        for member in MEMBERS {
            let text = self.contribute(&member, &topic, &contributions).await?;
            steps.push(format!("The {} contributed", member.name));
            contributions.push((member, text));
        }

        let answer = self.lead(&topic, &contributions).await?;
        steps.push("The team lead combined the contributions".to_string());
        Ok(Reply::new(answer).with_steps(steps))
    }

    fn model_key(&self) -> &str {
        &self.model_key
    }

    fn name(&self) -> &str {
        "team"
    }

    fn failure_reply(&self, error: &AgentError) -> String {
        format!("Workflow failed: {error}")
    }
}
