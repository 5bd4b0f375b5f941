//! Command-line arguments.

use crate::telemetry::{TracingConfig, TracingFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;
use triad_agent::{DEFAULT_SESSION, Framework};

/// Compare three chat-agent styles over one model registry.
#[derive(Debug, Parser)]
#[command(name = "triad", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LogArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Logging flags shared by every subcommand.
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Maximum log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: Level,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = TracingFormat::Compact)]
    pub log_format: TracingFormat,

    /// Target filter, e.g. `triad_models=debug,reqwest=warn`
    #[arg(long, global = true, env = "TRIAD_LOG")]
    pub log_filter: Option<String>,

    /// Log span enter and exit events
    #[arg(long, global = true)]
    pub log_spans: bool,
}

impl LogArgs {
    /// Subscriber configuration for these flags.
    pub fn tracing_config(&self) -> TracingConfig {
        let config = TracingConfig::default()
            .with_level(self.log_level)
            .with_format(self.log_format)
            .with_span_events(self.log_spans);
        match &self.log_filter {
            Some(filter) => config.with_env_filter(filter.as_str()),
            None => config,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with an agent (default)
    Chat(ChatArgs),
    /// List every model grouped by provider, with availability
    Models,
    /// Check which API keys are configured
    Doctor,
}

impl Default for Command {
    fn default() -> Self {
        Self::Chat(ChatArgs::default())
    }
}

/// How the chat runs once the agent is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Run the canned demo questions
    Demo,
    /// Read messages from stdin
    Interactive,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Agent style: graph, team or direct. Prompts when omitted.
    #[arg(long, env = "TRIAD_FRAMEWORK")]
    pub framework: Option<Framework>,

    /// Model key. Prompts when omitted.
    #[arg(long, env = "TRIAD_MODEL")]
    pub model: Option<String>,

    /// Demo or interactive. Prompts when omitted.
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Session id for interactive mode
    #[arg(long, default_value = DEFAULT_SESSION)]
    pub session: String,
}

impl Default for ChatArgs {
    fn default() -> Self {
        Self {
            framework: None,
            model: None,
            mode: None,
            session: DEFAULT_SESSION.to_string(),
        }
    }
}
