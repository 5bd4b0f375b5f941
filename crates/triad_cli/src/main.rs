//! # Triad CLI
//!
//! The `triad` binary puts the graph, team and direct agents side by side.
//!
//! ## Commands
//!
//! - `triad [chat] [--framework F] [--model KEY] [--mode demo|interactive] [--session ID]`
//! - `triad models` - every model grouped by provider, with availability
//! - `triad doctor` - configured and missing API keys
//!
//! Anything not given on the command line is asked for with a numbered menu.
//! A `.env` file in the working directory is loaded before the environment
//! is read.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{BufRead, Write};
use tracing::info;
use triad_agent::AgentSession;
use triad_models::{Environment, ModelManager};

mod cli;
mod menu;
mod repl;
mod report;
mod telemetry;

use cli::{ChatArgs, Cli, Command, Mode};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    cli.logging.tracing_config().init();
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let manager = ModelManager::new(&Environment::from_process());
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    match cli.command.unwrap_or_default() {
        Command::Chat(args) => chat(&manager, args, &mut input, &mut out).await,
        Command::Models => report::models(&manager, &mut out),
        Command::Doctor => {
            let usable = report::doctor(&manager, &mut out)?;
            anyhow::ensure!(usable, "no model is usable");
            Ok(())
        }
    }
}

async fn chat<R, W>(
    manager: &ModelManager,
    args: ChatArgs,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let framework = match args.framework {
        Some(framework) => framework,
        None => menu::choose("Agent framework", menu::framework_choices(), input, out)?,
    };
    let model_key = match args.model {
        Some(key) => key,
        None => {
            let choices = menu::model_choices(manager);
            anyhow::ensure!(
                !choices.is_empty(),
                "no model is available; run `triad doctor` to see what is missing"
            );
            menu::choose("Available models", choices, input, out)?
        }
    };
    let mode = match args.mode {
        Some(mode) => mode,
        None => menu::choose("Mode", menu::mode_choices(), input, out)?,
    };

    writeln!(out, "\nStarting the {framework} agent...")?;
    let agent = framework
        .build(manager, &model_key)
        .with_context(|| format!("failed to start the {framework} agent with `{model_key}`"))?;
    if agent.model_key() != model_key {
        writeln!(
            out,
            "Model `{model_key}` is not available, using `{}` instead.",
            agent.model_key()
        )?;
    }
    writeln!(out, "Using model `{}`.", agent.model_key())?;

    let mut session = AgentSession::from_boxed(agent);
    match mode {
        Mode::Demo => repl::demo(&mut session, out).await,
        Mode::Interactive => repl::interactive(&mut session, &args.session, input, out).await,
    }
}
