//! Interactive and demo chat loops.

use anyhow::Result;
use std::io::{BufRead, Write};
use triad_agent::{AgentSession, TurnRole};

/// A line typed at the chat prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    /// Leave the loop.
    Quit,
    /// Forget the current session.
    Clear,
    /// Print the current session.
    History,
    /// Nothing but whitespace.
    Empty,
    /// Anything else, trimmed.
    Message(&'a str),
}

impl<'a> ReplCommand<'a> {
    /// Classifies `line`. Commands match case-insensitively after trimming.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Self::Empty
        } else if line.eq_ignore_ascii_case("quit") {
            Self::Quit
        } else if line.eq_ignore_ascii_case("clear") {
            Self::Clear
        } else if line.eq_ignore_ascii_case("history") {
            Self::History
        } else {
            Self::Message(line)
        }
    }
}

/// Sample questions run in demo mode.
pub const DEMO_CASES: [(&str, &str); 4] = [
    ("Small talk", "Hello! Please introduce yourself and what you can do."),
    ("Calculation", "Please calculate (125 + 75) * 2 - 50."),
    (
        "Research",
        "Summarise the most important recent trends in artificial intelligence.",
    ),
    (
        "Stock analysis",
        "Analyse the investment case for Tesla (TSLA) stock.",
    ),
];

/// Reads messages from `input` until `quit` or end of input.
pub async fn interactive<R, W>(
    session: &mut AgentSession,
    session_id: &str,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        out,
        "\nReady. Type 'quit' to exit, 'clear' to start over, 'history' to review the conversation."
    )?;

    let mut line = String::new();
    loop {
        write!(out, "\nYou: ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        match ReplCommand::parse(&line) {
            ReplCommand::Quit => {
                writeln!(out, "Goodbye!")?;
                return Ok(());
            }
            ReplCommand::Clear => {
                session.clear(session_id);
                writeln!(out, "Conversation cleared.")?;
            }
            ReplCommand::History => write_history(session, session_id, out)?,
            ReplCommand::Empty => {}
            ReplCommand::Message(message) => {
                let reply = session.chat(message, session_id).await;
                writeln!(out, "\nAssistant: {reply}")?;
                write_steps(session, session_id, out)?;
            }
        }
    }
}

/// Runs every [`DEMO_CASES`] question in its own session.
pub async fn demo<W: Write>(session: &mut AgentSession, out: &mut W) -> Result<()> {
    writeln!(out, "\n{}", "=".repeat(60))?;
    writeln!(out, "{} agent demo ({})", session.name(), session.model_key())?;
    writeln!(out, "{}", "=".repeat(60))?;

    for (i, (title, question)) in DEMO_CASES.iter().enumerate() {
        let session_id = format!("demo-{}", i + 1);
        writeln!(out, "\nCase {}: {title}", i + 1)?;
        writeln!(out, "Question: {question}")?;

        let reply = session.chat(question, &session_id).await;
        writeln!(out, "\nAnswer:\n{reply}")?;
        write_steps(session, &session_id, out)?;
        writeln!(out, "\n{}", "-".repeat(40))?;
    }

    writeln!(out, "\nDemo complete.")?;
    Ok(())
}

fn write_history<W: Write>(session: &AgentSession, session_id: &str, out: &mut W) -> Result<()> {
    let history = session.history(session_id);
    if history.is_empty() {
        writeln!(out, "No messages yet.")?;
        return Ok(());
    }
    writeln!(out, "\nConversation ({} messages):", history.len())?;
    for turn in history {
        let speaker = match turn.role {
            TurnRole::User => "You",
            TurnRole::Assistant => "Assistant",
        };
        writeln!(out, "{speaker}: {}", turn.text)?;
    }
    Ok(())
}

fn write_steps<W: Write>(session: &AgentSession, session_id: &str, out: &mut W) -> Result<()> {
    let steps = session.reasoning_steps(session_id);
    if steps.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nSteps:")?;
    for step in steps {
        writeln!(out, "  - {step}")?;
    }
    Ok(())
}
