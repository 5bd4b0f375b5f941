//! Numbered selection menus.

use crate::cli::Mode;
use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use triad_agent::Framework;
use triad_models::ModelManager;

/// One selectable entry.
pub struct Choice<T> {
    pub label: String,
    pub detail: Option<String>,
    pub value: T,
}

/// Reads a menu answer. Blank picks the first entry; otherwise a 1-based index.
pub fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let answer = answer.trim();
    if answer.is_empty() {
        return (len > 0).then_some(0);
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Shows `choices` and reads until a valid answer arrives.
///
/// Fails if input ends first or there is nothing to choose from.
pub fn choose<T, R, W>(
    title: &str,
    mut choices: Vec<Choice<T>>,
    input: &mut R,
    out: &mut W,
) -> Result<T>
where
    R: BufRead,
    W: Write,
{
    if choices.is_empty() {
        bail!("nothing to choose from for {title}");
    }

    writeln!(out, "\n{title}:")?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, choice.label)?;
        if let Some(detail) = &choice.detail {
            writeln!(out, "   {detail}")?;
        }
    }

    let len = choices.len();
    loop {
        write!(out, "\nSelect (1-{len}, default 1): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before a choice was made");
        }
        if let Some(index) = parse_choice(&line, len) {
            return Ok(choices.swap_remove(index).value);
        }
        writeln!(out, "Please enter a number between 1 and {len}")?;
    }
}

pub fn framework_choices() -> Vec<Choice<Framework>> {
    Framework::ALL
        .into_iter()
        .map(|framework| Choice {
            label: framework.as_str().to_string(),
            detail: Some(framework.description().to_string()),
            value: framework,
        })
        .collect()
}

/// Available models only, in registry order.
pub fn model_choices(manager: &ModelManager) -> Vec<Choice<String>> {
    manager
        .available()
        .into_iter()
        .map(|config| Choice {
            label: format!("({}) {}: {}", config.provider(), config.key(), config.name()),
            detail: Some(config.description().to_string()).filter(|d| !d.is_empty()),
            value: config.key().to_string(),
        })
        .collect()
}

pub fn mode_choices() -> Vec<Choice<Mode>> {
    vec![
        Choice {
            label: "Demo".to_string(),
            detail: Some("Run the built-in sample questions".to_string()),
            value: Mode::Demo,
        },
        Choice {
            label: "Interactive".to_string(),
            detail: Some("Chat from the keyboard".to_string()),
            value: Mode::Interactive,
        },
    ]
}
