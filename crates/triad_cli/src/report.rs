//! `models` and `doctor` output.

use anyhow::Result;
use std::io::Write;
use triad_models::{ModelManager, ProviderTag};

/// Lists every model grouped by provider.
pub fn models<W: Write>(manager: &ModelManager, out: &mut W) -> Result<()> {
    writeln!(out, "Model configuration")?;
    writeln!(out, "{}", "=".repeat(80))?;

    for provider in ProviderTag::ALL {
        let configs = manager.list_by_provider(provider);
        if configs.is_empty() {
            continue;
        }
        writeln!(out, "\n{}:", provider.as_str().to_uppercase())?;
        for config in configs {
            let mark = if config.is_available() { "[ok]" } else { "[--]" };
            writeln!(out, "  {mark} {}: {}", config.key(), config.name())?;
            if !config.description().is_empty() {
                writeln!(out, "       {}", config.description())?;
            }
            if !config.is_available()
                && let Some(env_var) = config.api_key_env()
            {
                writeln!(out, "       set {env_var} to enable")?;
            }
        }
    }

    let report = manager.environment_report();
    writeln!(out, "\n{}", "=".repeat(80))?;
    writeln!(
        out,
        "{}/{} models available",
        report.available_models, report.total_models
    )?;
    Ok(())
}

/// Summarises which secrets are configured and which are missing.
///
/// Returns `true` when at least one model can be used.
pub fn doctor<W: Write>(manager: &ModelManager, out: &mut W) -> Result<bool> {
    let report = manager.environment_report();
    writeln!(out, "Environment check")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(
        out,
        "Models available: {}/{} ({:.0}%)",
        report.available_models,
        report.total_models,
        report.availability_rate * 100.0
    )?;

    if report.missing_keys.is_empty() {
        writeln!(out, "\nEvery model has its API key.")?;
    } else {
        writeln!(out, "\nMissing API keys:")?;
        for (provider, missing) in &report.missing_keys {
            writeln!(out, "  {provider}:")?;
            for entry in missing {
                writeln!(
                    out,
                    "    {} ({}): set {}",
                    entry.model_key, entry.model_name, entry.env_var
                )?;
            }
        }
    }

    let suspicious: Vec<_> = manager
        .list()
        .iter()
        .map(|config| manager.availability_status(config.key()))
        .filter(|status| status.placeholder_api_key)
        .collect();
    if !suspicious.is_empty() {
        writeln!(out, "\nKeys that look like sample values:")?;
        for status in suspicious {
            writeln!(out, "  {}", status.model_key)?;
        }
    }

    let usable = report.available_models > 0;
    if !usable {
        writeln!(out, "\nNo model is usable. Add API keys to .env and try again.")?;
    }
    Ok(usable)
}
