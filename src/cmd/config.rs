use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_CASES_DIR, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, StoredConfig, config_file_path,
};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring case-copilot.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt(
        "Ollama base URL (e.g., http://localhost:11434)",
        &mut cfg.ollama_url,
    )?;
    apply_prompt("Default model", &mut cfg.default_model)?;
    apply_prompt("Mock case directory", &mut cfg.cases_dir)?;
    apply_prompt("Temperature (0-1)", &mut cfg.temperature)?;
    apply_prompt("Top-p (0-1]", &mut cfg.top_p)?;
    apply_prompt("Max output tokens", &mut cfg.max_tokens)?;

    cfg.sampling().check().map_err(AppError::Configuration)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;
    let sampling = cfg.sampling();

    println!("Configuration file: {}", path.display());
    println!(
        "Ollama base URL: {}",
        display_value(&cfg.ollama_url, DEFAULT_OLLAMA_URL)
    );
    println!(
        "Default model: {}",
        display_value(&cfg.default_model, DEFAULT_MODEL)
    );
    println!(
        "Mock case directory: {}",
        display_value(&cfg.cases_dir, DEFAULT_CASES_DIR)
    );
    println!("Temperature: {}", sampling.temperature);
    println!("Top-p: {}", sampling.top_p);
    println!("Max output tokens: {}", sampling.num_predict);

    Ok(())
}

fn apply_prompt<T>(field: &str, target: &mut Option<T>) -> AppResult<()>
where
    T: FromStr + Display,
    T::Err: Display,
{
    loop {
        let current = target.as_ref().map(|value| value.to_string());
        match prompt(field, current.as_deref())? {
            PromptAction::Keep => return Ok(()),
            PromptAction::Clear => {
                *target = None;
                return Ok(());
            }
            PromptAction::Set(raw) => match raw.parse::<T>() {
                Ok(value) => {
                    *target = Some(value);
                    return Ok(());
                }
                Err(err) => println!("Invalid value '{raw}': {err}"),
            },
        }
    }
}

fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match current {
        Some(value) => write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(parse_action(&input))
}

fn parse_action(input: &str) -> PromptAction {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        PromptAction::Keep
    } else if trimmed == "-" {
        PromptAction::Clear
    } else {
        PromptAction::Set(trimmed.to_string())
    }
}

fn display_value(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("{default} (default)"))
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prompt_actions() {
        assert_eq!(parse_action("\n"), PromptAction::Keep);
        assert_eq!(parse_action(" - \n"), PromptAction::Clear);
        assert_eq!(
            parse_action("mistral:7b\n"),
            PromptAction::Set("mistral:7b".to_string())
        );
    }

    #[test]
    fn shows_defaults_for_unset_values() {
        assert_eq!(
            display_value(&None, DEFAULT_MODEL),
            "llama3.2:latest (default)"
        );
        assert_eq!(
            display_value(&Some("qwen2.5:7b".to_string()), DEFAULT_MODEL),
            "qwen2.5:7b"
        );
    }
}
