mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::ask::{self, AskCommandArgs};
use crate::cmd::catalog;
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::copilot::{self, CopilotCommandArgs};
use crate::config::{AppConfig, ConfigOverrides};
use crate::context::AppContext;
use crate::domain::prompt::PromptPreset;
use crate::error::AppResult;
use crate::infra::case_files::FileCaseStore;
use crate::infra::ollama::OllamaClient;

#[derive(Parser)]
#[command(
    name = "case-copilot",
    author,
    version,
    about = "On-prem LLM copilot for ServiceNow case management"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Ollama model to use instead of the configured default.
    #[arg(short, long, global = true)]
    model: Option<String>,
    /// Sampling temperature (0-1).
    #[arg(long, global = true)]
    temperature: Option<f64>,
    /// Nucleus sampling threshold (0-1].
    #[arg(long, global = true)]
    top_p: Option<f64>,
    /// Maximum number of tokens to generate.
    #[arg(long, global = true)]
    max_tokens: Option<u32>,
    /// Directory holding the mock `<case>.json` files.
    #[arg(long, global = true)]
    cases_dir: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft a free-text case update and print it.
    Ask(AskArgs),
    /// Interactive copilot with structured sections.
    Copilot(CopilotArgs),
    /// List the available mock cases.
    Cases,
    /// List the models installed in Ollama.
    Models,
    /// Check whether the local AI engine is reachable.
    Status,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct AskArgs {
    /// Case number; prompted for when omitted.
    case: Option<String>,
}

#[derive(Args)]
struct CopilotArgs {
    /// Show model controls, raw JSON, the prompt and the case used.
    #[arg(short, long)]
    advanced: bool,
    /// Ask for free-text sections instead of structured JSON.
    #[arg(long)]
    free_text: bool,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(())
        }
        Commands::Ask(args) => {
            let context = build_context(&cli.global)?;
            ask::run(&context, AskCommandArgs { case: args.case }).await
        }
        Commands::Copilot(args) => {
            let context = build_context(&cli.global)?;
            copilot::run(
                &context,
                CopilotCommandArgs {
                    advanced: args.advanced,
                    preset: if args.free_text {
                        PromptPreset::FreeText
                    } else {
                        PromptPreset::Structured
                    },
                },
            )
            .await
        }
        Commands::Cases => catalog::list_cases(&build_context(&cli.global)?).await,
        Commands::Models => catalog::list_models(&build_context(&cli.global)?).await,
        Commands::Status => catalog::status(&build_context(&cli.global)?).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "case_copilot=debug"
    } else {
        "case_copilot=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_context(global: &GlobalArgs) -> AppResult<AppContext> {
    let cwd = std::env::current_dir()?;
    let overrides = ConfigOverrides {
        model: global.model.clone(),
        temperature: global.temperature,
        top_p: global.top_p,
        max_tokens: global.max_tokens,
        cases_dir: global.cases_dir.clone(),
    };
    let config = AppConfig::load(&cwd, &overrides)?;
    tracing::debug!(
        ollama_url = %config.ollama_url,
        cases_dir = %config.cases_dir.display(),
        model = %config.model,
        "configuration loaded"
    );

    let case_store = Arc::new(FileCaseStore::new(config.cases_dir.clone()));
    let language_model = Arc::new(OllamaClient::new(
        config.ollama_url.clone(),
        config.timeouts,
    ));

    Ok(AppContext::new(config, case_store, language_model))
}
