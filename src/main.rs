//! engrave - CLI entry point.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use engrave::config::Settings;
use engrave::flow::{run_commit_flow, FlowConfig};
use engrave::git::DiffMode;
use engrave::llm::{DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};

/// Generate a git commit message with an LLM and commit interactively.
#[derive(Parser, Debug)]
#[command(name = "engrave")]
#[command(about = "Generate a git commit message with an LLM and commit interactively")]
#[command(version)]
struct Cli {
    /// Describe staged changes only (default)
    #[arg(long, conflicts_with = "tracked")]
    staged: bool,

    /// Describe unstaged changes in tracked files and commit with `git commit -a`
    #[arg(long)]
    tracked: bool,

    /// Model identifier to request (overrides the configured default)
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Custom system prompt (overrides the configured default)
    #[arg(short = 's', long)]
    system: Option<String>,

    /// Maximum diff characters sent to the LLM before truncation
    #[arg(long)]
    max_chars: Option<usize>,

    /// API key (overrides ENGRAVE_API_KEY / OPENAI_API_KEY)
    #[arg(long)]
    key: Option<String>,

    /// Skip interactive editing and commit the generated message directly
    #[arg(short = 'y', long)]
    yes: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// View or change persisted defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration and its file path
    View,
    /// Delete the persisted configuration
    Reset,
    /// Persist a default model
    SetModel { model: String },
    /// Persist a custom system prompt
    SetSystem { prompt: String },
    /// Persist a diff size cap
    SetMaxChars { chars: usize },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load();

    if let Some(Command::Config { action }) = cli.command {
        return match run_config(action, settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", style(format!("Error: {e}")).red());
                ExitCode::from(engrave::AppError::Config(e).exit_code())
            }
        };
    }

    let mode = if cli.tracked {
        DiffMode::Tracked
    } else {
        DiffMode::Staged
    };

    let config = FlowConfig {
        mode,
        model: cli
            .model
            .or(settings.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        system_prompt: cli
            .system
            .or(settings.system.clone())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        max_chars: settings.effective_max_chars(cli.max_chars),
        key_override: cli.key,
        skip_editing: cli.yes,
    };

    match run_commit_flow(config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style(format!("Error: {e}")).red());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_config(action: ConfigAction, mut settings: Settings) -> Result<(), engrave::ConfigError> {
    match action {
        ConfigAction::View => {
            let path = Settings::path()?;
            println!("Config file: {}", path.display());
            println!(
                "model:     {}",
                settings.model.as_deref().unwrap_or(DEFAULT_MODEL)
            );
            println!(
                "system:    {}",
                settings
                    .system
                    .as_deref()
                    .map(|_| "(custom)")
                    .unwrap_or("(built-in)")
            );
            println!("max_chars: {}", settings.effective_max_chars(None));
            Ok(())
        }
        ConfigAction::Reset => {
            Settings::reset()?;
            println!("Configuration reset to defaults.");
            Ok(())
        }
        ConfigAction::SetModel { model } => {
            settings.model = Some(model);
            settings.save()?;
            println!("Default model saved.");
            Ok(())
        }
        ConfigAction::SetSystem { prompt } => {
            settings.system = Some(prompt);
            settings.save()?;
            println!("System prompt saved.");
            Ok(())
        }
        ConfigAction::SetMaxChars { chars } => {
            settings.max_chars = Some(chars);
            settings.save()?;
            println!("Diff size cap saved.");
            Ok(())
        }
    }
}
