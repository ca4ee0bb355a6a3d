//! Main entry point for the AI Search command-line client.
#![forbid(unsafe_code)]

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::Config;
use tracing::{debug, error};

mod client;
mod commands;
mod logging;
mod token;

use commands::{
    AppContext, chat::ChatCommand, documents::DocsCommand, session::SessionCommand,
};

/// AI Search CLI
#[derive(Parser, Debug)]
#[command(name = "aisearch")]
#[command(version, about = "Command-line client for AI Search", long_about = None)]
struct Cli {
    /// Path to a configuration file (config.yaml or config.json)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding configuration and environment
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in, sign up, inspect or end the session
    #[command(subcommand)]
    Session(SessionCommand),

    /// Manage conversations and stream answers
    #[command(subcommand)]
    Chat(ChatCommand),

    /// Manage documents used as answer sources
    #[command(subcommand)]
    Docs(DocsCommand),

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json)
        #[arg(long, short, default_value = "yaml", value_parser = ["yaml", "json"])]
        format: String,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// Target shell (bash, zsh, fish, powershell, elvish)
        #[arg(long, short)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            Ok(())
        }
        Commands::Config { format } => {
            commands::config::generate_config(&format, &std::env::current_dir()?)
        }
        Commands::Session(command) => {
            let ctx = load_context(cli.config.as_deref(), cli.server.as_deref())?;
            commands::session::run(&ctx, command).await
        }
        Commands::Chat(command) => {
            let ctx = load_context(cli.config.as_deref(), cli.server.as_deref())?;
            commands::chat::run(&ctx, command).await
        }
        Commands::Docs(command) => {
            let ctx = load_context(cli.config.as_deref(), cli.server.as_deref())?;
            commands::documents::run(&ctx, command).await
        }
    }
}

/// Resolves configuration, installs logging and opens the token store.
fn load_context(config_path: Option<&Path>, server: Option<&str>) -> Result<AppContext> {
    let config = Config::load_config(config_path, server)?;
    let level = logging::initialize_tracing(&config);
    debug!(%level, server = %config.api.base_url, "configuration loaded");
    Ok(AppContext::new(config))
}
