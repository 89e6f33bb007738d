//! Dify - command-line client for Dify apps
//!
//! Main entry point for the Dify CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{app, audio, chat, config, conversations, files, workflow};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Dify - talk to Dify chat and workflow apps from the terminal
#[derive(Parser)]
#[command(name = "dify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output raw JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL including /v1 (default: https://api.dify.ai/v1)
    #[arg(long, global = true, env = "DIFY_BASE_URL")]
    pub base_url: Option<String>,

    /// App API key
    #[arg(long, global = true, env = "DIFY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Named context from the client config
    #[arg(long, global = true, env = "DIFY_CONTEXT")]
    pub context: Option<String>,

    /// End-user identifier sent with requests
    #[arg(long, global = true, env = "DIFY_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send and manage chat messages
    Chat(chat::ChatArgs),

    /// List, rename and delete conversations
    Conversations(conversations::ConversationsArgs),

    /// Run and inspect workflows
    Workflow(workflow::WorkflowArgs),

    /// App parameters, info, metadata and feedback
    App(app::AppArgs),

    /// Upload files
    Files(files::FilesArgs),

    /// Speech-to-text and text-to-speech
    Audio(audio::AudioArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "dify=debug,dify_client=debug,dify_config=debug,info"
    } else {
        "dify=info,dify_client=info,warn"
    };

    let log_dir = dify_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "dify.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "dify=trace,dify_client=trace,dify_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context::resolve(
        cli.context.as_deref(),
        cli.base_url,
        cli.api_key,
        cli.user,
        cli.json,
        cli.verbose,
    )?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Conversations(args) => conversations::run(args, &ctx).await,
        Commands::Workflow(args) => workflow::run(args, &ctx).await,
        Commands::App(args) => app::run(args, &ctx).await,
        Commands::Files(args) => files::run(args, &ctx).await,
        Commands::Audio(args) => audio::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
