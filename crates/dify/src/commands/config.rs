//! Config command - client context management.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use dify_config::{AuthConfig, Context as ClientContext};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show configuration file path
    Path,

    /// Show the current context name
    CurrentContext,

    /// List available contexts
    GetContexts,

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Create or update a context
    SetContext {
        /// Context name
        name: String,

        /// API base URL including /v1 (e.g., http://localhost:5001/v1)
        #[arg(long)]
        url: Option<String>,

        /// Read the API key from this file
        #[arg(long, conflicts_with = "key_env")]
        key_file: Option<PathBuf>,

        /// Read the API key from this environment variable
        #[arg(long)]
        key_env: Option<String>,

        /// Default end-user id for this context
        #[arg(long = "as")]
        default_user: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Delete a context
    DeleteContext {
        /// Context name to delete
        name: String,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Path => cmd_path().await,
        ConfigCommand::CurrentContext => cmd_current_context(ctx).await,
        ConfigCommand::GetContexts => cmd_get_contexts(ctx).await,
        ConfigCommand::UseContext { name } => cmd_use_context(&name).await,
        ConfigCommand::SetContext {
            name,
            url,
            key_file,
            key_env,
            default_user,
            timeout,
        } => {
            let auth = match (key_file, key_env) {
                (Some(path), _) => Some(AuthConfig::api_key_file(path)),
                (None, Some(var)) => Some(AuthConfig::api_key_env(var)),
                (None, None) => None,
            };
            cmd_set_context(&name, url, auth, default_user, timeout).await
        }
        ConfigCommand::DeleteContext { name } => cmd_delete_context(&name).await,
    }
}

async fn cmd_path() -> Result<()> {
    if let Some(path) = dify_config::client_config_path() {
        println!("{}", path.display());
    } else {
        eprintln!("Could not determine config directory");
    }
    Ok(())
}

async fn cmd_current_context(ctx: &Context) -> Result<()> {
    match &ctx.config.current_context {
        Some(name) => {
            println!("{}", name);
        }
        None => {
            println!("No current context set. Use 'dify config use-context <name>' to set one.");
        }
    }

    Ok(())
}

async fn cmd_get_contexts(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&config.contexts)?);
        return Ok(());
    }

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!();
        println!("Create one with:");
        println!("  dify config set-context local --url=http://localhost:5001/v1 --key-env=DIFY_APP_KEY");
        return Ok(());
    }

    let current = config.current_context.as_deref();

    println!("CURRENT   NAME            BASE URL");
    for context in &config.contexts {
        let marker = if current == Some(context.name.as_str()) {
            "*"
        } else {
            " "
        };
        let base_url = config
            .base_url(Some(context))
            .unwrap_or_else(|| dify_client::DEFAULT_BASE_URL.to_string());
        println!("{}         {:<15} {}", marker, context.name, base_url);
    }

    Ok(())
}

async fn cmd_use_context(name: &str) -> Result<()> {
    let mut config = dify_config::load_client_config()?;

    config.use_context(name)?;
    dify_config::save_client_config(&config)?;

    println!("Switched to context \"{}\".", name);

    Ok(())
}

async fn cmd_set_context(
    name: &str,
    base_url: Option<String>,
    auth: Option<AuthConfig>,
    user: Option<String>,
    timeout: Option<u64>,
) -> Result<()> {
    let mut config = dify_config::load_client_config()?;

    match config.get_context_mut(name) {
        Some(existing) => {
            if let Some(url) = base_url {
                existing.base_url = Some(url);
            }
            if let Some(auth) = auth {
                existing.auth = Some(auth);
            }
            if let Some(user) = user {
                existing.user = Some(user);
            }
            if let Some(t) = timeout {
                existing.timeout = Some(t);
            }
            println!("Context \"{}\" modified.", name);
        }
        None => {
            let mut context = ClientContext::new(name);
            if let Some(url) = base_url {
                context = context.with_base_url(url);
            }
            if let Some(auth) = auth {
                context = context.with_auth(auth);
            }
            if let Some(user) = user {
                context = context.with_user(user);
            }
            if let Some(t) = timeout {
                context = context.with_timeout(t);
            }
            config.set_context(context);
            println!("Context \"{}\" created.", name);
        }
    }

    // If this is the first context, make it current
    let first = config.current_context.is_none() && config.contexts.len() == 1;
    if first {
        config.current_context = Some(name.to_string());
    }

    dify_config::save_client_config(&config)?;

    if first {
        println!("Context \"{}\" set as current context.", name);
    }

    Ok(())
}

async fn cmd_delete_context(name: &str) -> Result<()> {
    let mut config = dify_config::load_client_config()?;

    match config.remove_context(name) {
        Some(_) => {
            dify_config::save_client_config(&config)?;
            println!("Context \"{}\" deleted.", name);
            if config.current_context.is_none() {
                println!(
                    "Note: No current context. Use 'dify config use-context <name>' to set one."
                );
            }
        }
        None => {
            println!("Context \"{}\" not found.", name);
        }
    }

    Ok(())
}
