//! CLI command handlers.

pub mod app;
pub mod audio;
pub mod chat;
pub mod config;
pub mod conversations;
pub mod files;
pub mod output;
pub mod workflow;

use std::time::Duration;

use anyhow::{Context as _, Result};
use dify_client::DifyClient;
use dify_config::ClientConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded client config (defaults when no file exists).
    pub config: ClientConfig,
    /// Context selected with `--context`, if any.
    pub context_name: Option<String>,
    /// Base URL override from the command line or environment.
    pub base_url: Option<String>,
    /// API key override from the command line or environment.
    pub api_key: Option<String>,
    /// End-user override from the command line or environment.
    pub user: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load the client config and capture the global overrides.
    ///
    /// Nothing is validated against the selected context until a command
    /// actually needs a client, so `config` subcommands work without one.
    pub fn resolve(
        context_name: Option<&str>,
        base_url: Option<String>,
        api_key: Option<String>,
        user: Option<String>,
        json_output: bool,
        verbose: bool,
    ) -> Result<Self> {
        let config = dify_config::load_client_config()?;
        Ok(Self {
            config,
            context_name: context_name.map(str::to_string),
            base_url,
            api_key,
            user,
            json_output,
            verbose,
        })
    }

    /// Selected config context, if any.
    fn selected(&self) -> Result<Option<&dify_config::Context>> {
        Ok(self.config.select(self.context_name.as_deref())?)
    }

    /// End-user id: flag, then context, then config defaults.
    pub fn user(&self) -> Result<String> {
        if let Some(user) = &self.user {
            return Ok(user.clone());
        }
        let selected = self.selected()?;
        Ok(self.config.user(selected))
    }

    /// Effective base URL, if any layer sets one.
    pub fn base_url(&self) -> Result<Option<String>> {
        if let Some(url) = &self.base_url {
            return Ok(Some(url.clone()));
        }
        let selected = self.selected()?;
        Ok(self.config.base_url(selected))
    }

    /// Build an API client from the resolved settings.
    pub fn client(&self) -> Result<DifyClient> {
        let selected = self.selected()?;

        let api_key = match &self.api_key {
            Some(key) => Some(key.clone()),
            None => match selected {
                Some(ctx) => ctx.api_key()?,
                None => None,
            },
        };
        let api_key = api_key.context(
            "No API key configured. Pass --api-key, set DIFY_API_KEY, \
             or add auth to a context with 'dify config set-context'",
        )?;

        let mut builder = DifyClient::builder().api_key(api_key);
        if let Some(url) = self.base_url()? {
            builder = builder.base_url(url);
        }
        if let Some(secs) = self.config.timeout(selected) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build()?;
        tracing::debug!(base_url = client.base_url(), "Built API client");
        Ok(client)
    }
}

/// Parse a `key=value` pair for `--input`.
///
/// Values that parse as JSON (numbers, booleans, objects) are sent typed;
/// anything else is sent as a string.
pub fn parse_input(s: &str) -> std::result::Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid input '{}': expected key=value", s))?;
    if key.is_empty() {
        return Err(format!("invalid input '{}': empty key", s));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
