//! Client configuration for connecting to Dify apps.
//!
//! Implements a kubeconfig-style configuration with named contexts:
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: support-bot
//!
//! contexts:
//!   - name: support-bot
//!     base-url: https://api.dify.ai/v1
//!     auth:
//!       type: api-key
//!       key-env: SUPPORT_BOT_KEY
//!   - name: local-workflow
//!     base-url: http://localhost:5001/v1
//!     auth:
//!       type: api-key
//!       key-file: ~/.config/dify/keys/workflow.key
//!     user: alice
//!
//! defaults:
//!   user: dify-cli
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the client config file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for client config files.
pub const KIND: &str = "ClientConfig";

/// Default config filename.
const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Root client configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// API version (always "v1" currently).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Config kind (always "ClientConfig").
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the current/default context.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Named app contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Default settings applied to all contexts.
    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    /// Create an empty client config.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Get the current context, if set and valid.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    /// Get a context by name.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Get a mutable context by name.
    pub fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn set_context(&mut self, context: Context) {
        if let Some(existing) = self.get_context_mut(&context.name) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
    }

    /// Remove a context by name.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let pos = self.contexts.iter().position(|c| c.name == name)?;
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(self.contexts.remove(pos))
    }

    /// Set the current context by name.
    ///
    /// Returns an error if the context doesn't exist.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_some() {
            self.current_context = Some(name.to_string());
            Ok(())
        } else {
            Err(ConfigError::ContextNotFound(name.to_string()))
        }
    }

    /// List all context names.
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Select a context: the named one, else the current one.
    ///
    /// Naming a context that doesn't exist is an error; having no current
    /// context is not.
    pub fn select(&self, name: Option<&str>) -> Result<Option<&Context>> {
        match name {
            Some(name) => self
                .get_context(name)
                .map(Some)
                .ok_or_else(|| ConfigError::ContextNotFound(name.to_string())),
            None => Ok(self.current()),
        }
    }

    /// Effective base URL for a context, falling back to defaults.
    pub fn base_url(&self, context: Option<&Context>) -> Option<String> {
        context
            .and_then(|c| c.base_url.clone())
            .or_else(|| self.defaults.base_url.clone())
    }

    /// Effective end-user id for a context, falling back to defaults.
    pub fn user(&self, context: Option<&Context>) -> String {
        context
            .and_then(|c| c.user.clone())
            .unwrap_or_else(|| self.defaults.user.clone())
    }

    /// Effective request timeout in seconds, falling back to defaults.
    pub fn timeout(&self, context: Option<&Context>) -> Option<u64> {
        context.and_then(|c| c.timeout).or(self.defaults.timeout)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named app context (base URL + credential + end user).
///
/// Every Dify app has its own API key, so a context usually maps to one app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    /// Unique name for this context.
    pub name: String,

    /// API base URL including the `/v1` prefix.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Credential source.
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// End-user id sent with requests.
    #[serde(default)]
    pub user: Option<String>,

    /// Request timeout override (seconds).
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Context {
    /// Create a new context with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: None,
            auth: None,
            user: None,
            timeout: None,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the auth configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the end-user id.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve this context's API key, if it has a credential source.
    pub fn api_key(&self) -> Result<Option<String>> {
        match &self.auth {
            Some(auth) => auth.resolve(),
            None => Ok(None),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// Credential source for a context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuthConfig {
    /// No credential configured.
    None,

    /// App API key.
    #[serde(rename_all = "kebab-case")]
    ApiKey {
        /// Path to file containing the API key.
        key_file: Option<PathBuf>,
        /// Environment variable containing the API key.
        key_env: Option<String>,
    },
}

impl AuthConfig {
    /// Create API key auth referencing a file.
    pub fn api_key_file(path: impl Into<PathBuf>) -> Self {
        Self::ApiKey {
            key_file: Some(path.into()),
            key_env: None,
        }
    }

    /// Create API key auth referencing an environment variable.
    pub fn api_key_env(var: impl Into<String>) -> Self {
        Self::ApiKey {
            key_file: None,
            key_env: Some(var.into()),
        }
    }

    /// Resolve the actual credential value.
    ///
    /// Reads the file first, then the environment variable.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            AuthConfig::None => Ok(None),

            AuthConfig::ApiKey { key_file, key_env } => {
                if let Some(path) = key_file {
                    let expanded = expand_path(path);
                    if expanded.exists() {
                        let key = std::fs::read_to_string(&expanded)
                            .map_err(|e| ConfigError::ReadFile {
                                path: expanded.display().to_string(),
                                source: e,
                            })?
                            .trim()
                            .to_string();
                        return Ok(Some(key));
                    }
                }
                if let Some(var) = key_env
                    && let Ok(key) = std::env::var(var)
                {
                    return Ok(Some(key));
                }
                Ok(None)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default end-user id when neither the CLI nor a context sets one.
pub const DEFAULT_USER: &str = "dify-cli";

/// Default settings applied to all contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientDefaults {
    /// Default base URL.
    pub base_url: Option<String>,

    /// Default end-user id.
    pub user: String,

    /// Default request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            base_url: None,
            user: DEFAULT_USER.to_string(),
            timeout: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Get the path to the client config file.
pub fn client_config_path() -> Option<PathBuf> {
    crate::xdg_config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Load the client configuration.
///
/// Returns a default config if the file doesn't exist.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Load client config from a specific path.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::new());
    };

    if !path.exists() {
        return Ok(ClientConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ClientConfig::from_yaml(&contents)
}

/// Save the client configuration.
pub fn save_client_config(config: &ClientConfig) -> Result<()> {
    let path = client_config_path()
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))?;
    save_client_config_to(config, &path)
}

/// Save client config to a specific path.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Expand ~ to home directory in paths.
fn expand_path(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str()
        && let Some(rest) = s.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::new();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert!(config.current_context.is_none());
        assert!(config.contexts.is_empty());
        assert_eq!(config.defaults.user, DEFAULT_USER);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
api-version: v1
kind: ClientConfig
current-context: bot

contexts:
  - name: bot
    base-url: https://api.dify.ai/v1
    auth:
      type: api-key
      key-env: BOT_KEY
  - name: local
    base-url: http://localhost:5001/v1
    auth:
      type: api-key
      key-file: ~/.config/dify/keys/local.key
    user: alice
    timeout: 60

defaults:
  user: someone
  timeout: 30
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.current_context.as_deref(), Some("bot"));
        assert_eq!(config.contexts.len(), 2);

        let bot = config.get_context("bot").unwrap();
        assert_eq!(bot.base_url.as_deref(), Some("https://api.dify.ai/v1"));
        match &bot.auth {
            Some(AuthConfig::ApiKey { key_env, .. }) => {
                assert_eq!(key_env.as_deref(), Some("BOT_KEY"));
            }
            _ => panic!("Expected ApiKey auth"),
        }

        let local = config.get_context("local").unwrap();
        assert_eq!(config.user(Some(local)), "alice");
        assert_eq!(config.timeout(Some(local)), Some(60));
        assert_eq!(config.user(Some(bot)), "someone");
        assert_eq!(config.timeout(Some(bot)), Some(30));
    }

    #[test]
    fn test_select_context() {
        let mut config = ClientConfig::new();
        assert!(config.select(None).unwrap().is_none());

        config.set_context(Context::new("a").with_base_url("http://a/v1"));
        config.set_context(Context::new("b").with_base_url("http://b/v1"));
        config.use_context("a").unwrap();

        assert_eq!(config.select(None).unwrap().unwrap().name, "a");
        assert_eq!(config.select(Some("b")).unwrap().unwrap().name, "b");
        assert!(matches!(
            config.select(Some("missing")),
            Err(ConfigError::ContextNotFound(_))
        ));
    }

    #[test]
    fn test_base_url_fallback() {
        let mut config = ClientConfig::new();
        assert_eq!(config.base_url(None), None);

        config.defaults.base_url = Some("http://default/v1".to_string());
        let bare = Context::new("bare");
        assert_eq!(config.base_url(Some(&bare)).as_deref(), Some("http://default/v1"));

        let explicit = Context::new("x").with_base_url("http://x/v1");
        assert_eq!(config.base_url(Some(&explicit)).as_deref(), Some("http://x/v1"));
    }

    #[test]
    fn test_set_and_remove_context() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local").with_user("a"));
        config.set_context(Context::new("local").with_user("b"));
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].user.as_deref(), Some("b"));

        config.use_context("local").unwrap();
        let removed = config.remove_context("local").unwrap();
        assert_eq!(removed.name, "local");
        assert!(config.current_context.is_none());
        assert!(config.remove_context("local").is_none());
    }

    #[test]
    fn test_use_missing_context() {
        let mut config = ClientConfig::new();
        let err = config.use_context("nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(_)));
    }

    #[test]
    fn test_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.yaml");

        let mut config = ClientConfig::new();
        config.set_context(
            Context::new("remote")
                .with_base_url("https://remote.example.com/v1")
                .with_auth(AuthConfig::api_key_file("~/.config/dify/keys/remote.key"))
                .with_timeout(10),
        );
        config.current_context = Some("remote".to_string());
        save_client_config_to(&config, &path).unwrap();

        let reloaded = load_client_config_from(Some(&path)).unwrap();
        assert_eq!(reloaded.current_context, config.current_context);
        assert_eq!(reloaded.context_names(), vec!["remote"]);
        assert_eq!(reloaded.contexts[0].timeout, Some(10));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_client_config_from(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_auth_key_file_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("app.key");
        std::fs::write(&key_path, "app-123\n").unwrap();

        let context = Context::new("k").with_auth(AuthConfig::api_key_file(&key_path));
        assert_eq!(context.api_key().unwrap().as_deref(), Some("app-123"));
    }

    #[test]
    fn test_auth_api_key_env_resolve() {
        // SAFETY: Test is single-threaded, env var is test-specific
        unsafe {
            std::env::set_var("TEST_DIFY_KEY", "secret123");
        }
        let auth = AuthConfig::api_key_env("TEST_DIFY_KEY");
        assert_eq!(auth.resolve().unwrap(), Some("secret123".to_string()));
        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var("TEST_DIFY_KEY");
        }
    }

    #[test]
    fn test_auth_none_resolve() {
        assert!(AuthConfig::None.resolve().unwrap().is_none());
        assert!(Context::new("bare").api_key().unwrap().is_none());
    }

    #[test]
    fn test_expand_path() {
        let path = PathBuf::from("~/test/file.key");
        let expanded = expand_path(&path);
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_str().unwrap().starts_with("~/"));
        }

        let path2 = PathBuf::from("/absolute/path");
        assert_eq!(expand_path(&path2), path2);
    }
}
