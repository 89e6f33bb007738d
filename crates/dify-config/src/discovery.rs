//! Config directory discovery.

use std::path::PathBuf;

/// Application name for XDG directory resolution.
const APP_NAME: &str = "dify";

/// Environment variable to override the config directory.
///
/// When set, this takes precedence over the platform default (XDG/Application Support).
/// Useful for testing and keeping several setups side by side.
pub const CONFIG_DIR_ENV: &str = "DIFY_CONFIG_DIR";

/// Get the XDG config directory for dify.
///
/// Checks `DIFY_CONFIG_DIR` env var first, then falls back to platform default
/// (`~/.config/dify` on Linux, `~/Library/Application Support/dify` on macOS).
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
