//! Client configuration for the Dify CLI.
//!
//! Kubeconfig-style YAML file with named contexts, each bundling an API base
//! URL, a credential source and a default end-user id. The file lives at
//! `<config dir>/client.yaml`, where the config dir is `$DIFY_CONFIG_DIR` or
//! the platform config directory.

pub mod client;
pub mod discovery;
pub mod error;

pub use client::{
    client_config_path, load_client_config, load_client_config_from, save_client_config,
    save_client_config_to, AuthConfig, ClientConfig, ClientDefaults, Context,
};
pub use discovery::{xdg_config_dir, CONFIG_DIR_ENV};
pub use error::{ConfigError, Result};
