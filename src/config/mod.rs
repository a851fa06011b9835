//! Configuration system for dockenv.
//!
//! This module provides the configuration structures and CLI definitions for
//! the `dockenv` binary. CLI flags override environment variables, which
//! override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/dockenv/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! log_level = "info"
//!
//! [cluster]
//! kind = "minikube"
//! runtime = "docker"
//!
//! [minikube]
//! binary = "/usr/local/bin/minikube"
//! profile = "dev"
//! timeout_secs = 30
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, PrintArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{AppConfig, ClusterConfig, DEFAULT_LOG_LEVEL, MinikubeConfig};
