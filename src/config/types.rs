//! Configuration data types for dockenv.

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterKind, ContainerRuntime};
use crate::error::ConfigError;

/// Default minikube executable.
const DEFAULT_MINIKUBE_BINARY: &str = "minikube";

/// Default bound on a single minikube query.
const DEFAULT_MINIKUBE_TIMEOUT_SECS: u64 = 30;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// The cluster the tool is deploying to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Which kind of cluster is active.
    pub kind: ClusterKind,

    /// The container runtime used by the cluster nodes.
    pub runtime: ContainerRuntime,
}

/// How to invoke the minikube CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MinikubeConfig {
    /// The minikube executable, resolved through `PATH` when not absolute.
    pub binary: String,

    /// The minikube profile to query. Uses minikube's active profile when
    /// unset.
    pub profile: Option<String>,

    /// Upper bound in seconds on each minikube query.
    pub timeout_secs: u64,
}

impl Default for MinikubeConfig {
    fn default() -> Self {
        Self {
            binary: String::from(DEFAULT_MINIKUBE_BINARY),
            profile: None,
            timeout_secs: DEFAULT_MINIKUBE_TIMEOUT_SECS,
        }
    }
}

/// Root application configuration.
///
/// Precedence (lowest to highest): defaults, configuration file, environment
/// variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `DOCKENV_CONFIG_PATH` environment variable
/// 2. `.dockenv.toml` in the current working directory
/// 3. `.dockenv.toml` in the home directory
/// 4. `~/.config/dockenv/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "DOCKENV",
    post_merge_hook,
    discovery(
        app_name = "dockenv",
        env_var = "DOCKENV_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".dockenv.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Tracing filter used when `RUST_LOG` is unset, for example `debug`.
    pub log_level: Option<String>,

    /// Active cluster facts.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub cluster: ClusterConfig,

    /// minikube CLI settings.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub minikube: MinikubeConfig,
}

impl AppConfig {
    /// Returns the configured log filter, or [`DEFAULT_LOG_LEVEL`].
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|level| !level.trim().is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Validates values that deserialise fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `minikube.binary` is blank or
    /// `minikube.timeout_secs` is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.minikube.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("minikube.binary"),
                reason: String::from("cannot be empty"),
            }
            .into());
        }
        if self.minikube.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: String::from("minikube.timeout_secs"),
                reason: String::from("must be greater than zero"),
            }
            .into());
        }
        Ok(())
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // A blank profile means "minikube's active profile".
        if self
            .minikube
            .profile
            .as_deref()
            .is_some_and(|profile| profile.trim().is_empty())
        {
            self.minikube.profile = None;
        }
        Ok(())
    }
}
