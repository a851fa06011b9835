//! Docker connection environment resolution.
//!
//! Two environments are resolved independently:
//!
//! - [`ClusterEnv`]: how to reach the Docker daemon that backs the active
//!   cluster. Local clusters such as minikube or microk8s embed their own
//!   daemon, so images built against it are immediately visible to the
//!   cluster.
//! - [`LocalEnv`]: how the operator's own `docker` CLI is configured.
//!
//! In both cases the standard `DOCKER_*` variables from the process
//! environment are overlaid last. Pointing `DOCKER_HOST` at a different
//! daemon discards everything the cluster supplied.
//!
//! Resolution never fails outright. A failure is captured inside the resolved
//! value and surfaced when a caller asks for the connection fields, so an
//! unreachable minikube only matters to operations that need the daemon.

mod host;
mod overlay;
mod resolver;
mod version_gate;

#[cfg(test)]
mod tests;

pub use host::{DEFAULT_TCP_HOST, DEFAULT_TLS_HOST, parse_docker_host};
pub use overlay::EnvOverlay;
pub use resolver::{EnvResolver, MICROK8S_DOCKER_HOST};
pub use version_gate::{MIN_BUILDKIT_MINIKUBE_VERSION, is_old_runtime, parse_tolerant};

use crate::error::EnvError;

/// Environment variable naming the daemon endpoint.
pub const DOCKER_HOST: &str = "DOCKER_HOST";

/// Environment variable pinning the client API version.
pub const DOCKER_API_VERSION: &str = "DOCKER_API_VERSION";

/// Environment variable naming the TLS certificate directory.
pub const DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";

/// Environment variable enabling TLS verification when non-empty.
pub const DOCKER_TLS_VERIFY: &str = "DOCKER_TLS_VERIFY";

/// Connection settings for a Docker daemon.
///
/// Empty strings mean "unset". The field set mirrors the standard Docker
/// client environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerEnv {
    /// Daemon endpoint, for example `tcp://192.168.99.100:2376`.
    pub host: String,

    /// Client API version, for example `1.41`.
    pub api_version: String,

    /// Non-empty when TLS verification is enabled.
    pub tls_verify: String,

    /// Directory holding `ca.pem`, `cert.pem` and `key.pem`.
    pub cert_path: String,

    /// The daemon belongs to a minikube release whose Docker server cannot
    /// serve BuildKit builds, so callers should use the legacy builder.
    pub is_old_runtime_bug: bool,
}

impl DockerEnv {
    /// Creates an environment with only the host set.
    #[must_use]
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Serialises the connection fields back to `NAME=VALUE` entries.
    ///
    /// Entries are emitted in the fixed order `DOCKER_HOST`,
    /// `DOCKER_API_VERSION`, `DOCKER_CERT_PATH`, `DOCKER_TLS_VERIFY`, and
    /// only for non-empty fields, so the result can be appended to a child
    /// process environment.
    #[must_use]
    pub fn as_environ(&self) -> Vec<String> {
        self.set_fields()
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    }

    /// Same entries as [`Self::as_environ`], as `export NAME=VALUE` lines
    /// safe to `eval` in a POSIX shell.
    #[must_use]
    pub fn as_exports(&self) -> Vec<String> {
        self.set_fields()
            .map(|(name, value)| format!("export {name}={}", shell_quote(value)))
            .collect()
    }

    fn set_fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (DOCKER_HOST, self.host.as_str()),
            (DOCKER_API_VERSION, self.api_version.as_str()),
            (DOCKER_CERT_PATH, self.cert_path.as_str()),
            (DOCKER_TLS_VERIFY, self.tls_verify.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    }
}

/// Single-quotes `value` unless it only holds characters a shell leaves
/// alone.
fn shell_quote(value: &str) -> String {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_=./:@".contains(c))
    {
        value.to_owned()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Generates a provenance-tagged wrapper around a resolution result.
macro_rules! resolved_env {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(Result<DockerEnv, EnvError>);

        impl $name {
            /// Wraps a successfully resolved environment.
            #[must_use]
            pub const fn resolved(env: DockerEnv) -> Self {
                Self(Ok(env))
            }

            /// Wraps a resolution failure for deferred reporting.
            #[must_use]
            pub const fn failed(error: EnvError) -> Self {
                Self(Err(error))
            }

            /// Returns the resolved environment, or the deferred failure.
            ///
            /// # Errors
            ///
            /// Returns the [`EnvError`] captured during resolution.
            pub const fn env(&self) -> Result<&DockerEnv, &EnvError> {
                self.0.as_ref()
            }

            /// Returns the captured failure, if resolution failed.
            #[must_use]
            pub const fn error(&self) -> Option<&EnvError> {
                match &self.0 {
                    Ok(_) => None,
                    Err(error) => Some(error),
                }
            }

            /// Consumes the wrapper and returns the underlying result.
            ///
            /// # Errors
            ///
            /// Returns the [`EnvError`] captured during resolution.
            pub fn into_result(self) -> Result<DockerEnv, EnvError> {
                self.0
            }
        }

        impl From<Result<DockerEnv, EnvError>> for $name {
            fn from(result: Result<DockerEnv, EnvError>) -> Self {
                Self(result)
            }
        }
    };
}

resolved_env! {
    /// Environment for reaching the Docker daemon that backs the cluster.
    ClusterEnv
}

resolved_env! {
    /// Environment of the operator's own Docker client.
    LocalEnv
}
