//! Docker daemon connections built from resolved environments.
//!
//! This is where deferred resolution failures surface: connecting with a
//! [`ClusterEnv`] or [`LocalEnv`] that failed to resolve returns the captured
//! [`EnvError`](crate::error::EnvError) before anything is dialled.

mod error_classification;
mod health_check;


use std::path::{Path, PathBuf};

use bollard::{ClientVersion, Docker};
use tracing::debug;

use super::env::{ClusterEnv, DockerEnv, LocalEnv};
use crate::error::{ContainerError, DockenvError};
use error_classification::classify_connection_error;

/// Connection timeout in seconds for Docker API connections.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Timeout in seconds for health check operations.
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;

/// Default socket path for Unix platforms.
#[cfg(unix)]
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

/// Default socket path for Windows platforms.
#[cfg(windows)]
const DEFAULT_SOCKET: &str = "npipe:////./pipe/docker_engine";

const CA_FILE: &str = "ca.pem";
const CERT_FILE: &str = "cert.pem";
const KEY_FILE: &str = "key.pem";

/// How an endpoint is dialled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    /// Unix socket or Windows named pipe.
    Socket,
    /// `tcp://`, `http://` or `https://`.
    Http,
    /// `ssh://`, `fd://` and anything else the Docker CLI accepts but
    /// Bollard cannot dial.
    Unsupported,
}

impl Endpoint {
    fn classify(host: &str) -> Self {
        if host.starts_with("unix://") || host.starts_with("npipe://") {
            Self::Socket
        } else if ["tcp://", "http://", "https://"]
            .iter()
            .any(|scheme| host.starts_with(scheme))
        {
            Self::Http
        } else {
            Self::Unsupported
        }
    }
}

/// TLS client material located in a certificate directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TlsFiles {
    key: PathBuf,
    cert: PathBuf,
    ca: PathBuf,
}

impl TlsFiles {
    fn in_dir(dir: &Path) -> Self {
        Self {
            key: dir.join(KEY_FILE),
            cert: dir.join(CERT_FILE),
            ca: dir.join(CA_FILE),
        }
    }
}

/// Builds `Bollard` clients from resolved Docker environments.
pub struct EngineConnector;

impl EngineConnector {
    /// Returns the platform default socket.
    ///
    /// On Unix systems, this is `unix:///var/run/docker.sock`.
    /// On Windows systems, this is `npipe:////./pipe/docker_engine`.
    #[must_use]
    pub const fn default_socket() -> &'static str {
        DEFAULT_SOCKET
    }

    /// Connect to the daemon described by `env`.
    ///
    /// - An empty host selects the platform default socket.
    /// - `unix://` and `npipe://` hosts connect over the socket.
    /// - `tcp://`, `http://` and `https://` hosts connect over HTTP, or over
    ///   TLS when `tls_verify` or `cert_path` is non-empty. TLS material is
    ///   read from `cert_path`, defaulting to `~/.docker`. The server
    ///   certificate is always verified against `ca.pem`, even when only
    ///   `cert_path` is set.
    /// - `api_version` pins the client API version when it is `MAJOR.MINOR`.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::UnsupportedEndpoint` for `ssh://` and `fd://`
    /// hosts, `ContainerError::SocketNotFound` or
    /// `ContainerError::PermissionDenied` when the socket cannot be used, and
    /// `ContainerError::ConnectionFailed` for other failures.
    pub fn connect(env: &DockerEnv) -> Result<Docker, DockenvError> {
        let host = if env.host.is_empty() {
            DEFAULT_SOCKET
        } else {
            env.host.as_str()
        };
        let version = Self::client_version(&env.api_version);

        let docker = match Endpoint::classify(host) {
            Endpoint::Socket => {
                Docker::connect_with_socket(host, CONNECTION_TIMEOUT_SECS, &version)
            }
            Endpoint::Http if !Self::wants_tls(env) => {
                // Bollard speaks http:// rather than tcp://
                let addr = host.replacen("tcp://", "http://", 1);
                Docker::connect_with_http(&addr, CONNECTION_TIMEOUT_SECS, &version)
            }
            Endpoint::Http => {
                let files = Self::tls_files(&env.cert_path)?;
                let addr = host
                    .replacen("tcp://", "https://", 1)
                    .replacen("http://", "https://", 1);
                Docker::connect_with_ssl(
                    &addr,
                    &files.key,
                    &files.cert,
                    &files.ca,
                    CONNECTION_TIMEOUT_SECS,
                    &version,
                )
            }
            Endpoint::Unsupported => {
                return Err(ContainerError::UnsupportedEndpoint {
                    endpoint: host.to_owned(),
                }
                .into());
            }
        }
        .map_err(|e| DockenvError::from(classify_connection_error(&e, host)))?;

        Ok(docker)
    }

    /// Connect to the cluster's daemon, surfacing a deferred resolution
    /// failure first.
    ///
    /// # Errors
    ///
    /// Returns the captured `EnvError` if the environment failed to resolve,
    /// otherwise as [`Self::connect`].
    pub fn connect_cluster_env(env: &ClusterEnv) -> Result<Docker, DockenvError> {
        let resolved = env.env().map_err(|e| DockenvError::from(e.clone()))?;
        Self::connect(resolved)
    }

    /// Connect to the operator's own daemon, surfacing a deferred resolution
    /// failure first.
    ///
    /// # Errors
    ///
    /// Returns the captured `EnvError` if the environment failed to resolve,
    /// otherwise as [`Self::connect`].
    pub fn connect_local_env(env: &LocalEnv) -> Result<Docker, DockenvError> {
        let resolved = env.env().map_err(|e| DockenvError::from(e.clone()))?;
        Self::connect(resolved)
    }

    /// TLS is requested by either `DOCKER_TLS_VERIFY` or `DOCKER_CERT_PATH`.
    fn wants_tls(env: &DockerEnv) -> bool {
        !env.tls_verify.is_empty() || !env.cert_path.is_empty()
    }

    /// Parses a `MAJOR.MINOR` API version, falling back to Bollard's default.
    fn client_version(api_version: &str) -> ClientVersion {
        if api_version.is_empty() {
            return Self::default_client_version();
        }

        let parsed = api_version
            .trim_start_matches('v')
            .split_once('.')
            .and_then(|(major, minor)| {
                Some((major.parse::<usize>().ok()?, minor.parse::<usize>().ok()?))
            });

        match parsed {
            Some((major_version, minor_version)) => ClientVersion {
                major_version,
                minor_version,
            },
            None => {
                debug!(
                    api_version,
                    "ignoring unparseable DOCKER_API_VERSION; using client default"
                );
                Self::default_client_version()
            }
        }
    }

    const fn default_client_version() -> ClientVersion {
        ClientVersion {
            major_version: bollard::API_DEFAULT_VERSION.major_version,
            minor_version: bollard::API_DEFAULT_VERSION.minor_version,
        }
    }

    fn tls_files(cert_path: &str) -> Result<TlsFiles, DockenvError> {
        let dir = if cert_path.is_empty() {
            home::home_dir()
                .map(|home| home.join(".docker"))
                .ok_or_else(|| ContainerError::ConnectionFailed {
                    message: String::from(
                        "TLS requested but DOCKER_CERT_PATH is unset and no home directory was found",
                    ),
                })?
        } else {
            PathBuf::from(cert_path)
        };
        Ok(TlsFiles::in_dir(&dir))
    }
}
