//! Semantic error types for dockenv.
//!
//! Conditions a caller might inspect or branch on are modelled as `thiserror`
//! enums. Opaque errors (`eyre::Report`) are reserved for the binary boundary.
//!
//! Resolution failures ([`EnvError`]) are special: they are not raised when
//! the environment is discovered but carried inside the resolved
//! [`ClusterEnv`](crate::engine::ClusterEnv) or
//! [`LocalEnv`](crate::engine::LocalEnv) and reported when something actually
//! needs the daemon connection. They are therefore `Clone`.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised by a local-cluster query (for example the minikube CLI).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// The cluster tool could not be started.
    #[error("failed to run '{program}': {message}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// A description of the spawn failure.
        message: String,
    },

    /// The cluster tool ran but exited unsuccessfully.
    #[error("'{command}' exited with status {status}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// The exit status, or `-1` when terminated by a signal.
        status: i32,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The cluster tool did not finish within the configured timeout.
    #[error("'{command}' timed out after {seconds} seconds")]
    Timeout {
        /// The command line that was run.
        command: String,
        /// The timeout duration in seconds.
        seconds: u64,
    },

    /// The cluster tool produced output that could not be interpreted.
    #[error("unexpected output from '{command}': {message}")]
    InvalidOutput {
        /// The command line that was run.
        command: String,
        /// A description of what was wrong with the output.
        message: String,
    },
}

/// Terminal failures of Docker environment resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// `DOCKER_HOST` is not a valid daemon endpoint address.
    #[error("invalid DOCKER_HOST '{value}': {reason}")]
    EndpointParse {
        /// The raw value of the variable.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The local cluster could not report its Docker environment.
    #[error("failed to query local cluster docker environment: {0}")]
    ClusterQuery(#[from] ClusterError),
}

/// Errors that can occur while connecting to a Docker daemon.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Failed to connect to the container engine.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// The endpoint scheme is understood by the Docker CLI but cannot be
    /// dialled by this client.
    #[error("unsupported docker endpoint: {endpoint}")]
    UnsupportedEndpoint {
        /// The endpoint that was rejected.
        endpoint: String,
    },

    /// Failed to create the async runtime for a blocking operation.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime failure.
        message: String,
    },

    /// Health check failed - engine did not respond correctly.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// Health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },
}

/// Top-level error type for dockenv.
///
/// At the application boundary (`main.rs`) these errors are converted to
/// `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum DockenvError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Docker environment resolution failed.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// A container engine operation failed.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// A specialised `Result` type for dockenv operations.
pub type Result<T> = std::result::Result<T, DockenvError>;
