//! Health check and connect-and-verify operations.

use std::time::Duration;

use bollard::Docker;

use super::{EngineConnector, HEALTH_CHECK_TIMEOUT_SECS};
use crate::engine::env::ClusterEnv;
use crate::error::{ContainerError, DockenvError};

impl EngineConnector {
    /// Ping the daemon, bounded by the health check timeout.
    async fn ping_with_timeout(docker: &Docker) -> Result<(), DockenvError> {
        let timeout = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

        tokio::time::timeout(timeout, docker.ping())
            .await
            .map_err(|_| {
                DockenvError::from(ContainerError::HealthCheckTimeout {
                    seconds: HEALTH_CHECK_TIMEOUT_SECS,
                })
            })?
            .map_err(|e| {
                DockenvError::from(ContainerError::HealthCheckFailed {
                    message: e.to_string(),
                })
            })?;
        Ok(())
    }

    /// Verify the daemon is responsive (async version).
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::HealthCheckFailed` if the daemon does not
    /// respond correctly.
    ///
    /// Returns `ContainerError::HealthCheckTimeout` if the check times out.
    pub async fn health_check_async(docker: &Docker) -> Result<(), DockenvError> {
        Self::ping_with_timeout(docker).await
    }

    /// Verify the daemon is responsive.
    ///
    /// Creates a dedicated tokio runtime. Use [`Self::health_check_async`]
    /// when already in an async context.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the tokio runtime
    /// cannot be created, otherwise as [`Self::health_check_async`].
    pub fn health_check(docker: &Docker) -> Result<(), DockenvError> {
        let rt = Self::create_runtime()?;
        rt.block_on(Self::health_check_async(docker))
    }

    /// Connect to the cluster's daemon and verify it responds (async version).
    ///
    /// # Errors
    ///
    /// Returns the deferred `EnvError` if the cluster environment failed to
    /// resolve, a `ContainerError` if connecting fails, and
    /// `ContainerError::HealthCheckFailed` or
    /// `ContainerError::HealthCheckTimeout` if the ping fails.
    pub async fn connect_and_verify_async(env: &ClusterEnv) -> Result<Docker, DockenvError> {
        let docker = Self::connect_cluster_env(env)?;
        Self::ping_with_timeout(&docker).await?;
        Ok(docker)
    }

    /// Connect to the cluster's daemon and verify it responds.
    ///
    /// Creates a dedicated tokio runtime. Use
    /// [`Self::connect_and_verify_async`] when already in an async context.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the tokio runtime
    /// cannot be created, otherwise as [`Self::connect_and_verify_async`].
    pub fn connect_and_verify(env: &ClusterEnv) -> Result<Docker, DockenvError> {
        let rt = Self::create_runtime()?;
        rt.block_on(Self::connect_and_verify_async(env))
    }

    fn create_runtime() -> Result<tokio::runtime::Runtime, DockenvError> {
        tokio::runtime::Runtime::new().map_err(|e| {
            DockenvError::from(ContainerError::RuntimeCreationFailed {
                message: e.to_string(),
            })
        })
    }
}
