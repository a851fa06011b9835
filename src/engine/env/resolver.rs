//! Cluster and local Docker environment resolution.

use std::collections::HashMap;

use tracing::debug;

use super::{
    ClusterEnv, DOCKER_API_VERSION, DOCKER_CERT_PATH, DOCKER_HOST, DOCKER_TLS_VERIFY, DockerEnv,
    EnvOverlay, LocalEnv, is_old_runtime,
};
use crate::cluster::{ClusterKind, ContainerRuntime, LocalClusterQuery};
use crate::error::{ContainerError, DockenvError, EnvError};

/// Docker socket exposed by the microk8s snap.
pub const MICROK8S_DOCKER_HOST: &str = "unix:///var/snap/microk8s/current/docker.sock";

/// Resolves the cluster and local Docker environments.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait.
///
/// # Example
///
/// ```ignore
/// use mockable::DefaultEnv;
/// use dockenv::engine::EnvResolver;
///
/// let env = DefaultEnv::new();
/// let resolver = EnvResolver::new(&env);
/// let cluster = resolver.resolve_cluster(kind, runtime, &minikube).await;
/// let local = resolver.resolve_local(&cluster);
/// ```
pub struct EnvResolver<'a, E: mockable::Env> {
    overlay: EnvOverlay<'a, E>,
}

impl<'a, E: mockable::Env> EnvResolver<'a, E> {
    /// Creates a resolver reading from the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self {
            overlay: EnvOverlay::new(env),
        }
    }

    /// Resolves how to reach the Docker daemon backing the cluster.
    ///
    /// With a Docker runtime, minikube is asked for its `docker-env` and
    /// version, and microk8s is assumed to serve its snap socket. Everything
    /// else starts from an empty environment. The `DOCKER_*` process
    /// variables are overlaid last.
    ///
    /// A failed `docker-env` query is returned as-is, without the overlay.
    /// A failed version query only means the BuildKit defect is not flagged.
    pub async fn resolve_cluster<Q>(
        &self,
        kind: ClusterKind,
        runtime: ContainerRuntime,
        query: &Q,
    ) -> ClusterEnv
    where
        Q: LocalClusterQuery + ?Sized,
    {
        let base = match (runtime, kind) {
            (ContainerRuntime::Docker, ClusterKind::Minikube) => {
                match Self::minikube_base(query).await {
                    Ok(base) => base,
                    Err(error) => return ClusterEnv::failed(error),
                }
            }
            (ContainerRuntime::Docker, ClusterKind::MicroK8s) => {
                DockerEnv::with_host(MICROK8S_DOCKER_HOST)
            }
            _ => DockerEnv::default(),
        };

        ClusterEnv::from(self.overlay.apply(base))
    }

    /// Blocking variant of [`Self::resolve_cluster`].
    ///
    /// Creates a dedicated tokio runtime. Use [`Self::resolve_cluster`] when
    /// already in an async context.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the tokio runtime
    /// cannot be created. Resolution failures are carried in the returned
    /// [`ClusterEnv`], not here.
    pub fn resolve_cluster_blocking<Q>(
        &self,
        kind: ClusterKind,
        runtime: ContainerRuntime,
        query: &Q,
    ) -> Result<ClusterEnv, DockenvError>
    where
        Q: LocalClusterQuery + ?Sized,
    {
        let rt = tokio::runtime::Runtime::new().map_err(|e| {
            DockenvError::from(ContainerError::RuntimeCreationFailed {
                message: e.to_string(),
            })
        })?;
        Ok(rt.block_on(self.resolve_cluster(kind, runtime, query)))
    }

    /// Resolves the environment of the operator's own Docker client.
    ///
    /// The operator may already have pointed their client at the cluster's
    /// daemon (for example via `eval $(minikube docker-env)`). When the local
    /// host matches the cluster host, the cluster's runtime-bug flag applies
    /// locally too.
    #[must_use]
    pub fn resolve_local(&self, cluster_env: &ClusterEnv) -> LocalEnv {
        let mut result = match self.overlay.apply(DockerEnv::default()) {
            Ok(env) => env,
            Err(error) => return LocalEnv::failed(error),
        };

        if let Ok(cluster) = cluster_env.env()
            && cluster.host == result.host
        {
            result.is_old_runtime_bug = cluster.is_old_runtime_bug;
        }

        LocalEnv::resolved(result)
    }

    async fn minikube_base<Q>(query: &Q) -> Result<DockerEnv, EnvError>
    where
        Q: LocalClusterQuery + ?Sized,
    {
        let vars = query.docker_env().await?;

        let mut base = DockerEnv {
            host: var_or_empty(&vars, DOCKER_HOST),
            api_version: var_or_empty(&vars, DOCKER_API_VERSION),
            cert_path: var_or_empty(&vars, DOCKER_CERT_PATH),
            tls_verify: var_or_empty(&vars, DOCKER_TLS_VERIFY),
            is_old_runtime_bug: false,
        };

        base.is_old_runtime_bug = match query.version().await {
            Ok(version) => is_old_runtime(&version),
            Err(e) => {
                debug!(error = %e, "querying minikube version");
                false
            }
        };

        Ok(base)
    }
}

fn var_or_empty(vars: &HashMap<String, String>, name: &str) -> String {
    vars.get(name).cloned().unwrap_or_default()
}
