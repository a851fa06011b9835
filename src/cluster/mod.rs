//! Facts about the active cluster and the local-cluster query seam.
//!
//! Which cluster and container runtime are active is decided elsewhere (the
//! kubeconfig, or dockenv's own configuration). This module only names those
//! facts and describes the two questions the resolver may ask of a local
//! cluster that embeds its own Docker daemon.

mod minikube;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use minikube::{MinikubeClient, parse_docker_env_output, parse_version_output};

use crate::error::ClusterError;

/// The kind of cluster the tool is deploying to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterKind {
    /// A minikube cluster; its Docker daemon is discovered with
    /// `minikube docker-env`.
    Minikube,
    /// A microk8s cluster; its Docker daemon listens on a fixed snap socket.
    #[value(name = "microk8s")]
    #[serde(rename = "microk8s")]
    MicroK8s,
    /// Docker Desktop's built-in Kubernetes.
    DockerDesktop,
    /// A kind cluster.
    Kind,
    /// Any other or undetected cluster.
    #[default]
    Unknown,
}

/// The container runtime used by the cluster nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerRuntime {
    /// The Docker daemon.
    #[default]
    Docker,
    /// containerd.
    Containerd,
    /// CRI-O.
    CriO,
    /// Any other or undetected runtime.
    Unknown,
}

/// Boxed future returned by [`LocalClusterQuery::docker_env`].
pub type DockerEnvFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HashMap<String, String>, ClusterError>> + Send + 'a>>;

/// Boxed future returned by [`LocalClusterQuery::version`].
pub type VersionFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ClusterError>> + Send + 'a>>;

/// Queries answered by a local cluster that exposes its own Docker daemon.
///
/// Both queries may run a process or touch the network. Dropping the
/// returned future cancels the query.
pub trait LocalClusterQuery {
    /// Returns the cluster's Docker client environment, keyed by the standard
    /// `DOCKER_*` variable names.
    fn docker_env(&self) -> DockerEnvFuture<'_>;

    /// Returns the cluster tool's version string, possibly prefixed with a
    /// marker such as `v`.
    fn version(&self) -> VersionFuture<'_>;
}
