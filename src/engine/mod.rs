//! Docker daemon environment resolution and connection.
//!
//! [`EnvResolver`] decides which daemon to talk to. The cluster environment
//! starts from what the active local cluster reports (minikube's
//! `docker-env`, microk8s's snap socket) and the local environment starts
//! empty. Both are then overlaid with the operator's `DOCKER_HOST`,
//! `DOCKER_API_VERSION`, `DOCKER_CERT_PATH` and `DOCKER_TLS_VERIFY`.
//!
//! [`EngineConnector`] turns a resolved environment into a `Bollard` client.

mod connection;
mod env;

pub use connection::EngineConnector;
pub use env::{
    ClusterEnv, DEFAULT_TCP_HOST, DEFAULT_TLS_HOST, DOCKER_API_VERSION, DOCKER_CERT_PATH,
    DOCKER_HOST, DOCKER_TLS_VERIFY, DockerEnv, EnvOverlay, EnvResolver, LocalEnv,
    MICROK8S_DOCKER_HOST, MIN_BUILDKIT_MINIKUBE_VERSION, is_old_runtime, parse_docker_host,
    parse_tolerant,
};
