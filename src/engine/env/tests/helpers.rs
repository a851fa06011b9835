//! Environment and cluster-query doubles shared by the resolution tests.

use std::collections::HashMap;

use mockable::MockEnv;
use mockall::mock;
use rstest::fixture;

use crate::cluster::{DockerEnvFuture, LocalClusterQuery, VersionFuture};
use crate::error::ClusterError;

mock! {
    #[derive(Debug)]
    pub Query {}

    impl LocalClusterQuery for Query {
        fn docker_env<'a>(&'a self) -> DockerEnvFuture<'a>;
        fn version<'a>(&'a self) -> VersionFuture<'a>;
    }
}

/// Host reported by the minikube VM in the resolution scenarios.
pub const MINIKUBE_HOST: &str = "tcp://192.168.99.100:2376";

/// Builds a `MockEnv` answering from the given variable pairs.
pub fn env_with(vars: &[(&str, &str)]) -> MockEnv {
    let owned: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (String::from(*k), String::from(*v)))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .returning(move |key| owned.get(key).cloned());
    env
}

/// Fixture providing a `MockEnv` with no variables set.
#[fixture]
pub fn empty_env() -> MockEnv {
    env_with(&[])
}

/// Fixture providing a tokio runtime for driving async resolution.
#[fixture]
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
}

/// Builds a query double returning `vars` from `docker_env` and `version`
/// from `version`.
pub fn minikube_query(
    vars: &[(&str, &str)],
    version: Result<&str, ClusterError>,
) -> MockQuery {
    let docker_env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (String::from(*k), String::from(*v)))
        .collect();
    let version = version.map(String::from);

    let mut query = MockQuery::new();
    query.expect_docker_env().times(1).returning(move || {
        let vars = docker_env.clone();
        Box::pin(async move { Ok(vars) })
    });
    query.expect_version().times(1).returning(move || {
        let reported = version.clone();
        Box::pin(async move { reported })
    });
    query
}

/// Builds a query double whose `docker_env` fails and whose `version` must
/// not be called.
pub fn failing_minikube_query(error: ClusterError) -> MockQuery {
    let mut query = MockQuery::new();
    query.expect_docker_env().times(1).returning(move || {
        let failure = error.clone();
        Box::pin(async move { Err(failure) })
    });
    query.expect_version().never();
    query
}

/// Builds a query double that must not be called at all.
pub fn untouched_query() -> MockQuery {
    let mut query = MockQuery::new();
    query.expect_docker_env().never();
    query.expect_version().never();
    query
}

/// A failure as reported by a stopped minikube.
pub fn minikube_stopped() -> ClusterError {
    ClusterError::CommandFailed {
        command: String::from("minikube docker-env --shell none"),
        status: 85,
        stderr: String::from("The control plane node must be running for this command"),
    }
}
