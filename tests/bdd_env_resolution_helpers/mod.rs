//! Behavioural test helpers for Docker environment resolution.
//!
//! Provides the scenario state, a stub local cluster, and the `Given`/`When`
//! steps. Assertions live in [`assertions`].

mod assertions;

use std::collections::HashMap;
use std::future;

use clap::ValueEnum;
use dockenv::cluster::{
    ClusterKind, ContainerRuntime, DockerEnvFuture, LocalClusterQuery, VersionFuture,
};
use dockenv::engine::{ClusterEnv, DOCKER_HOST, EnvResolver, LocalEnv};
use dockenv::error::ClusterError;
use mockable::MockEnv;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, when};

#[expect(
    unused_imports,
    reason = "rstest-bdd discovers step functions via attributes, not runtime usage"
)]
pub use assertions::*;

/// Step result type for BDD tests, using a static string for errors.
pub type StepResult<T> = Result<T, &'static str>;

/// State shared across environment resolution scenarios.
#[derive(Default, ScenarioState)]
pub struct EnvResolutionState {
    /// Process environment variables visible to the resolver.
    env_vars: Slot<HashMap<String, String>>,
    /// The active cluster kind.
    cluster_kind: Slot<ClusterKind>,
    /// The active container runtime.
    runtime: Slot<ContainerRuntime>,
    /// `docker-env` values reported by the stub cluster.
    reported_env: Slot<HashMap<String, String>>,
    /// Version reported by the stub cluster.
    reported_version: Slot<String>,
    /// Whether the stub cluster fails every query.
    stopped: Slot<bool>,
    /// The resolved cluster environment.
    pub cluster_env: Slot<ClusterEnv>,
    /// The resolved local environment.
    pub local_env: Slot<LocalEnv>,
}

/// Fixture providing a fresh resolution state.
#[fixture]
pub fn env_resolution_state() -> EnvResolutionState {
    let state = EnvResolutionState::default();
    state.env_vars.set(HashMap::new());
    state.reported_env.set(HashMap::new());
    state.stopped.set(false);
    state
}

/// A local cluster answering from canned values.
struct StubCluster {
    docker_env: Result<HashMap<String, String>, ClusterError>,
    version: Result<String, ClusterError>,
}

impl StubCluster {
    fn from_state(state: &EnvResolutionState) -> Self {
        if state.stopped.get().unwrap_or(false) {
            let stopped = ClusterError::CommandFailed {
                command: String::from("minikube docker-env --shell none"),
                status: 89,
                stderr: String::from("The control plane node must be running"),
            };
            return Self {
                docker_env: Err(stopped.clone()),
                version: Err(stopped),
            };
        }

        Self {
            docker_env: Ok(state.reported_env.get().unwrap_or_default()),
            version: state
                .reported_version
                .get()
                .ok_or_else(|| ClusterError::InvalidOutput {
                    command: String::from("minikube version"),
                    message: String::from("no version reported"),
                }),
        }
    }
}

impl LocalClusterQuery for StubCluster {
    fn docker_env(&self) -> DockerEnvFuture<'_> {
        Box::pin(future::ready(self.docker_env.clone()))
    }

    fn version(&self) -> VersionFuture<'_> {
        Box::pin(future::ready(self.version.clone()))
    }
}

/// Creates a `MockEnv` from a snapshot of the scenario's variables.
fn create_mock_env(state: &EnvResolutionState) -> StepResult<MockEnv> {
    let vars = state
        .env_vars
        .get()
        .ok_or("env_vars should be initialised")?;
    let mut mock = MockEnv::new();
    mock.expect_string()
        .returning(move |key| vars.get(key).cloned());
    Ok(mock)
}

#[given("the cluster is {kind} with the {runtime} runtime")]
fn cluster_is(
    env_resolution_state: &EnvResolutionState,
    kind: String,
    runtime: String,
) -> StepResult<()> {
    let kind = ClusterKind::from_str(&kind, true).map_err(|_| "unknown cluster kind")?;
    let runtime =
        ContainerRuntime::from_str(&runtime, true).map_err(|_| "unknown container runtime")?;
    env_resolution_state.cluster_kind.set(kind);
    env_resolution_state.runtime.set(runtime);
    Ok(())
}

#[given("minikube reports DOCKER_HOST \"{value}\"")]
fn minikube_reports_host(env_resolution_state: &EnvResolutionState, value: String) {
    let mut reported = env_resolution_state.reported_env.get().unwrap_or_default();
    reported.insert(String::from(DOCKER_HOST), value);
    env_resolution_state.reported_env.set(reported);
}

#[given("minikube reports version \"{version}\"")]
fn minikube_reports_version(env_resolution_state: &EnvResolutionState, version: String) {
    env_resolution_state.reported_version.set(version);
}

#[given("minikube is not running")]
fn minikube_is_not_running(env_resolution_state: &EnvResolutionState) {
    env_resolution_state.stopped.set(true);
}

#[given("DOCKER_HOST is set to \"{value}\"")]
fn docker_host_is_set_to(env_resolution_state: &EnvResolutionState, value: String) {
    let mut vars = env_resolution_state.env_vars.get().unwrap_or_default();
    vars.insert(String::from(DOCKER_HOST), value);
    env_resolution_state.env_vars.set(vars);
}

#[when("the cluster environment is resolved")]
fn the_cluster_environment_is_resolved(
    env_resolution_state: &EnvResolutionState,
) -> StepResult<()> {
    let env = create_mock_env(env_resolution_state)?;
    let resolver = EnvResolver::new(&env);
    let stub = StubCluster::from_state(env_resolution_state);
    let kind = env_resolution_state
        .cluster_kind
        .get()
        .ok_or("cluster kind should be set")?;
    let runtime = env_resolution_state
        .runtime
        .get()
        .ok_or("runtime should be set")?;

    let cluster_env = resolver
        .resolve_cluster_blocking(kind, runtime, &stub)
        .map_err(|_| "tokio runtime should be created")?;
    env_resolution_state.cluster_env.set(cluster_env);
    Ok(())
}

#[when("the local environment is resolved")]
fn the_local_environment_is_resolved(
    env_resolution_state: &EnvResolutionState,
) -> StepResult<()> {
    let env = create_mock_env(env_resolution_state)?;
    let resolver = EnvResolver::new(&env);
    let cluster_env = env_resolution_state
        .cluster_env
        .get()
        .ok_or("cluster environment should be resolved first")?;

    env_resolution_state
        .local_env
        .set(resolver.resolve_local(&cluster_env));
    Ok(())
}
