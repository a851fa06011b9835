//! `Then` steps for environment resolution scenarios.

use dockenv::engine::DockerEnv;
use dockenv::error::EnvError;
use rstest_bdd_macros::then;

use super::{EnvResolutionState, StepResult};

fn resolved_cluster(state: &EnvResolutionState) -> StepResult<DockerEnv> {
    let cluster_env = state
        .cluster_env
        .get()
        .ok_or("cluster environment should be resolved")?;
    cluster_env
        .into_result()
        .map_err(|_| "cluster environment should have resolved without error")
}

fn resolved_local(state: &EnvResolutionState) -> StepResult<DockerEnv> {
    let local_env = state
        .local_env
        .get()
        .ok_or("local environment should be resolved")?;
    local_env
        .into_result()
        .map_err(|_| "local environment should have resolved without error")
}

fn cluster_error(state: &EnvResolutionState) -> StepResult<EnvError> {
    let cluster_env = state
        .cluster_env
        .get()
        .ok_or("cluster environment should be resolved")?;
    cluster_env
        .error()
        .cloned()
        .ok_or("cluster environment should carry an error")
}

#[then("the cluster host is \"{expected}\"")]
fn the_cluster_host_is(env_resolution_state: &EnvResolutionState, expected: String) -> StepResult<()> {
    let env = resolved_cluster(env_resolution_state)?;
    assert_eq!(env.host, expected, "unexpected cluster host");
    Ok(())
}

#[then("the cluster runtime bug flag is set")]
fn the_cluster_flag_is_set(env_resolution_state: &EnvResolutionState) -> StepResult<()> {
    let env = resolved_cluster(env_resolution_state)?;
    assert!(env.is_old_runtime_bug, "expected the cluster to be flagged");
    Ok(())
}

#[then("the cluster runtime bug flag is clear")]
fn the_cluster_flag_is_clear(env_resolution_state: &EnvResolutionState) -> StepResult<()> {
    let env = resolved_cluster(env_resolution_state)?;
    assert!(!env.is_old_runtime_bug, "expected the cluster not to be flagged");
    Ok(())
}

#[then("the cluster environment failed with an endpoint parse error")]
fn the_cluster_failed_with_endpoint_error(
    env_resolution_state: &EnvResolutionState,
) -> StepResult<()> {
    let error = cluster_error(env_resolution_state)?;
    assert!(
        matches!(error, EnvError::EndpointParse { .. }),
        "expected an endpoint parse error, got {error:?}"
    );
    Ok(())
}

#[then("the cluster environment failed with a cluster query error")]
fn the_cluster_failed_with_query_error(
    env_resolution_state: &EnvResolutionState,
) -> StepResult<()> {
    let error = cluster_error(env_resolution_state)?;
    assert!(
        matches!(error, EnvError::ClusterQuery(_)),
        "expected a cluster query error, got {error:?}"
    );
    Ok(())
}

#[then("the local host is empty")]
fn the_local_host_is_empty(env_resolution_state: &EnvResolutionState) -> StepResult<()> {
    let env = resolved_local(env_resolution_state)?;
    assert!(env.host.is_empty(), "expected no local host, got {}", env.host);
    Ok(())
}

#[then("the local host is \"{expected}\"")]
fn the_local_host_is(env_resolution_state: &EnvResolutionState, expected: String) -> StepResult<()> {
    let env = resolved_local(env_resolution_state)?;
    assert_eq!(env.host, expected, "unexpected local host");
    Ok(())
}

#[then("the local runtime bug flag is set")]
fn the_local_flag_is_set(env_resolution_state: &EnvResolutionState) -> StepResult<()> {
    let env = resolved_local(env_resolution_state)?;
    assert!(env.is_old_runtime_bug, "expected the local env to be flagged");
    Ok(())
}

#[then("the local runtime bug flag is clear")]
fn the_local_flag_is_clear(env_resolution_state: &EnvResolutionState) -> StepResult<()> {
    let env = resolved_local(env_resolution_state)?;
    assert!(!env.is_old_runtime_bug, "expected the local env not to be flagged");
    Ok(())
}
