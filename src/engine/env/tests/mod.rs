//! Unit tests for Docker environment resolution.
//!
//! - [`helpers`] - Environment and cluster-query doubles
//! - [`env_tests`] - `DockerEnv` serialisation and the provenance wrappers
//! - [`overlay_tests`] - `DOCKER_*` overlay and host-change reset
//! - [`resolver_tests`] - Cluster and local resolution

mod helpers;
