//! Resolve which Docker daemon a deployment tool should talk to.
//!
//! A local Kubernetes cluster often embeds its own Docker daemon: minikube
//! publishes one through `minikube docker-env`, and microk8s serves one on a
//! snap socket. `dockenv` works out the Docker client environment
//! (`DOCKER_HOST`, `DOCKER_API_VERSION`, `DOCKER_CERT_PATH`,
//! `DOCKER_TLS_VERIFY`) for that daemon, overlays the operator's own
//! `DOCKER_*` variables, and flags daemons too old for BuildKit.
//!
//! # Modules
//!
//! - [`cluster`]: Active cluster facts and the minikube query client
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`engine`]: Environment resolution and Docker client construction
//! - [`error`]: Semantic error types for the application

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
