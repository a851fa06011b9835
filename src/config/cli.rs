//! Command-line argument definitions for dockenv.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::cluster::{ClusterKind, ContainerRuntime};

/// Command-line interface for dockenv.
#[derive(Debug, Parser)]
#[command(name = "dockenv")]
#[command(
    author,
    version,
    about = "Resolve which Docker daemon to use for the active cluster"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Kind of the active cluster.
    #[arg(long, global = true, value_enum)]
    pub cluster_kind: Option<ClusterKind>,

    /// Container runtime of the active cluster.
    #[arg(long, global = true, value_enum)]
    pub runtime: Option<ContainerRuntime>,

    /// minikube profile to query.
    #[arg(long, global = true)]
    pub minikube_profile: Option<String>,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log at debug level regardless of other settings.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the environment for the cluster's Docker daemon.
    Cluster(PrintArgs),

    /// Print the environment of the local Docker client.
    Local(PrintArgs),

    /// Connect to the cluster's Docker daemon and ping it.
    Check,
}

/// Arguments for the `cluster` and `local` subcommands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PrintArgs {
    /// Prefix each line with `export ` for shell evaluation.
    #[arg(long)]
    pub export: bool,
}
