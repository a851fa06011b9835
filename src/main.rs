//! `dockenv` application entry point.
//!
//! Prints the Docker client environment for the active cluster, or checks
//! that its daemon answers. It uses `eyre` for opaque error handling at the
//! application boundary, converting domain-specific errors into
//! human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/dockenv/config.toml` or path from `DOCKENV_CONFIG_PATH`)
//! 3. Environment variables (`DOCKENV_*`)
//! 4. Command-line arguments
//!
//! Logs go to stderr so stdout stays a clean `NAME=VALUE` stream.

use clap::Parser;
use dockenv::cluster::MinikubeClient;
use dockenv::config::{AppConfig, Cli, Commands, DEFAULT_LOG_LEVEL, PrintArgs, load_config};
use dockenv::engine::{ClusterEnv, DockerEnv, EngineConnector, EnvResolver};
use dockenv::error::Result as DockenvResult;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
fn main() -> EyreResult<()> {
    let cli = Cli::parse();

    let config = load_config(&cli).map_err(Report::from)?;
    init_tracing(&cli, &config);

    run(&cli, &config).map_err(Report::from)
}

/// Install a stderr `fmt` subscriber.
///
/// `--verbose` forces `debug`. Otherwise `RUST_LOG` wins over the configured
/// level.
fn init_tracing(cli: &Cli, config: &AppConfig) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(config.log_filter())
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
fn run(cli: &Cli, config: &AppConfig) -> DockenvResult<()> {
    let env = DefaultEnv::new();
    let resolver = EnvResolver::new(&env);
    let cluster_env = resolve_cluster(&resolver, config)?;

    match &cli.command {
        Commands::Cluster(args) => {
            let resolved = cluster_env.into_result()?;
            print_env(&resolved, *args);
            Ok(())
        }
        Commands::Local(args) => {
            let resolved = resolver.resolve_local(&cluster_env).into_result()?;
            print_env(&resolved, *args);
            Ok(())
        }
        Commands::Check => check(&cluster_env),
    }
}

fn resolve_cluster(
    resolver: &EnvResolver<'_, DefaultEnv>,
    config: &AppConfig,
) -> DockenvResult<ClusterEnv> {
    let client = MinikubeClient::from_config(&config.minikube);
    info!(
        kind = ?config.cluster.kind,
        runtime = ?config.cluster.runtime,
        "resolving cluster docker environment"
    );
    resolver.resolve_cluster_blocking(config.cluster.kind, config.cluster.runtime, &client)
}

/// Print one `NAME=VALUE` line per set variable, shell-quoted with
/// `--export`.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_env(env: &DockerEnv, args: PrintArgs) {
    let lines = if args.export {
        env.as_exports()
    } else {
        env.as_environ()
    };
    for line in lines {
        println!("{line}");
    }
}

/// Connect to the cluster's daemon, ping it, and report BuildKit support.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn check(cluster_env: &ClusterEnv) -> DockenvResult<()> {
    EngineConnector::connect_and_verify(cluster_env)?;

    let resolved = cluster_env.env().ok();
    let host = resolved
        .map(|env| env.host.as_str())
        .filter(|host| !host.is_empty())
        .unwrap_or(EngineConnector::default_socket());
    println!("daemon at {host} is responding");

    if resolved.is_some_and(|env| env.is_old_runtime_bug) {
        println!("BuildKit: unsupported by this daemon, use the classic builder");
    } else {
        println!("BuildKit: supported");
    }
    Ok(())
}
