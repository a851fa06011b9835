//! Local-cluster queries answered by the minikube CLI.

use std::collections::HashMap;
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use super::{DockerEnvFuture, LocalClusterQuery, VersionFuture};
use crate::config::MinikubeConfig;
use crate::error::ClusterError;

const VERSION_PREFIX: &str = "minikube version:";

/// Queries a minikube cluster by shelling out to the `minikube` binary.
///
/// Child processes are killed when the query future is dropped, and every
/// query is bounded by the configured timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinikubeClient {
    binary: String,
    profile: Option<String>,
    timeout: Duration,
}

impl MinikubeClient {
    /// Creates a client invoking `binary`, optionally scoped to `profile`.
    #[must_use]
    pub fn new(binary: impl Into<String>, profile: Option<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            profile: profile.filter(|value| !value.trim().is_empty()),
            timeout,
        }
    }

    /// Builds a client from the `[minikube]` configuration section.
    #[must_use]
    pub fn from_config(config: &MinikubeConfig) -> Self {
        Self::new(
            config.binary.clone(),
            config.profile.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Returns the argument list for a minikube subcommand.
    fn args<'a>(&'a self, subcommand: &[&'a str]) -> Vec<&'a str> {
        let mut args = Vec::with_capacity(subcommand.len() + 2);
        if let Some(profile) = self.profile.as_deref() {
            args.extend(["-p", profile]);
        }
        args.extend_from_slice(subcommand);
        args
    }

    /// Runs a minikube subcommand and returns its standard output.
    async fn run(&self, subcommand: &[&str]) -> Result<String, ClusterError> {
        let args = self.args(subcommand);
        let command_line = std::iter::once(self.binary.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        debug!(command = %command_line, "querying minikube");

        let mut command = Command::new(&self.binary);
        command.args(&args).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ClusterError::Timeout {
                command: command_line.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| ClusterError::Spawn {
                program: self.binary.clone(),
                message: e.to_string(),
            })?;

        Self::stdout_or_failure(output, command_line)
    }

    fn stdout_or_failure(output: Output, command_line: String) -> Result<String, ClusterError> {
        if !output.status.success() {
            return Err(ClusterError::CommandFailed {
                command: command_line,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| ClusterError::InvalidOutput {
            command: command_line,
            message: e.to_string(),
        })
    }
}

impl LocalClusterQuery for MinikubeClient {
    fn docker_env(&self) -> DockerEnvFuture<'_> {
        Box::pin(async move {
            let stdout = self.run(&["docker-env", "--shell", "none"]).await?;
            Ok(parse_docker_env_output(&stdout))
        })
    }

    fn version(&self) -> VersionFuture<'_> {
        Box::pin(async move {
            let stdout = self.run(&["version"]).await?;
            parse_version_output(&stdout).ok_or_else(|| ClusterError::InvalidOutput {
                command: format!("{} version", self.binary),
                message: String::from("no version reported"),
            })
        })
    }
}

/// Parses `minikube docker-env --shell none` output into a variable map.
///
/// Each meaningful line is `NAME=VALUE`. Blank lines, `#` comments and lines
/// without `=` are skipped. Matching surrounding quotes are removed from
/// values.
#[must_use]
pub fn parse_docker_env_output(output: &str) -> HashMap<String, String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(name, value)| (name.trim().to_owned(), unquote(value.trim()).to_owned()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Extracts the version from `minikube version` output.
///
/// Recent releases print `minikube version: v1.32.0` followed by a commit
/// line; older ones print only the version. Returns `None` when the output
/// has no non-empty line.
#[must_use]
pub fn parse_version_output(output: &str) -> Option<String> {
    let mut lines = output.lines().map(str::trim).filter(|line| !line.is_empty());

    output
        .lines()
        .find_map(|line| line.trim().strip_prefix(VERSION_PREFIX))
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .or_else(|| lines.next())
        .map(str::to_owned)
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(value)
}
