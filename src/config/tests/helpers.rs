//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use mockable::MockEnv;
use ortho_config::MergeComposer;
use rstest::fixture;

use crate::cluster::{ClusterKind, ContainerRuntime};
use crate::config::{AppConfig, Cli, Commands};

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        log_level = "debug"

        [cluster]
        kind = "minikube"
        runtime = "docker"

        [minikube]
        binary = "/opt/minikube/bin/minikube"
        profile = "dev"
        timeout_secs = 45
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        [cluster]
        kind = "microk8s"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing a `Cli` with no overrides and no config path.
#[fixture]
pub fn bare_cli() -> Cli {
    Cli {
        command: Commands::Check,
        config: None,
        cluster_kind: None,
        runtime: None,
        minikube_profile: None,
        log_level: None,
        verbose: false,
    }
}

/// Helper: a `MockEnv` answering from `vars` and `None` for anything else.
pub fn env_with(vars: &[(&str, &str)]) -> MockEnv {
    let owned: Vec<(String, String)> = vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string().returning(move |key| {
        owned
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    });
    env
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(config.log_level.is_none(), "log_level should be None");
    assert_eq!(
        config.cluster.kind,
        ClusterKind::Unknown,
        "cluster.kind should be Unknown"
    );
    assert_eq!(
        config.cluster.runtime,
        ContainerRuntime::Docker,
        "cluster.runtime should be Docker"
    );
    assert_eq!(
        config.minikube.binary, "minikube",
        "minikube.binary should be minikube"
    );
    assert!(
        config.minikube.profile.is_none(),
        "minikube.profile should be None"
    );
    assert_eq!(
        config.minikube.timeout_secs, 30,
        "minikube.timeout_secs should be 30"
    );
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for
/// testing layer precedence.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "cluster": { "kind": "minikube" },
            "minikube": { "profile": "from-file", "timeout_secs": 60 }
        }),
        None,
    );

    composer.push_environment(json!({
        "minikube": { "profile": "from-env" }
    }));

    Ok(composer)
}
