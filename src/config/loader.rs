//! Configuration loading with layered precedence.
//!
//! Layers, lowest to highest: application defaults, configuration file,
//! `DOCKENV_*` environment variables, command-line arguments.
//!
//! Layers are composed with `MergeComposer` by hand because the `Cli` owns
//! subcommand dispatch and the `--config` flag, and because typed environment
//! variables must fail loudly rather than be ignored.
//!
//! # Environment Variable Handling
//!
//! String fields such as `DOCKENV_MINIKUBE_PROFILE` are always accepted.
//! Enumerated fields (`DOCKENV_CLUSTER_KIND`) are checked when the layers are
//! merged. `DOCKENV_MINIKUBE_TIMEOUT_SECS` must be an unsigned integer or
//! loading fails with `ConfigError::InvalidValue`.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::Env;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `DOCKENV_CLUSTER_KIND`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["cluster", "kind"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "DOCKENV_LOG_LEVEL",
        path: &["log_level"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKENV_CLUSTER_KIND",
        path: &["cluster", "kind"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKENV_CLUSTER_RUNTIME",
        path: &["cluster", "runtime"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKENV_MINIKUBE_BINARY",
        path: &["minikube", "binary"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKENV_MINIKUBE_PROFILE",
        path: &["minikube", "profile"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKENV_MINIKUBE_TIMEOUT_SECS",
        path: &["minikube", "timeout_secs"],
        var_type: EnvVarType::U64,
    },
];

/// Returns the list of environment variable names recognised by the config
/// loader.
///
/// Tests use this to clear every `DOCKENV_*` variable without keeping a
/// second hard-coded list.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration with full layer precedence from the process
/// environment.
///
/// # Errors
///
/// As [`load_config_with_env`].
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// Load configuration with full layer precedence, reading `DOCKENV_*`
/// variables through `env`.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - the configuration file cannot be read or parsed
/// - `DOCKENV_MINIKUBE_TIMEOUT_SECS` is not an unsigned integer
/// - a value does not deserialise, such as an unknown cluster kind
/// - the merged configuration fails [`AppConfig::validate`]
pub fn load_config_with_env<E: Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path: Option<Utf8PathBuf> =
        cli.config.clone().filter(|p| p.exists()).or_else(|| {
            let discovery = ConfigDiscovery::builder("dockenv")
                .env_var("DOCKENV_CONFIG_PATH")
                .config_file_name("config.toml")
                .dotfile_name(".dockenv.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|p| p.exists())
                .find_map(|p| Utf8PathBuf::try_from(p).ok())
        });

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli)?;
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.validate()?;

    Ok(config)
}

/// Collect `DOCKENV_*` variables into a JSON value following
/// [`ENV_VAR_SPECS`].
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed variable has an unparseable
/// value.
fn collect_env_vars<E: Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::U64 => match raw_value.trim().parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map, creating intermediate
/// objects as needed.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Result<Value> {
    let mut overrides = Map::new();

    if let Some(ref level) = cli.log_level {
        insert_at_path(&mut overrides, &["log_level"], Value::String(level.clone()));
    }

    if let Some(kind) = cli.cluster_kind {
        insert_at_path(&mut overrides, &["cluster", "kind"], to_json(&kind)?);
    }

    if let Some(runtime) = cli.runtime {
        insert_at_path(&mut overrides, &["cluster", "runtime"], to_json(&runtime)?);
    }

    if let Some(ref profile) = cli.minikube_profile {
        insert_at_path(
            &mut overrides,
            &["minikube", "profile"],
            Value::String(profile.clone()),
        );
    }

    if overrides.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(overrides))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to serialise CLI override: {e}"),
        }
        .into()
    })
}
