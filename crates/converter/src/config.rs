use config::{Config as ConfigLoader, Environment, File, Map};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use common::types::RoundingPolicy;
use converter_core::BuildOptions;

const ENV_PREFIX: &str = "CONVERTER";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RoundingConfig {
    pub rate_scale: u32,
    pub output_scale: u32,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        let policy = RoundingPolicy::default();
        RoundingConfig {
            rate_scale: policy.rate_scale,
            output_scale: policy.output_scale,
        }
    }
}

impl RoundingConfig {
    pub fn policy(&self) -> RoundingPolicy {
        RoundingPolicy {
            rate_scale: self.rate_scale,
            output_scale: self.output_scale,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ValidationConfig {
    pub reject_duplicate_pairs: bool,
    pub require_alphabetic_tickers: bool,
}

impl ValidationConfig {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            reject_duplicate_pairs: self.reject_duplicate_pairs,
            require_alphabetic_tickers: self.require_alphabetic_tickers,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// Keep processing the remaining files after one fails.
    pub continue_on_error: bool,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            continue_on_error: false,
            log_filter: "warn".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub rounding: RoundingConfig,
    pub validation: ValidationConfig,
    pub run: RunConfig,
}

fn default_config_path() -> Result<PathBuf, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    Ok(base_path
        .join("crates")
        .join("converter")
        .join("Config.toml"))
}

/// Loads configuration from defaults, a TOML file and environment variables.
///
/// An explicit `path` must exist. Without one, `crates/converter/Config.toml`
/// under the working directory is used when present. `CONVERTER__<SECTION>__<KEY>`
/// variables override file values.
pub fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    load_config_with_env(path, None)
}

/// Like [`load_config`], but reads overrides from `env_vars` instead of the
/// process environment when given.
fn load_config_with_env(
    path: Option<&Path>,
    env_vars: Option<Map<String, String>>,
) -> Result<Config, Error> {
    let (config_file_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path()?, false),
    };

    if required && !config_file_path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at: {}",
            config_file_path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(config_file_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .separator("__")
                .source(env_vars),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write config content");
        file
    }

    #[test]
    fn defaults_match_rounding_policy() {
        let config = Config::default();

        assert_eq!(config.rounding.policy(), RoundingPolicy::default());
        assert_eq!(config.validation.build_options(), BuildOptions::default());
        assert!(!config.run.continue_on_error);
        assert_eq!(config.run.log_filter, "warn");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let file = toml_file(
            "[rounding]\nrate_scale = 6\n\n[validation]\nreject_duplicate_pairs = true\n",
        );

        let config = load_config(Some(file.path())).expect("config should load");

        assert_eq!(config.rounding.rate_scale, 6);
        assert_eq!(config.rounding.output_scale, 0);
        assert!(config.validation.reject_duplicate_pairs);
        assert!(!config.validation.require_alphabetic_tickers);
        assert_eq!(config.run, RunConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = load_config(Some(Path::new("does/not/exist/Config.toml")));

        assert!(
            matches!(result, Err(Error::ConfigLoadError(_))),
            "Expected ConfigLoadError, got: {:?}",
            result
        );
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = toml_file(
            "[rounding]\nrate_scale = 6\n\n[run]\nlog_filter = \"info\"\n",
        );
        let env_vars: Map<String, String> = [
            ("CONVERTER__RUN__LOG_FILTER", "debug"),
            ("CONVERTER__RUN__CONTINUE_ON_ERROR", "true"),
            ("CONVERTER__ROUNDING__OUTPUT_SCALE", "2"),
            ("OTHER__ROUNDING__RATE_SCALE", "9"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let config = load_config_with_env(Some(file.path()), Some(env_vars))
            .expect("config should load");

        assert_eq!(config.rounding.rate_scale, 6);
        assert_eq!(config.rounding.output_scale, 2);
        assert!(config.run.continue_on_error);
        assert_eq!(config.run.log_filter, "debug");
    }

    #[test]
    fn malformed_value_is_an_error() {
        let file = toml_file("[rounding]\nrate_scale = \"four\"\n");

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }
}
