//! Configuration for the sales forecasting session
//!
//! Values start from built-in defaults, are patched from `crumbl.toml` (or an
//! explicit path), then from `CRUMBL_*` environment variables, then from
//! explicit overrides such as command-line flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommendations::RecommendationPolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub recommendations: RecommendationPolicy,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DataConfig {
    pub path: PathBuf,
    /// Seed for synthesized `units_sold` values; random when unset
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub features_path: PathBuf,
    pub strict_schema: bool,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub features_path: Option<PathBuf>,
    pub strict_schema: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig { path: PathBuf::from("crumbl_mock_data.csv"), seed: None },
            model: ModelConfig {
                path: PathBuf::from("crumbl_sales_model.json"),
                features_path: PathBuf::from("feature_columns.json"),
                strict_schema: false,
            },
            recommendations: RecommendationPolicy::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("crumbl.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides_with(read_env)?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML document on top of the defaults, without touching the environment
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let patch = toml::from_str::<ConfigPatch>(raw).map_err(|source| {
            ConfigError::ParseFile { path: PathBuf::from("<inline>"), source }
        })?;
        let mut config = Self::default();
        config.apply_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data) = patch.data {
            if let Some(path) = data.path {
                self.data.path = path;
            }
            if let Some(seed) = data.seed {
                self.data.seed = Some(seed);
            }
        }

        if let Some(model) = patch.model {
            if let Some(path) = model.path {
                self.model.path = path;
            }
            if let Some(features_path) = model.features_path {
                self.model.features_path = features_path;
            }
            if let Some(strict_schema) = model.strict_schema {
                self.model.strict_schema = strict_schema;
            }
        }

        if let Some(recommendations) = patch.recommendations {
            if let Some(value) = recommendations.surge_threshold_pct {
                self.recommendations.surge_threshold_pct = value;
            }
            if let Some(value) = recommendations.slump_threshold_pct {
                self.recommendations.slump_threshold_pct = value;
            }
            if let Some(value) = recommendations.batch_size {
                self.recommendations.batch_size = value;
            }
            if let Some(value) = recommendations.baker_throughput {
                self.recommendations.baker_throughput = value;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    /// Apply `CRUMBL_*` overrides read through `lookup`
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CRUMBL_DATA_PATH") {
            self.data.path = PathBuf::from(value);
        }
        if let Some(value) = lookup("CRUMBL_DATA_SEED") {
            self.data.seed = Some(parse_u64("CRUMBL_DATA_SEED", &value)?);
        }

        if let Some(value) = lookup("CRUMBL_MODEL_PATH") {
            self.model.path = PathBuf::from(value);
        }
        if let Some(value) = lookup("CRUMBL_FEATURES_PATH") {
            self.model.features_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("CRUMBL_STRICT_SCHEMA") {
            self.model.strict_schema = parse_bool("CRUMBL_STRICT_SCHEMA", &value)?;
        }

        let log_level = lookup("CRUMBL_LOGGING_LEVEL").or_else(|| lookup("CRUMBL_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = lookup("CRUMBL_LOGGING_FORMAT").or_else(|| lookup("CRUMBL_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(data_path) = overrides.data_path {
            self.data.path = data_path;
        }
        if let Some(model_path) = overrides.model_path {
            self.model.path = model_path;
        }
        if let Some(features_path) = overrides.features_path {
            self.model.features_path = features_path;
        }
        if let Some(strict_schema) = overrides.strict_schema {
            self.model.strict_schema = strict_schema;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_paths(self)?;
        self.recommendations
            .validate()
            .map_err(|err| ConfigError::Validation(format!("recommendations: {err}")))?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("crumbl.toml"), PathBuf::from("config/crumbl.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_paths(config: &AppConfig) -> Result<(), ConfigError> {
    let checks = [
        ("data.path", &config.data.path),
        ("model.path", &config.model.path),
        ("model.features_path", &config.model.features_path),
    ];
    for (key, path) in checks {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!("{key} must not be empty")));
        }
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    data: Option<DataPatch>,
    model: Option<ModelPatch>,
    recommendations: Option<RecommendationsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    path: Option<PathBuf>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelPatch {
    path: Option<PathBuf>,
    features_path: Option<PathBuf>,
    strict_schema: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationsPatch {
    surge_threshold_pct: Option<f64>,
    slump_threshold_pct: Option<f64>,
    batch_size: Option<f64>,
    baker_throughput: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
