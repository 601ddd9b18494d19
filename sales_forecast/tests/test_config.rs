use pretty_assertions::assert_eq;
use sales_forecast::config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();

    assert_eq!(config.data.path, PathBuf::from("crumbl_mock_data.csv"));
    assert_eq!(config.data.seed, None);
    assert_eq!(config.model.path, PathBuf::from("crumbl_sales_model.json"));
    assert_eq!(config.model.features_path, PathBuf::from("feature_columns.json"));
    assert!(!config.model.strict_schema);
    assert_eq!(config.recommendations.surge_threshold_pct, 15.0);
    assert_eq!(config.recommendations.slump_threshold_pct, -10.0);
    assert_eq!(config.recommendations.batch_size, 12.0);
    assert_eq!(config.recommendations.baker_throughput, 150.0);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Compact);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_patches_defaults() {
    let config = AppConfig::from_toml_str(
        r#"
[data]
path = "history/sales.csv"
seed = 11

[model]
strict_schema = true

[recommendations]
surge_threshold_pct = 25.0
batch_size = 24.0

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    assert_eq!(config.data.path, PathBuf::from("history/sales.csv"));
    assert_eq!(config.data.seed, Some(11));
    assert_eq!(config.model.path, PathBuf::from("crumbl_sales_model.json"));
    assert!(config.model.strict_schema);
    assert_eq!(config.recommendations.surge_threshold_pct, 25.0);
    assert_eq!(config.recommendations.slump_threshold_pct, -10.0);
    assert_eq!(config.recommendations.batch_size, 24.0);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_toml_parse_error() {
    let result = AppConfig::from_toml_str("[data\npath = 1");
    assert!(matches!(result, Err(ConfigError::ParseFile { .. })));
}

#[test]
fn test_env_overrides() {
    let mut config = AppConfig::default();
    config
        .apply_env_overrides_with(lookup_from(&[
            ("CRUMBL_DATA_PATH", "/srv/crumbl/sales.csv"),
            ("CRUMBL_DATA_SEED", "99"),
            ("CRUMBL_STRICT_SCHEMA", "true"),
            ("CRUMBL_LOG_LEVEL", "warn"),
            ("CRUMBL_LOGGING_FORMAT", "pretty"),
        ]))
        .unwrap();

    assert_eq!(config.data.path, PathBuf::from("/srv/crumbl/sales.csv"));
    assert_eq!(config.data.seed, Some(99));
    assert!(config.model.strict_schema);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_env_logging_level_prefers_long_name() {
    let mut config = AppConfig::default();
    config
        .apply_env_overrides_with(lookup_from(&[
            ("CRUMBL_LOGGING_LEVEL", "error"),
            ("CRUMBL_LOG_LEVEL", "trace"),
        ]))
        .unwrap();

    assert_eq!(config.logging.level, "error");
}

#[test]
fn test_invalid_env_overrides() {
    let mut config = AppConfig::default();
    let result = config.apply_env_overrides_with(lookup_from(&[("CRUMBL_DATA_SEED", "abc")]));
    match result {
        Err(ConfigError::InvalidEnvOverride { key, value }) => {
            assert_eq!(key, "CRUMBL_DATA_SEED");
            assert_eq!(value, "abc");
        }
        other => panic!("Expected InvalidEnvOverride, got {:?}", other),
    }

    let result = config.apply_env_overrides_with(lookup_from(&[("CRUMBL_LOG_FORMAT", "xml")]));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn test_validation_errors() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    let mut config = AppConfig::default();
    config.model.features_path = PathBuf::new();
    match config.validate() {
        Err(ConfigError::Validation(msg)) => assert!(msg.contains("model.features_path")),
        other => panic!("Expected Validation, got {:?}", other),
    }

    let mut config = AppConfig::default();
    config.recommendations.surge_threshold_pct = -20.0;
    match config.validate() {
        Err(ConfigError::Validation(msg)) => assert!(msg.starts_with("recommendations:")),
        other => panic!("Expected Validation, got {:?}", other),
    }
}

#[test]
fn test_load_from_explicit_file_with_overrides() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[model]").unwrap();
    writeln!(file, "path = \"models/linear.json\"").unwrap();
    writeln!(file, "features_path = \"models/columns.json\"").unwrap();

    let config = AppConfig::load(LoadOptions {
        config_path: Some(file.path().to_path_buf()),
        require_file: true,
        overrides: ConfigOverrides {
            features_path: Some(PathBuf::from("override.json")),
            strict_schema: Some(true),
            ..ConfigOverrides::default()
        },
    })
    .unwrap();

    assert_eq!(config.model.path, PathBuf::from("models/linear.json"));
    assert_eq!(config.model.features_path, PathBuf::from("override.json"));
    assert!(config.model.strict_schema);
}

#[test]
fn test_missing_required_file() {
    let result = AppConfig::load(LoadOptions {
        config_path: Some(PathBuf::from("does/not/exist/crumbl.toml")),
        require_file: true,
        overrides: ConfigOverrides::default(),
    });

    match result {
        Err(ConfigError::MissingConfigFile(path)) => {
            assert_eq!(path, PathBuf::from("does/not/exist/crumbl.toml"));
        }
        other => panic!("Expected MissingConfigFile, got {:?}", other),
    }
}

#[test]
fn test_log_format_parsing() {
    assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    assert!("yaml".parse::<LogFormat>().is_err());
}
