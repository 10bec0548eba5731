//! Tests for configuration file resolution and loading
//!
//! Tests that touch WAGES_CONFIG are marked #[serial] so they do not race
//! on the process environment.

use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::Path;
use wages_common::config::{load_config, resolve_config_path, ConfigSource, TomlConfig, CONFIG_ENV_VAR};
use wages_common::Error;

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_full_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[server]
port = 9000
bind = "0.0.0.0"

[logging]
level = "debug"

[calculator]
time_zone = "America/New_York"
base_rate_by_100 = 1000
regular_rates = [
    { from_hour = 6, rate_by_100 = 0 },
    { from_hour = 20, from_minute = 30, rate_by_100 = 200 },
]
overtime_levels = [
    { threshold_hours = 8, percent = 50 },
]

[csv.fields]
id = "Employee"
stop = "Finish"
"#,
    );

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.bind, "0.0.0.0");
    assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.calculator.base_rate_by_100, 1000);
    assert_eq!(config.calculator.regular_rates.len(), 2);
    assert_eq!(config.csv.fields.id, "Employee");
    assert_eq!(config.csv.fields.name, "Person Name");
    assert_eq!(config.csv.fields.stop, "Finish");

    let settings = config.calculator_settings().unwrap();
    assert_eq!(settings.base_rate_by_100, 1000);
    assert_eq!(settings.overtime_levels.len(), 1);
}

#[test]
fn test_malformed_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[server\nport = ");

    let result = load_config(Some(&path));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_invalid_time_zone_rejected_by_settings() {
    let config = TomlConfig::from_toml_str("[calculator]\ntime_zone = \"Mars/Olympus\"\n").unwrap();
    assert!(config.calculator_settings().is_err());
}

#[test]
#[serial]
fn test_cli_argument_takes_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let cli_path = write_config(dir.path(), "[server]\nport = 9001\n");
    env::set_var(CONFIG_ENV_VAR, "/tmp/wages-test-env-config.toml");

    let resolved = resolve_config_path(Some(&cli_path));
    assert_eq!(resolved, Some(cli_path.clone()));

    let (config, source) = load_config(Some(&cli_path)).unwrap();
    assert_eq!(config.server.port, 9001);
    assert_eq!(source, ConfigSource::File(cli_path));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_argument() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = write_config(dir.path(), "[logging]\nlevel = \"warn\"\n");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let (config, source) = load_config(None).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(source, ConfigSource::File(env_path));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_named_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    env::set_var(CONFIG_ENV_VAR, &missing);

    let (config, source) = load_config(None).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.calculator.base_rate_by_100, 375);
    assert_eq!(source, ConfigSource::Missing(missing));

    env::remove_var(CONFIG_ENV_VAR);
}
