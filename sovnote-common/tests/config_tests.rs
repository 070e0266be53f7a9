//! Integration tests for config discovery and TOML loading
//!
//! Tests that manipulate SOVNOTE_TEST_CONFIG are marked with #[serial]
//! so they do not race each other on the process environment.

use serde::Deserialize;
use serial_test::serial;
use sovnote_common::config::{load_toml_config, resolve_config_path, LoggingConfig};
use sovnote_common::Error;
use std::env;
use std::io::Write;
use std::path::Path;

const ENV_VAR: &str = "SOVNOTE_TEST_CONFIG";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
struct SampleConfig {
    port: Option<u16>,
    logging: LoggingConfig,
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config: SampleConfig =
        load_toml_config(Some(Path::new("/nonexistent/sovnote.toml"))).unwrap();
    assert_eq!(config, SampleConfig::default());
}

#[test]
fn test_no_path_falls_back_to_defaults() {
    let config: SampleConfig = load_toml_config(None).unwrap();
    assert_eq!(config.logging.level, "info");
    assert!(config.port.is_none());
}

#[test]
fn test_partial_file_keeps_defaults_for_missing_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 9000").unwrap();

    let config: SampleConfig = load_toml_config(Some(file.path())).unwrap();
    assert_eq!(config.port, Some(9000));
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_logging_section_parsed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

    let config: SampleConfig = load_toml_config(Some(file.path())).unwrap();
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = = 9000").unwrap();

    let result: Result<SampleConfig, _> = load_toml_config(Some(file.path()));
    match result {
        Err(Error::TomlParse { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("expected TomlParse error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_env_var_used_when_no_cli_arg() {
    env::set_var(ENV_VAR, "/tmp/sovnote-env.toml");

    let resolved = resolve_config_path(None, ENV_VAR, "sovnote-test-module");
    assert_eq!(resolved.as_deref(), Some(Path::new("/tmp/sovnote-env.toml")));

    env::remove_var(ENV_VAR);
}

#[test]
#[serial]
fn test_cli_arg_overrides_env_var() {
    env::set_var(ENV_VAR, "/tmp/sovnote-env.toml");

    let resolved = resolve_config_path(
        Some(Path::new("/tmp/sovnote-cli.toml")),
        ENV_VAR,
        "sovnote-test-module",
    );
    assert_eq!(resolved.as_deref(), Some(Path::new("/tmp/sovnote-cli.toml")));

    env::remove_var(ENV_VAR);
}

#[test]
#[serial]
fn test_blank_env_var_ignored() {
    env::set_var(ENV_VAR, "   ");

    let resolved = resolve_config_path(None, ENV_VAR, "sovnote-test-module-that-has-no-file");
    assert!(resolved.is_none());

    env::remove_var(ENV_VAR);
}
