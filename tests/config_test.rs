//! Configuration loading from files and the environment

use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use interphone::shared::{AppConfig, ConfigError};

const ENV_KEYS: &[&str] = &[
    "DATABASE_URL",
    "JWT_SECRET",
    "SERVER_PORT",
    "NOTIFICATION_FUNCTION_URL",
    "NOTIFICATION_FUNCTION_KEY",
    "GEOCODE_BASE_URL",
    "PUBLIC_BASE_URL",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write config");
    file
}

#[test]
#[serial]
fn test_load_file_then_env_overrides() {
    clear_env();
    let file = config_file(
        r#"
        jwt_secret = "from-file"
        server_port = 8080
        public_base_url = "https://interphone.example.fr/"
        "#,
    );
    std::env::set_var("SERVER_PORT", "9090");

    let config = AppConfig::load(file.path()).unwrap();
    clear_env();

    assert_eq!(config.jwt_secret, "from-file");
    assert_eq!(config.server_port, 9090);
    assert_eq!(config.public_base_url, "https://interphone.example.fr");
    assert!(!config.uses_development_secret());
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config, AppConfig::default());
    assert!(config.uses_development_secret());
}

#[test]
#[serial]
fn test_blank_env_values_are_ignored() {
    clear_env();
    std::env::set_var("JWT_SECRET", "   ");
    let config = AppConfig::from_env().unwrap();
    clear_env();
    assert!(config.uses_development_secret());
}

#[test]
#[serial]
fn test_invalid_port_is_rejected() {
    clear_env();
    std::env::set_var("SERVER_PORT", "not-a-port");
    let result = AppConfig::from_env();
    clear_env();
    assert!(matches!(result, Err(ConfigError::InvalidValue { key: "SERVER_PORT", .. })));
}

#[test]
#[serial]
fn test_unknown_file_key_is_parse_error() {
    clear_env();
    let file = config_file("smtp_host = \"localhost\"\n");
    assert!(matches!(AppConfig::load(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
#[serial]
fn test_missing_file_is_io_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("interphone.toml");
    assert!(matches!(AppConfig::load(&missing), Err(ConfigError::Io(_))));
}

#[test]
#[serial]
fn test_non_http_function_url_is_rejected() {
    clear_env();
    std::env::set_var("NOTIFICATION_FUNCTION_URL", "ftp://mail.example.fr");
    let result = AppConfig::from_env();
    clear_env();
    assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
}
