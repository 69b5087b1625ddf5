//! Integration tests for configuration loading.

use scrobstats_config::{Config, ConfigLoader};
use std::fs;

const YAML_CONFIG: &str = r#"
backend:
  url: "https://stats.example.com/.netlify/functions"
  timeout_seconds: 20
lastfm:
  api_key: "abc"
  api_secret: "shh"
dashboard:
  default_year: 2022
  initial_years: [2022, 2021]
  palette: "palette4"
logging:
  level: "warn"
  format: "json"
"#;

const TOML_CONFIG: &str = r#"
[discogs]
api_key = "consumer"
api_secret = "secret"
per_page = 25

[dashboard]
default_year = 2020
"#;

#[test]
fn test_load_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scrobstats.yaml");
    fs::write(&path, YAML_CONFIG).unwrap();

    let config = ConfigLoader::read_file(&path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.backend.url, "https://stats.example.com/.netlify/functions");
    assert_eq!(config.backend.timeout_seconds, Some(20));
    assert_eq!(config.lastfm.api_key, "abc");
    assert_eq!(config.dashboard.starting_years(), vec![2022, 2021]);
    assert_eq!(config.dashboard.palette, "palette4");
    assert_eq!(config.logging.level, "warn");
    // Unspecified sections keep their defaults.
    assert_eq!(config.discogs.per_page, 50);
}

#[test]
fn test_load_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scrobstats.toml");
    fs::write(&path, TOML_CONFIG).unwrap();

    let config = ConfigLoader::read_file(&path).unwrap();

    assert_eq!(config.discogs.api_key, "consumer");
    assert_eq!(config.discogs.per_page, 25);
    assert_eq!(config.dashboard.starting_years(), vec![2020]);
    assert_eq!(config.dashboard.palette, "palette10");
}

#[test]
fn test_invalid_file_content_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scrobstats.yaml");
    fs::write(&path, "backend: [this is not a map").unwrap();

    assert!(ConfigLoader::read_file(&path).is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scrobstats.yaml");
    fs::write(&path, "discogs:\n  per_page: 500\n").unwrap();

    let config = ConfigLoader::read_file(&path).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_serializes_back_to_yaml() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(parsed.backend.url, config.backend.url);
    assert_eq!(parsed.dashboard.default_year, config.dashboard.default_year);
}

#[test]
fn test_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ConfigLoader::load_from_file(dir.path().join("absent.yaml")).is_err());
}
