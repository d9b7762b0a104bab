//! Tests for `src/config.rs` file loading and path layout.

use std::path::PathBuf;

use sitesmith::config::{load_config, Config, RuntimePaths};
use sitesmith::providers::SamplingConfig;

#[test]
fn missing_file_yields_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = load_config(&tmp.path().join("absent.toml")).expect("missing file is fine");

    assert_eq!(
        config.inference.endpoint,
        "https://models.github.ai/inference/chat/completions"
    );
    assert_eq!(config.inference.sampling(), SamplingConfig::default());
    assert!(config.storage.database.is_none());
}

#[test]
fn full_file_overrides_every_field() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[inference]
endpoint = "http://127.0.0.1:9999/v1/chat/completions"
model = "local/llama"
credential_key = "LOCAL_TOKEN"
temperature = 0.2
top_p = 0.5
max_tokens = 512
request_timeout_secs = 45

[storage]
database = "/var/lib/sitesmith/ideas.db"
"#,
    )
    .expect("should write config");

    let config = load_config(&path).expect("should load");
    assert_eq!(config.inference.model, "local/llama");
    assert_eq!(config.inference.credential_key, "LOCAL_TOKEN");
    assert_eq!(config.inference.request_timeout_secs, Some(45));
    assert_eq!(config.inference.sampling().max_tokens, 512);
    assert_eq!(
        config.storage.database,
        Some(PathBuf::from("/var/lib/sitesmith/ideas.db"))
    );
}

#[test]
fn malformed_file_is_an_error() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[inference\nmodel = ").expect("should write config");

    let err = load_config(&path).expect_err("malformed TOML must fail");
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn runtime_paths_layout() {
    let paths = RuntimePaths::under(PathBuf::from("/home/u/.sitesmith"));
    assert_eq!(paths.config_toml, PathBuf::from("/home/u/.sitesmith/config.toml"));
    assert_eq!(paths.env_file, PathBuf::from("/home/u/.sitesmith/.env"));
    assert_eq!(paths.database, PathBuf::from("/home/u/.sitesmith/sitesmith.db"));
    assert_eq!(paths.logs_dir, PathBuf::from("/home/u/.sitesmith/logs"));
}

#[test]
fn database_path_prefers_configured_value() {
    let paths = RuntimePaths::under(PathBuf::from("/root/.sitesmith"));
    let mut config = Config::default();
    assert_eq!(config.database_path(&paths), paths.database);

    config.storage.database = Some(PathBuf::from("/tmp/other.db"));
    assert_eq!(config.database_path(&paths), PathBuf::from("/tmp/other.db"));
}
