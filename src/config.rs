//! Configuration loading.
//!
//! Everything lives under `~/.sitesmith/`:
//! - `config.toml`: inference and storage settings (all optional)
//! - `.env`: the inference credential
//! - `sitesmith.db`: stored website ideas
//! - `logs/`: rotated JSON logs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::providers::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::providers::SamplingConfig;

/// Env var that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SITESMITH_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat completion settings.
    pub inference: InferenceConfig,

    /// Persistence settings.
    pub storage: StorageConfig,
}

/// Chat completion endpoint, model, credential and sampling.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Full chat completions URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Credential key looked up in `.env`, then the process environment.
    #[serde(default = "default_credential_key")]
    pub credential_key: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Maximum output tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whole-request timeout. Unset keeps the HTTP client default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            credential_key: default_credential_key(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: None,
        }
    }
}

impl InferenceConfig {
    /// Sampling parameters derived from this config.
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path. Defaults to `~/.sitesmith/sitesmith.db`.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

// Default value functions for serde

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}
fn default_credential_key() -> String {
    "GITHUB_TOKEN".to_owned()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_p() -> f32 {
    0.9
}
fn default_max_tokens() -> u32 {
    6000
}

/// Resolved runtime file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// Root directory (`~/.sitesmith`).
    pub root: PathBuf,
    /// `config.toml` path.
    pub config_toml: PathBuf,
    /// `.env` credentials path.
    pub env_file: PathBuf,
    /// Default database path.
    pub database: PathBuf,
    /// Log directory.
    pub logs_dir: PathBuf,
}

impl RuntimePaths {
    /// Lay out runtime paths under an arbitrary root.
    pub fn under(root: PathBuf) -> Self {
        Self {
            config_toml: root.join("config.toml"),
            env_file: root.join(".env"),
            database: root.join("sitesmith.db"),
            logs_dir: root.join("logs"),
            root,
        }
    }
}

/// Load config from a TOML file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file found, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(anyhow::anyhow!(
                "failed to read config at {}: {e}",
                path.display()
            ))
        }
    };
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Load config from `$SITESMITH_CONFIG` or `~/.sitesmith/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved or the file is
/// invalid.
pub fn load_default_config() -> anyhow::Result<Config> {
    let path = match std::env::var(CONFIG_PATH_ENV) {
        Ok(p) => PathBuf::from(p),
        Err(_) => runtime_paths()?.config_toml,
    };
    load_config(&path)
}

/// Resolve the default config directory (`~/.sitesmith/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".sitesmith"))
}

/// Resolve all runtime paths under [`config_dir`].
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn runtime_paths() -> anyhow::Result<RuntimePaths> {
    Ok(RuntimePaths::under(config_dir()?))
}

impl Config {
    /// Database path: configured value or the runtime default.
    pub fn database_path(&self, paths: &RuntimePaths) -> PathBuf {
        self.storage
            .database
            .clone()
            .unwrap_or_else(|| paths.database.clone())
    }
}
