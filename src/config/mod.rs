//! Configuration management.
//!
//! Every setting has a built-in default. Endpoints can be overridden through
//! `RCSB_*` environment variables or a configuration file loaded with
//! [`load_config`].

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Public RCSB search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://search.rcsb.org/rcsbsearch/v2/query";
/// Public RCSB GraphQL endpoint
pub const DEFAULT_GRAPHQL_URL: &str = "https://data.rcsb.org/graphql";
/// Root of the RCSB REST data API
pub const DEFAULT_DATA_URL: &str = "https://data.rcsb.org/rest/v1/core";
/// Root of the FASTA download service
pub const DEFAULT_FASTA_URL: &str = "https://www.rcsb.org/fasta/entry";
/// Root of the structure file download service
pub const DEFAULT_FILES_URL: &str = "https://files.rcsb.org/download";

/// Client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service endpoints
    #[serde(default)]
    pub endpoints: Endpoints,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Logging settings, consumed by applications installing a subscriber
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Service endpoint URLs
///
/// Defaults honour `RCSB_SEARCH_URL`, `RCSB_GRAPHQL_URL`, `RCSB_DATA_URL`,
/// `RCSB_FASTA_URL` and `RCSB_FILES_URL`. An override that is not an
/// http(s) URL is logged and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_search_url")]
    pub search: String,

    #[serde(default = "default_graphql_url")]
    pub graphql: String,

    #[serde(default = "default_data_url")]
    pub data: String,

    #[serde(default = "default_fasta_url")]
    pub fasta: String,

    #[serde(default = "default_files_url")]
    pub files: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search: default_search_url(),
            graphql: default_graphql_url(),
            data: default_data_url(),
            fasta: default_fasta_url(),
            files: default_files_url(),
        }
    }
}

/// Endpoint from `key`, or `default` when unset or not an http(s) URL
fn env_url(key: &str, default: &str) -> String {
    let Ok(value) = std::env::var(key) else {
        return default.to_string();
    };

    match crate::utils::validate_url(&value) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}; using {}", key, value, e, default);
            default.to_string()
        }
    }
}

fn default_search_url() -> String {
    env_url("RCSB_SEARCH_URL", DEFAULT_SEARCH_URL)
}

fn default_graphql_url() -> String {
    env_url("RCSB_GRAPHQL_URL", DEFAULT_GRAPHQL_URL)
}

fn default_data_url() -> String {
    env_url("RCSB_DATA_URL", DEFAULT_DATA_URL)
}

fn default_fasta_url() -> String {
    env_url("RCSB_FASTA_URL", DEFAULT_FASTA_URL)
}

fn default_files_url() -> String {
    env_url("RCSB_FILES_URL", DEFAULT_FILES_URL)
}

/// HTTP transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, layered under `RCSB_`-prefixed environment variables
///
/// Nested keys use a double underscore, e.g. `RCSB_ENDPOINTS__SEARCH`.
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("RCSB").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}
