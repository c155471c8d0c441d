//! TOML configuration file support.
//!
//! # Configuration File Format
//!
//! ```toml
//! [endpoints]
//! search = "https://search.rcsb.org/rcsbsearch/v2/query"
//! graphql = "https://data.rcsb.org/graphql"
//! data = "https://data.rcsb.org/rest/v1/core"
//! fasta = "https://www.rcsb.org/fasta/entry"
//! files = "https://files.rcsb.org/download"
//!
//! [http]
//! user_agent = "my-pipeline/1.0"
//! timeout_secs = 60
//! connect_timeout_secs = 10
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};

use super::Config;
use crate::utils::validate_url;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "RCSB_CONFIG";

/// Configuration file wrapper with plain TOML load/save (no environment layering)
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub config: Config,
}

impl ConfigFile {
    /// Load configuration from a TOML file, validating every endpoint URL
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;

        let endpoints = &config.endpoints;
        for url in [
            &endpoints.search,
            &endpoints.graphql,
            &endpoints.data,
            &endpoints.fasta,
            &endpoints.files,
        ] {
            validate_url(url).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        }

        Ok(Self { config })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Path named by `RCSB_CONFIG`, if it points at an existing file
    pub fn find() -> Option<PathBuf> {
        std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .filter(|p| p.is_file())
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
