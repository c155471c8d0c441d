//! FASTA download client.

use super::{check_status, join_url, ClientError};
use crate::config::{Config, Endpoints};
use crate::models::{parse_fasta, FastaSequence};
use crate::utils::{validate_entry_id, validate_url, HttpClient};

#[derive(Debug, Clone)]
pub struct FastaClient {
    http: HttpClient,
    endpoint: String,
}

impl FastaClient {
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: Endpoints::default().fasta,
        }
    }

    pub fn with_endpoint(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(),
            endpoint: validate_url(endpoint)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::from_settings(&config.http)?,
            endpoint: validate_url(&config.endpoints.fasta)?,
        })
    }

    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// All polymer sequences of an entry, one per entity
    pub async fn get_fasta(&self, entry_id: &str) -> Result<Vec<FastaSequence>, ClientError> {
        let entry_id = validate_entry_id(entry_id)?;
        let url = join_url(&self.endpoint, &urlencoding::encode(&entry_id));
        tracing::debug!("Fetching FASTA for {}", entry_id);

        let response = self
            .http
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to fetch FASTA: {}", e)))?;

        let response = check_status(response, "RCSB FASTA").await?;

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read FASTA: {}", e)))?;

        Ok(parse_fasta(&text))
    }
}

impl Default for FastaClient {
    fn default() -> Self {
        Self::new()
    }
}
