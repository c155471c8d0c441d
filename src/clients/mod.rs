//! HTTP clients for the RCSB services.
//!
//! Each client wraps a shared [`HttpClient`](crate::utils::HttpClient) and
//! one service endpoint:
//!
//! - [`SearchClient`]: search API (query trees to ranked identifiers)
//! - [`DataClient`]: GraphQL and REST data API
//! - [`FastaClient`]: FASTA sequences per entry
//! - [`FileClient`]: coordinate and structure factor files
//!
//! Every operation performs exactly one HTTP call, except the composite
//! helpers [`SearchClient::get_blast`] and [`DataClient::find_papers`],
//! which chain several. Failures are never retried; they surface as a
//! [`ClientError`] whose
//! [`category`](ClientError::category) tells local, transport and remote
//! failures apart.

mod data;
mod fasta;
mod files;
mod search;

pub use data::DataClient;
pub use fasta::FastaClient;
pub use files::{FileClient, PdbFileType};
pub use search::SearchClient;

use reqwest::{Response, StatusCode};

use crate::utils::ValidationError;

/// Errors that can occur when talking to an RCSB service
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid input, detected before any request was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connection, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status; `body` is the service's message verbatim
    #[error("Remote error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    /// HTTP 429; `body` is the service's message verbatim
    #[error("Rate limit exceeded: {body}")]
    RateLimit { body: String },

    /// The GraphQL response carried an `errors` array
    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error while decompressing a download
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where a failure originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally, nothing was sent
    Local,
    /// The request never got an HTTP response
    Transport,
    /// The service answered with an error or an unusable body
    Remote,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Validation(_) => ErrorCategory::Local,
            ClientError::Network(_) => ErrorCategory::Transport,
            ClientError::Remote { .. }
            | ClientError::RateLimit { .. }
            | ClientError::GraphQl(_)
            | ClientError::Parse(_)
            | ClientError::Io(_) => ErrorCategory::Remote,
        }
    }

    /// HTTP status of a remote error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            ClientError::RateLimit { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(format!("JSON: {}", err))
    }
}

/// Pass successful responses through; turn everything else into an error.
async fn check_status(response: Response, service: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    tracing::warn!("{} returned status: {}", service, status);

    let body = response
        .text()
        .await
        .map_err(|e| ClientError::Network(format!("Failed to read {} error body: {}", service, e)))?;

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::RateLimit { body });
    }

    Err(ClientError::Remote {
        status: status.as_u16(),
        body,
    })
}

/// Join a base URL and a relative path with exactly one slash.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let local = ClientError::from(ValidationError::EmptyGroup);
        assert_eq!(local.category(), ErrorCategory::Local);

        let transport = ClientError::Network("connection refused".to_string());
        assert_eq!(transport.category(), ErrorCategory::Transport);

        let remote = ClientError::Remote {
            status: 400,
            body: "bad attribute".to_string(),
        };
        assert_eq!(remote.category(), ErrorCategory::Remote);
        assert_eq!(remote.status(), Some(400));
        let limited = ClientError::RateLimit {
            body: "slow down".to_string(),
        };
        assert_eq!(limited.status(), Some(429));
        assert_eq!(limited.category(), ErrorCategory::Remote);
        assert_eq!(limited.to_string(), "Rate limit exceeded: slow down");
        assert_eq!(
            ClientError::GraphQl(vec!["a".into()]).category(),
            ErrorCategory::Remote
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ClientError::GraphQl(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "GraphQL error: first; second");

        let err = ClientError::from(ValidationError::EmptyProperties);
        assert_eq!(err.to_string(), "No properties selected for data query");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://data.rcsb.org/rest/v1/core/", "/entry/4HHB"),
            "https://data.rcsb.org/rest/v1/core/entry/4HHB"
        );
        assert_eq!(join_url("http://localhost:1234", "6TML"), "http://localhost:1234/6TML");
    }
}
