//! RCSB search API client.

use reqwest::StatusCode;
use serde_json::Value;

use super::{check_status, ClientError, FastaClient};
use crate::config::{Config, Endpoints};
use crate::models::{
    QueryGroup, QueryTree, RequestOptions, ReturnType, SearchOperator, SearchRequest,
    SearchResult, SequenceOperator, TextQuery,
};
use crate::utils::{validate_url, HttpClient, ValidationError};

/// E-value cutoff of [`SearchClient::get_blast`], permissive so identity decides
pub const BLAST_EVALUE_CUTOFF: f64 = 1000.0;

/// Client for the search endpoint
///
/// ```no_run
/// use rcsb_client::clients::SearchClient;
/// use rcsb_client::models::{DefaultOperator, ReturnType};
///
/// # async fn run() -> Result<(), rcsb_client::clients::ClientError> {
/// let client = SearchClient::new();
/// let result = client
///     .perform_search(DefaultOperator::new("ribosome"), ReturnType::Entry, None)
///     .await?;
/// println!("{} entries, first page: {:?}", result.total_count, result.identifiers());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: HttpClient,
    endpoint: String,
}

impl SearchClient {
    /// Client for the default (or `RCSB_SEARCH_URL`) endpoint
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: Endpoints::default().search,
        }
    }

    /// Client for a custom endpoint
    pub fn with_endpoint(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(),
            endpoint: validate_url(endpoint)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::from_settings(&config.http)?,
            endpoint: validate_url(&config.endpoints.search)?,
        })
    }

    /// Reuse an existing HTTP client
    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the request; `None` when the service answers 204 (no hits).
    async fn send(&self, request: &SearchRequest) -> Result<Option<String>, ClientError> {
        let body = request.to_json();
        tracing::debug!("Search request: {}", body);

        let response = self
            .http
            .client()
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to query RCSB search: {}", e)))?;

        let response = check_status(response, "RCSB search").await?;

        if response.status() == StatusCode::NO_CONTENT {
            tracing::debug!("Search matched nothing");
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read search response: {}", e)))?;

        Ok(Some(text))
    }

    /// Execute a request and parse the ranked hits
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchResult, ClientError> {
        let Some(body) = self.send(request).await? else {
            return Ok(SearchResult::empty());
        };

        let result = SearchResult::from_envelope(&body, request.options.return_with_scores)?;
        tracing::debug!(
            "Search returned {} of {} hits",
            result.len(),
            result.total_count
        );
        Ok(result)
    }

    /// Execute a request and return the decoded envelope unmodified
    ///
    /// A 204 response yields `None`.
    pub async fn execute_raw(&self, request: &SearchRequest) -> Result<Option<Value>, ClientError> {
        match self.send(request).await? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    /// Search with a single operator on its default service
    pub async fn perform_search(
        &self,
        operator: impl Into<SearchOperator>,
        return_type: ReturnType,
        options: Option<RequestOptions>,
    ) -> Result<SearchResult, ClientError> {
        let tree = QueryTree::from(operator.into());
        self.perform_search_with_graph(tree, return_type, options)
            .await
    }

    /// Search with a full query tree
    pub async fn perform_search_with_graph(
        &self,
        query: impl Into<QueryTree>,
        return_type: ReturnType,
        options: Option<RequestOptions>,
    ) -> Result<SearchResult, ClientError> {
        let request = SearchRequest::new(query, return_type, options);
        self.execute(&request).await
    }

    /// Run a [`TextQuery`] shortcut
    ///
    /// Entry searches return every hit rather than the first page.
    pub async fn perform_text_search(
        &self,
        query: TextQuery,
        return_type: ReturnType,
    ) -> Result<SearchResult, ClientError> {
        let options = match return_type {
            ReturnType::Entry => Some(RequestOptions::new().all_hits()),
            _ => None,
        };
        self.perform_search(query, return_type, options).await
    }

    /// Entries with a polymer similar to chain `chain_id` of `entry_id`
    ///
    /// Fetches the entry's FASTA, then searches for any sequence whose
    /// chains include `chain_id` at the given identity cutoff.
    pub async fn get_blast(
        &self,
        fasta: &FastaClient,
        entry_id: &str,
        chain_id: &str,
        identity_cutoff: f64,
    ) -> Result<SearchResult, ClientError> {
        let sequences = fasta.get_fasta(entry_id).await?;

        let nodes = sequences
            .into_iter()
            .filter(|s| s.chains.iter().any(|c| c == chain_id))
            .map(|s| {
                SequenceOperator::builder(s.sequence)
                    .identity_cutoff(identity_cutoff)
                    .evalue_cutoff(BLAST_EVALUE_CUTOFF)
                    .build()
                    .map(|op| QueryTree::from(SearchOperator::from(op)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if nodes.is_empty() {
            return Err(ValidationError::InvalidParameter {
                name: "chain_id",
                reason: format!("{} has no polymer sequence for chain {}", entry_id, chain_id),
            }
            .into());
        }

        tracing::debug!(
            "Sequence search for {} chain {} with {} sequence(s)",
            entry_id,
            chain_id,
            nodes.len()
        );
        self.perform_search_with_graph(QueryGroup::or(nodes)?, ReturnType::Entry, None)
            .await
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}
