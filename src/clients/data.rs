//! RCSB Data API client (GraphQL and REST).

use serde_json::{json, Value};

use super::{check_status, join_url, ClientError, SearchClient};
use crate::config::{Config, Endpoints};
use crate::models::{DataQuery, DefaultOperator, RequestOptions, ReturnType, TableRow};
use crate::utils::{validate_entry_id, validate_identifier, validate_url, HttpClient, IdentifierKind};

/// Client for the GraphQL endpoint and the REST `core` API
#[derive(Debug, Clone)]
pub struct DataClient {
    http: HttpClient,
    graphql_endpoint: String,
    rest_endpoint: String,
}

impl DataClient {
    pub fn new() -> Self {
        let endpoints = Endpoints::default();
        Self {
            http: HttpClient::new(),
            graphql_endpoint: endpoints.graphql,
            rest_endpoint: endpoints.data,
        }
    }

    /// Client for custom GraphQL and REST roots
    pub fn with_endpoints(graphql: &str, rest: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::new(),
            graphql_endpoint: validate_url(graphql)?,
            rest_endpoint: validate_url(rest)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Ok(Self {
            http: HttpClient::from_settings(&config.http)?,
            graphql_endpoint: validate_url(&config.endpoints.graphql)?,
            rest_endpoint: validate_url(&config.endpoints.data)?,
        })
    }

    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Run a GraphQL query and return its `data` object unmodified.
    pub async fn fetch(&self, query: &DataQuery) -> Result<Value, ClientError> {
        let graphql = query.graphql_query()?;
        tracing::debug!("GraphQL query: {}", graphql);

        let response = self
            .http
            .client()
            .post(&self.graphql_endpoint)
            .json(&json!({ "query": graphql }))
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to query RCSB GraphQL: {}", e)))?;

        let response = check_status(response, "RCSB GraphQL").await?;

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse GraphQL response: {}", e)))?;

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages = errors
                    .iter()
                    .map(|e| match e.get("message").and_then(Value::as_str) {
                        Some(message) => message.to_string(),
                        None => e.to_string(),
                    })
                    .collect();
                return Err(ClientError::GraphQl(messages));
            }
        }

        let data = match body.get_mut("data").map(Value::take) {
            Some(Value::Null) | None => {
                return Err(ClientError::Parse(
                    "GraphQL response has no data object".to_string(),
                ))
            }
            Some(data) => data,
        };

        let returned = data
            .get(query.data_type().as_str())
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0);
        if returned < query.identifiers().len() {
            tracing::warn!(
                "GraphQL returned {} of {} requested {}",
                returned,
                query.identifiers().len(),
                query.data_type()
            );
        }

        Ok(data)
    }

    /// Run a GraphQL query and flatten the records into rows
    pub async fn fetch_table(&self, query: &DataQuery) -> Result<Vec<TableRow>, ClientError> {
        let data = self.fetch(query).await?;
        query.to_table(&data).ok_or_else(|| {
            ClientError::Parse(format!("GraphQL data has no '{}' list", query.data_type()))
        })
    }

    /// GET a REST resource below the `core` root, e.g. `entry/4HHB`
    pub async fn get_info(&self, path: &str) -> Result<Value, ClientError> {
        let url = join_url(&self.rest_endpoint, path);
        tracing::debug!("Fetching {}", url);

        let response = self
            .http
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let response = check_status(response, "RCSB data API").await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON: {}", e)))
    }

    /// Entry-level metadata
    pub async fn get_entry_info(&self, entry_id: &str) -> Result<Value, ClientError> {
        let entry_id = validate_entry_id(entry_id)?;
        self.get_info(&format!("entry/{}", urlencoding::encode(&entry_id)))
            .await
    }

    /// Titles of the papers citing the top `max_results` entries of a
    /// full-text search, in rank order without duplicates
    pub async fn find_papers(
        &self,
        search: &SearchClient,
        term: &str,
        max_results: u32,
    ) -> Result<Vec<String>, ClientError> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let hits = search
            .perform_search(
                DefaultOperator::new(term),
                ReturnType::Entry,
                Some(RequestOptions::new().paginate(0, max_results)),
            )
            .await?;

        let mut titles: Vec<String> = Vec::new();
        for entry_id in hits.identifiers() {
            let info = self.get_entry_info(entry_id).await?;
            let citations = info
                .get("citation")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            for title in citations
                .iter()
                .filter_map(|c| c.get("title").and_then(Value::as_str))
            {
                if !titles.iter().any(|t| t == title) {
                    titles.push(title.to_string());
                }
            }
        }

        tracing::debug!("{} distinct papers for '{}'", titles.len(), term);
        Ok(titles)
    }

    /// Chemical component definition, e.g. `NAG`
    pub async fn describe_chemical(&self, comp_id: &str) -> Result<Value, ClientError> {
        let comp_id = validate_identifier(comp_id, IdentifierKind::ChemicalComponent)?;
        self.get_info(&format!("chemcomp/{}", urlencoding::encode(&comp_id)))
            .await
    }
}

impl Default for DataClient {
    fn default() -> Self {
        Self::new()
    }
}
