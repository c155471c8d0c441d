//! Search request envelope and result models.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::query::QueryTree;
use crate::utils::IdentifierKind;

/// Page size the search service uses when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 10;

wire_enum! {
    /// Granularity of the identifiers a search returns.
    pub enum ReturnType ("return type") {
        /// `4HHB`
        Entry => "entry",
        /// `4HHB-1`
        Assembly => "assembly",
        /// `4HHB_1`
        PolymerEntity => "polymer_entity",
        /// `4HHB_3`
        NonPolymerEntity => "non_polymer_entity",
        /// `4HHB.A`
        PolymerInstance => "polymer_instance",
        /// Chemical component code, e.g. `NAG`
        MolDefinition => "mol_definition",
    }
}

impl ReturnType {
    /// Shape of the identifiers returned for this type
    pub fn identifier_kind(&self) -> IdentifierKind {
        match self {
            ReturnType::Entry => IdentifierKind::Entry,
            ReturnType::Assembly => IdentifierKind::Assembly,
            ReturnType::PolymerEntity | ReturnType::NonPolymerEntity => IdentifierKind::Entity,
            ReturnType::PolymerInstance => IdentifierKind::Instance,
            ReturnType::MolDefinition => IdentifierKind::ChemicalComponent,
        }
    }
}

wire_enum! {
    /// Which models a search covers.
    pub enum ContentType ("results content type") {
        Experimental => "experimental",
        /// Computed structure models (AlphaFold DB, ModelArchive)
        Computational => "computational",
    }
}

wire_enum! {
    /// How scores from different services are combined.
    pub enum ScoringStrategy ("scoring strategy") {
        Combined => "combined",
        Text => "text",
        Sequence => "sequence",
        SeqMotif => "seqmotif",
        Structure => "structure",
        Chemical => "chemical",
    }
}

/// Pagination, sorting and scoring options
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Index of the first hit to return (0-based)
    pub result_start_index: Option<u32>,

    /// Number of hits to return
    pub num_results: Option<u32>,

    /// Attribute to sort by, or `score`
    pub sort_by: Option<String>,

    /// Sort descending
    pub desc: bool,

    /// Keep per-hit relevance scores in the result
    pub return_with_scores: bool,

    /// Ask for every hit instead of one page
    pub return_all_hits: bool,

    /// Restrict to experimental and/or computed models
    pub results_content_type: Vec<ContentType>,

    pub scoring_strategy: ScoringStrategy,

    /// Only count hits
    pub return_counts: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            result_start_index: None,
            num_results: None,
            sort_by: Some("score".to_string()),
            desc: true,
            return_with_scores: false,
            return_all_hits: false,
            results_content_type: Vec::new(),
            scoring_strategy: ScoringStrategy::Combined,
            return_counts: false,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `rows` hits starting at `start`
    pub fn paginate(mut self, start: u32, rows: u32) -> Self {
        self.result_start_index = Some(start);
        self.num_results = Some(rows);
        self.return_all_hits = false;
        self
    }

    pub fn sort_by(mut self, attribute: impl Into<String>, desc: bool) -> Self {
        self.sort_by = Some(attribute.into());
        self.desc = desc;
        self
    }

    /// Leave ordering to the service
    pub fn unsorted(mut self) -> Self {
        self.sort_by = None;
        self
    }

    pub fn with_scores(mut self) -> Self {
        self.return_with_scores = true;
        self
    }

    pub fn all_hits(mut self) -> Self {
        self.return_all_hits = true;
        self
    }

    pub fn content_types(mut self, types: impl IntoIterator<Item = ContentType>) -> Self {
        self.results_content_type = types.into_iter().collect();
        self
    }

    pub fn scoring_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.scoring_strategy = strategy;
        self
    }

    pub fn counts_only(mut self) -> Self {
        self.return_counts = true;
        self
    }

    /// The `request_options` object
    pub fn to_json(&self) -> Value {
        let mut options = Map::new();

        if self.return_all_hits {
            options.insert("return_all_hits".to_string(), Value::Bool(true));
        } else {
            options.insert(
                "pager".to_string(),
                json!({
                    "start": self.result_start_index.unwrap_or(0),
                    "rows": self.num_results.unwrap_or(DEFAULT_PAGE_SIZE),
                }),
            );
        }

        if let Some(sort_by) = &self.sort_by {
            options.insert(
                "sort".to_string(),
                json!([{
                    "sort_by": sort_by,
                    "direction": if self.desc { "desc" } else { "asc" },
                }]),
            );
        }

        if !self.results_content_type.is_empty() {
            options.insert(
                "results_content_type".to_string(),
                json!(self.results_content_type),
            );
        }

        options.insert(
            "scoring_strategy".to_string(),
            json!(self.scoring_strategy),
        );

        Value::Object(options)
    }
}

/// A complete search request body
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: QueryTree,
    pub return_type: ReturnType,
    pub options: RequestOptions,
}

impl SearchRequest {
    /// Missing options fall back to [`RequestOptions::default`]: first page, sorted by score.
    pub fn new(
        query: impl Into<QueryTree>,
        return_type: ReturnType,
        options: Option<RequestOptions>,
    ) -> Self {
        Self {
            query: query.into(),
            return_type,
            options: options.unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "query": self.query.to_json(),
            "return_type": self.return_type,
            "request_options": self.options.to_json(),
            "return_counts": self.options.return_counts,
        })
    }
}

impl Serialize for SearchRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One identifier from a result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Parsed search response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches, which may exceed the hits on this page
    pub total_count: u64,

    /// Hits in the order the service ranked them
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct ResultEnvelope {
    #[serde(default)]
    total_count: u64,

    #[serde(default)]
    result_set: Vec<SearchHit>,
}

impl SearchResult {
    /// Result of a query that matched nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a response envelope, dropping scores unless `with_scores`
    pub fn from_envelope(body: &str, with_scores: bool) -> Result<Self, serde_json::Error> {
        let envelope: ResultEnvelope = serde_json::from_str(body)?;

        let hits = envelope
            .result_set
            .into_iter()
            .map(|hit| SearchHit {
                identifier: hit.identifier,
                score: if with_scores { hit.score } else { None },
            })
            .collect();

        Ok(Self {
            total_count: envelope.total_count,
            hits,
        })
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.identifier.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
