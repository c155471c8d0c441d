//! # RCSB Client
//!
//! An async client for the RCSB Protein Data Bank search, GraphQL, FASTA and
//! file download services.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Search operators, query trees, request/response envelopes,
//!   GraphQL data queries and FASTA records
//! - [`clients`]: One HTTP client per RCSB service and the [`ClientError`] taxonomy
//! - [`utils`]: Shared HTTP client and input validation
//! - [`config`]: Endpoint, transport and logging configuration
//!
//! ## Example
//!
//! ```no_run
//! use rcsb_client::models::{
//!     ComparisonOperator, ComparisonType, ExactMatchOperator, QueryGroup, ReturnType,
//!     SearchOperator,
//! };
//! use rcsb_client::SearchClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let organism = "rcsb_entity_source_organism.taxonomy_lineage.name";
//! let query = QueryGroup::and(vec![
//!     QueryGroup::or(vec![
//!         SearchOperator::from(ExactMatchOperator::new(organism, "Mus musculus")).into(),
//!         SearchOperator::from(ExactMatchOperator::new(organism, "Homo sapiens")).into(),
//!     ])?
//!     .into(),
//!     SearchOperator::from(ComparisonOperator::new(
//!         "rcsb_entry_info.resolution_combined",
//!         4,
//!         ComparisonType::Less,
//!     ))
//!     .into(),
//! ])?;
//!
//! let result = SearchClient::new()
//!     .perform_search_with_graph(query, ReturnType::Entry, None)
//!     .await?;
//! println!("{} matching entries", result.total_count);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod clients;
pub mod config;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use clients::{ClientError, DataClient, ErrorCategory, FastaClient, FileClient, SearchClient};
pub use models::{QueryGroup, QueryNode, QueryTree, SearchOperator, SearchRequest, SearchResult};
pub use utils::ValidationError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
