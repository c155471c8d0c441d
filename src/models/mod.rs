//! Core data models for RCSB search queries, requests and results.

mod data;
mod fasta;
mod operators;
mod query;
mod search;
mod text_query;

pub use data::{DataQuery, DataType, TableRow};
pub use fasta::{parse_fasta, FastaSequence};
pub use operators::{
    AttributeValue, ChemicalOperator, ComparisonOperator, ComparisonType, ContainsPhraseOperator,
    ContainsWordsOperator, DefaultOperator, DescriptorMatchingCriterion, DescriptorType,
    ExactMatchOperator, ExistsOperator, FiniteFloat, InOperator, PatternType, RangeOperator,
    SearchOperator,
    SeqMotifOperator, SequenceOperator, SequenceOperatorBuilder, SequenceType,
    StructureOperator, StructureSearchMode,
};
pub use query::{LogicalOperator, QueryGroup, QueryNode, QueryTree, SearchService};
pub use search::{
    ContentType, RequestOptions, ReturnType, ScoringStrategy, SearchHit, SearchRequest,
    SearchResult, DEFAULT_PAGE_SIZE,
};
pub use text_query::{TextQuery, EXPERIMENTAL_METHODS};
