//! Query trees: terminal nodes and AND/OR groups.
//!
//! A [`QueryTree`] is either a single [`QueryNode`] or a [`QueryGroup`] of
//! nested trees. Serialization is a recursive fold that keeps children in
//! declaration order:
//!
//! ```rust
//! use rcsb_client::models::{ExactMatchOperator, QueryGroup, QueryTree, SearchOperator};
//!
//! let organism = "rcsb_entity_source_organism.taxonomy_lineage.name";
//! let tree: QueryTree = QueryGroup::or(vec![
//!     SearchOperator::from(ExactMatchOperator::new(organism, "Mus musculus")).into(),
//!     SearchOperator::from(ExactMatchOperator::new(organism, "Homo sapiens")).into(),
//! ])
//! .unwrap()
//! .into();
//!
//! let json = tree.to_json();
//! assert_eq!(json["logical_operator"], "or");
//! assert_eq!(json["nodes"][1]["parameters"]["value"], "Homo sapiens");
//! ```

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use super::operators::SearchOperator;
use crate::utils::ValidationError;

wire_enum! {
    /// Remote search backend that evaluates a terminal node.
    pub enum SearchService ("search service") {
        FullText => "full_text",
        Text => "text",
        /// Text search over chemical component attributes
        TextChem => "text_chem",
        Sequence => "sequence",
        SeqMotif => "seqmotif",
        Structure => "structure",
        Chemical => "chemical",
    }
}

impl SearchService {
    /// Whether this service can evaluate `operator`
    pub fn accepts(&self, operator: &SearchOperator) -> bool {
        match self {
            SearchService::Text | SearchService::TextChem => operator.attribute().is_some(),
            other => *other == operator.default_service(),
        }
    }
}

wire_enum! {
    /// How the results of a group's children are combined.
    pub enum LogicalOperator ("logical operator") {
        And => "and",
        Or => "or",
    }
}

/// A terminal node: one operator evaluated by one service.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    service: SearchService,
    operator: SearchOperator,
}

impl QueryNode {
    /// Node on the operator's default service
    pub fn new(operator: impl Into<SearchOperator>) -> Self {
        let operator = operator.into();
        Self {
            service: operator.default_service(),
            operator,
        }
    }

    /// Node on an explicit service, which must be able to run the operator
    pub fn with_service(
        service: SearchService,
        operator: impl Into<SearchOperator>,
    ) -> Result<Self, ValidationError> {
        let operator = operator.into();
        if !service.accepts(&operator) {
            return Err(ValidationError::IncompatibleService {
                service: service.as_str(),
                operator: operator.kind(),
            });
        }
        Ok(Self { service, operator })
    }

    pub fn service(&self) -> SearchService {
        self.service
    }

    pub fn operator(&self) -> &SearchOperator {
        &self.operator
    }

    pub fn to_json(&self) -> Value {
        json!({
            "type": "terminal",
            "service": self.service,
            "parameters": self.operator.parameters(),
        })
    }
}

/// A non-empty, ordered group of subtrees joined by one logical operator.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryGroup {
    logical_operator: LogicalOperator,
    nodes: Vec<QueryTree>,
}

impl QueryGroup {
    pub fn new(
        logical_operator: LogicalOperator,
        nodes: Vec<QueryTree>,
    ) -> Result<Self, ValidationError> {
        if nodes.is_empty() {
            return Err(ValidationError::EmptyGroup);
        }
        Ok(Self {
            logical_operator,
            nodes,
        })
    }

    pub fn and(nodes: Vec<QueryTree>) -> Result<Self, ValidationError> {
        Self::new(LogicalOperator::And, nodes)
    }

    pub fn or(nodes: Vec<QueryTree>) -> Result<Self, ValidationError> {
        Self::new(LogicalOperator::Or, nodes)
    }

    pub fn logical_operator(&self) -> LogicalOperator {
        self.logical_operator
    }

    pub fn nodes(&self) -> &[QueryTree] {
        &self.nodes
    }

    pub fn to_json(&self) -> Value {
        json!({
            "type": "group",
            "logical_operator": self.logical_operator,
            "nodes": self.nodes.iter().map(QueryTree::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Root of a search query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTree {
    Node(QueryNode),
    Group(QueryGroup),
}

impl QueryTree {
    pub fn to_json(&self) -> Value {
        match self {
            QueryTree::Node(node) => node.to_json(),
            QueryTree::Group(group) => group.to_json(),
        }
    }

    /// Nesting depth: 1 for a lone node
    pub fn depth(&self) -> usize {
        match self {
            QueryTree::Node(_) => 1,
            QueryTree::Group(group) => {
                1 + group.nodes.iter().map(QueryTree::depth).max().unwrap_or(0)
            }
        }
    }

    /// Number of terminal nodes
    pub fn node_count(&self) -> usize {
        match self {
            QueryTree::Node(_) => 1,
            QueryTree::Group(group) => group.nodes.iter().map(QueryTree::node_count).sum(),
        }
    }
}

impl Serialize for QueryTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<QueryNode> for QueryTree {
    fn from(node: QueryNode) -> Self {
        QueryTree::Node(node)
    }
}

impl From<QueryGroup> for QueryTree {
    fn from(group: QueryGroup) -> Self {
        QueryTree::Group(group)
    }
}

/// A lone operator becomes a terminal node on its default service.
impl From<SearchOperator> for QueryTree {
    fn from(operator: SearchOperator) -> Self {
        QueryTree::Node(QueryNode::new(operator))
    }
}
