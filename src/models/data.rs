//! GraphQL data queries against the RCSB Data API.
//!
//! A [`DataQuery`] selects properties for a list of identifiers of one
//! [`DataType`] and renders the GraphQL query string. Responses can be
//! flattened into one [`TableRow`] per record.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::search::ReturnType;
use crate::utils::{validate_identifier, IdentifierKind, ValidationError};

wire_enum! {
    /// Top-level collection of the Data API.
    pub enum DataType ("data type") {
        Entry => "entries",
        PolymerEntity => "polymer_entities",
        BranchedEntity => "branched_entities",
        NonpolymerEntity => "nonpolymer_entities",
        PolymerEntityInstance => "polymer_entity_instances",
        BranchedEntityInstance => "branched_entity_instances",
        NonpolymerEntityInstance => "nonpolymer_entity_instances",
        Assembly => "assemblies",
        ChemicalComponent => "chem_comps",
    }
}

impl DataType {
    /// Name of the identifier-list argument of this collection
    pub fn id_argument(&self) -> &'static str {
        match self {
            DataType::Entry => "entry_ids",
            DataType::PolymerEntity | DataType::BranchedEntity | DataType::NonpolymerEntity => {
                "entity_ids"
            }
            DataType::PolymerEntityInstance
            | DataType::BranchedEntityInstance
            | DataType::NonpolymerEntityInstance => "instance_ids",
            DataType::Assembly => "assembly_ids",
            DataType::ChemicalComponent => "comp_ids",
        }
    }

    pub fn identifier_kind(&self) -> IdentifierKind {
        match self {
            DataType::Entry => IdentifierKind::Entry,
            DataType::PolymerEntity | DataType::BranchedEntity | DataType::NonpolymerEntity => {
                IdentifierKind::Entity
            }
            DataType::PolymerEntityInstance
            | DataType::BranchedEntityInstance
            | DataType::NonpolymerEntityInstance => IdentifierKind::Instance,
            DataType::Assembly => IdentifierKind::Assembly,
            DataType::ChemicalComponent => IdentifierKind::ChemicalComponent,
        }
    }
}

/// Collection holding the identifiers a search returns.
impl From<ReturnType> for DataType {
    fn from(return_type: ReturnType) -> Self {
        match return_type {
            ReturnType::Entry => DataType::Entry,
            ReturnType::Assembly => DataType::Assembly,
            ReturnType::PolymerEntity => DataType::PolymerEntity,
            ReturnType::NonPolymerEntity => DataType::NonpolymerEntity,
            ReturnType::PolymerInstance => DataType::PolymerEntityInstance,
            ReturnType::MolDefinition => DataType::ChemicalComponent,
        }
    }
}

fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// One node of a GraphQL selection set, children in insertion order
#[derive(Debug, Default)]
struct Selection {
    name: String,
    children: Vec<Selection>,
}

impl Selection {
    /// Add a dotted path below this node, reusing existing prefixes.
    fn insert(&mut self, path: &str) -> Result<(), ValidationError> {
        let mut node = self;
        for segment in path.split('.') {
            if !is_graphql_name(segment) {
                return Err(ValidationError::InvalidParameter {
                    name: "property",
                    reason: format!("'{}' is not a GraphQL field path", path),
                });
            }
            let index = match node.children.iter().position(|c| c.name == segment) {
                Some(index) => index,
                None => {
                    node.children.push(Selection {
                        name: segment.to_string(),
                        children: Vec::new(),
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
        Ok(())
    }

    fn render_children(&self) -> String {
        self.children
            .iter()
            .map(Selection::render)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn render(&self) -> String {
        if self.children.is_empty() {
            self.name.clone()
        } else {
            format!("{}{{{}}}", self.name, self.render_children())
        }
    }
}

/// Write `value` under `key`, descending into objects and first list elements.
fn flatten_into(key: String, value: &Value, columns: &mut BTreeMap<String, Value>) {
    match value {
        Value::Array(items) => {
            if let Some(first) = items.first() {
                flatten_into(key, first, columns);
            }
        }
        Value::Object(fields) => {
            for (field, v) in fields {
                flatten_into(format!("{}.{}", key, field), v, columns);
            }
        }
        scalar => {
            columns.insert(key, scalar.clone());
        }
    }
}

/// Property selection for a batch of identifiers
///
/// ```rust
/// use rcsb_client::models::{DataQuery, DataType};
///
/// let query = DataQuery::new(["4HHB", "1STP"], DataType::Entry)
///     .unwrap()
///     .add_property("exptl", ["method"])
///     .add_property("cell", ["volume", "angle_beta"]);
///
/// assert_eq!(
///     query.graphql_query().unwrap(),
///     r#"{entries(entry_ids: ["4HHB","1STP"]){exptl{method},cell{volume,angle_beta}}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataQuery {
    identifiers: Vec<String>,
    data_type: DataType,
    properties: Vec<(String, Vec<String>)>,
}

impl DataQuery {
    /// Every identifier must have the shape `data_type` expects.
    pub fn new<I, S>(identifiers: I, data_type: DataType) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifiers = identifiers
            .into_iter()
            .map(|id| validate_identifier(id.as_ref(), data_type.identifier_kind()))
            .collect::<Result<Vec<_>, _>>()?;

        if identifiers.is_empty() {
            return Err(ValidationError::InvalidParameter {
                name: "identifiers",
                reason: "at least one identifier is required".to_string(),
            });
        }

        Ok(Self {
            identifiers,
            data_type,
            properties: Vec::new(),
        })
    }

    /// Select `field` with the given subfields (none for a scalar field).
    ///
    /// Both may be dotted paths such as `rcsb_entry_info.diffrn_resolution_high`;
    /// they render as nested selections. Selecting a field twice merges its
    /// subfields without duplicates.
    pub fn add_property<I, S>(mut self, field: impl Into<String>, subfields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        let index = match self.properties.iter().position(|(name, _)| *name == field) {
            Some(index) => index,
            None => {
                self.properties.push((field, Vec::new()));
                self.properties.len() - 1
            }
        };

        let selected = &mut self.properties[index].1;
        for subfield in subfields.into_iter().map(Into::into) {
            if !selected.contains(&subfield) {
                selected.push(subfield);
            }
        }
        self
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn properties(&self) -> &[(String, Vec<String>)] {
        &self.properties
    }

    /// Render the GraphQL query string
    pub fn graphql_query(&self) -> Result<String, ValidationError> {
        if self.properties.is_empty() {
            return Err(ValidationError::EmptyProperties);
        }

        let mut root = Selection::default();
        for (field, subfields) in &self.properties {
            root.insert(field)?;
            for subfield in subfields {
                root.insert(&format!("{}.{}", field, subfield))?;
            }
        }

        let ids = self
            .identifiers
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(",");

        Ok(format!(
            "{{{}({}: [{}]){{{}}}}}",
            self.data_type,
            self.data_type.id_argument(),
            ids,
            root.render_children()
        ))
    }

    /// Flatten the `data` object of a response into one row per record.
    ///
    /// Columns are dotted paths to each scalar, e.g. `field` or
    /// `field.subfield.leaf`; a list contributes its first element. Rows are keyed by the
    /// record's `rcsb_id` when selected, otherwise by position. Returns
    /// `None` when `data` has no list for this query's collection.
    pub fn to_table(&self, data: &Value) -> Option<Vec<TableRow>> {
        let records = data.get(self.data_type.as_str())?.as_array()?;

        let rows = records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                let record = record.as_object()?;
                let identifier = record
                    .get("rcsb_id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| self.identifiers.get(i).cloned())?;

                let mut columns = BTreeMap::new();
                for (key, value) in record {
                    flatten_into(key.clone(), value, &mut columns);
                }

                Some(TableRow {
                    identifier,
                    columns,
                })
            })
            .collect();

        Some(rows)
    }
}

/// One flattened record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub identifier: String,
    pub columns: BTreeMap<String, Value>,
}

impl TableRow {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }
}
