//! Attribute-search shortcuts for common lookups.
//!
//! Each [`TextQuery`] maps to one operator on a fixed attribute of the text
//! service, e.g. every entry citing a PubMed article or every entity from
//! a taxonomy node.

use super::operators::{
    ContainsWordsOperator, ExactMatchOperator, InOperator, SearchOperator,
};

/// Experimental methods recorded in `exptl.method`
pub const EXPERIMENTAL_METHODS: &[&str] = &[
    "X-RAY DIFFRACTION",
    "ELECTRON MICROSCOPY",
    "SOLID-STATE NMR",
    "SOLUTION NMR",
    "NEUTRON DIFFRACTION",
    "ELECTRON CRYSTALLOGRAPHY",
    "POWDER DIFFRACTION",
    "FIBER DIFFRACTION",
    "SOLUTION SCATTERING",
    "EPR",
    "FLUORESCENCE TRANSFER",
    "INFRARED SPECTROSCOPY",
    "THEORETICAL MODEL",
];

pub const PUBMED_ID_ATTRIBUTE: &str = "rcsb_pubmed_container_identifiers.pubmed_id";
pub const TAXONOMY_ID_ATTRIBUTE: &str = "rcsb_entity_source_organism.taxonomy_lineage.id";
pub const EXPERIMENTAL_METHOD_ATTRIBUTE: &str = "exptl.method";
pub const AUTHOR_ATTRIBUTE: &str = "rcsb_primary_citation.rcsb_authors";
pub const ORGANISM_ATTRIBUTE: &str = "rcsb_entity_source_organism.taxonomy_lineage.name";
pub const PFAM_ATTRIBUTE: &str = "rcsb_polymer_entity_annotation.annotation_id";
pub const UNIPROT_ATTRIBUTE: &str =
    "rcsb_polymer_entity_container_identifiers.reference_sequence_identifiers.database_accession";

/// A single-attribute text search
///
/// ```rust
/// use rcsb_client::models::{SearchOperator, TextQuery};
///
/// let op = SearchOperator::from(TextQuery::ExperimentalMethod("solution nmr".into()));
/// assert_eq!(op.parameters()["value"], "SOLUTION NMR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextQuery {
    /// Entries citing a PubMed article
    PubmedId(u32),
    /// Entities from an NCBI taxonomy node or any of its descendants
    TaxonomyId(u32),
    /// Entries solved by a method; case-insensitive, see [`EXPERIMENTAL_METHODS`]
    ExperimentalMethod(String),
    /// Entries whose primary citation lists this author, e.g. `"Perutz, M.F."`
    Author(String),
    /// Entities whose source organism lineage contains any of these words
    Organism(String),
    /// Entities annotated with a Pfam accession, e.g. `PF00042`
    Pfam(String),
    /// Entities mapped to a UniProt accession, e.g. `P69905`
    Uniprot(String),
}

impl TextQuery {
    pub fn attribute(&self) -> &'static str {
        match self {
            TextQuery::PubmedId(_) => PUBMED_ID_ATTRIBUTE,
            TextQuery::TaxonomyId(_) => TAXONOMY_ID_ATTRIBUTE,
            TextQuery::ExperimentalMethod(_) => EXPERIMENTAL_METHOD_ATTRIBUTE,
            TextQuery::Author(_) => AUTHOR_ATTRIBUTE,
            TextQuery::Organism(_) => ORGANISM_ATTRIBUTE,
            TextQuery::Pfam(_) => PFAM_ATTRIBUTE,
            TextQuery::Uniprot(_) => UNIPROT_ATTRIBUTE,
        }
    }
}

/// Unknown experimental methods are sent anyway, with a warning.
impl From<TextQuery> for SearchOperator {
    fn from(query: TextQuery) -> Self {
        let attribute = query.attribute();
        match query {
            TextQuery::PubmedId(id) => InOperator::single(attribute, id).into(),
            TextQuery::TaxonomyId(id) => ExactMatchOperator::new(attribute, id.to_string()).into(),
            TextQuery::ExperimentalMethod(method) => {
                let method = method.trim().to_uppercase();
                if !EXPERIMENTAL_METHODS.contains(&method.as_str()) {
                    tracing::warn!(
                        "Experimental method '{}' not recognized, search may match nothing",
                        method
                    );
                }
                ExactMatchOperator::new(attribute, method).into()
            }
            TextQuery::Author(value) | TextQuery::Pfam(value) | TextQuery::Uniprot(value) => {
                ExactMatchOperator::new(attribute, value).into()
            }
            TextQuery::Organism(value) => ContainsWordsOperator::new(attribute, value).into(),
        }
    }
}
