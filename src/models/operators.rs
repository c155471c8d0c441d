//! Search operators: the leaf predicates of an RCSB search query.
//!
//! Each operator renders the `parameters` object of a terminal query node.
//! Operators that carry constraints (cutoffs, entry codes, non-empty value
//! sets) validate them when constructed, so an operator that exists can
//! always be serialized.
//!
//! See <https://search.rcsb.org/index.html#search-operators> and
//! <https://search.rcsb.org/search-attributes.html> for the attribute paths
//! each operator accepts.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::query::SearchService;
use crate::utils::{
    validate_entry_id, validate_evalue_cutoff, validate_identity_cutoff, ValidationError,
};

/// Scalar value compared against an attribute.
///
/// Floats go through [`FiniteFloat`]; build them with
/// `AttributeValue::try_from(3.5)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(FiniteFloat),
    Text(String),
}

/// An `f64` that is neither NaN nor infinite.
///
/// JSON has no encoding for non-finite numbers, so these are rejected
/// before they can reach a request body.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FiniteFloat(f64);

impl FiniteFloat {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidParameter {
                name: "value",
                reason: format!("{} is not a finite number", value),
            });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for FiniteFloat {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FiniteFloat> for f64 {
    fn from(value: FiniteFloat) -> Self {
        value.0
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value.into())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        AttributeValue::Integer(value.into())
    }
}

impl From<FiniteFloat> for AttributeValue {
    fn from(value: FiniteFloat) -> Self {
        AttributeValue::Float(value)
    }
}

impl TryFrom<f64> for AttributeValue {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        FiniteFloat::new(value).map(AttributeValue::Float)
    }
}

/// Dates are sent as `YYYY-MM-DD`.
impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        AttributeValue::Text(value.format("%Y-%m-%d").to_string())
    }
}

/// Timestamps are sent as RFC 3339 with a `Z` suffix, e.g. `2019-01-01T00:00:00Z`.
impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::Text(value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

wire_enum! {
    /// Comparison applied by a [`ComparisonOperator`].
    pub enum ComparisonType ("comparison type") {
        Greater => "greater",
        GreaterOrEqual => "greater_or_equal",
        Equal => "equals",
        /// Sent as `equals` with `negation: true`
        NotEqual => "not_equal",
        LessOrEqual => "less_or_equal",
        Less => "less",
    }
}

wire_enum! {
    /// Polymer type targeted by sequence and sequence-motif searches.
    pub enum SequenceType ("sequence type") {
        Dna => "pdb_dna_sequence",
        Rna => "pdb_rna_sequence",
        Protein => "pdb_protein_sequence",
    }
}

wire_enum! {
    /// 3D shape matching mode (BioZernike descriptors).
    pub enum StructureSearchMode ("structure search mode") {
        StrictShapeMatch => "strict_shape_match",
        RelaxedShapeMatch => "relaxed_shape_match",
    }
}

wire_enum! {
    /// What counts as a chemical match.
    pub enum DescriptorMatchingCriterion ("matching criterion") {
        GraphStrict => "graph-strict",
        GraphRelaxed => "graph-relaxed",
        GraphRelaxedStereo => "graph-relaxed-stereo",
        FingerprintSimilarity => "fingerprint-similarity",
    }
}

wire_enum! {
    /// Chemical descriptor notation.
    pub enum DescriptorType ("descriptor type") {
        Smiles => "SMILES",
        InChI => "InChI",
    }
}

wire_enum! {
    /// Syntax of a sequence motif pattern.
    pub enum PatternType ("pattern type") {
        Simple => "simple",
        Prosite => "prosite",
        Regex => "regex",
    }
}

/// Full-text search across all indexed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultOperator {
    pub value: String,
}

impl DefaultOperator {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Matches an attribute exactly, including whitespace, punctuation and case.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactMatchOperator {
    pub attribute: String,
    pub value: AttributeValue,
}

impl ExactMatchOperator {
    pub fn new(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Matches when the attribute equals any of several values.
#[derive(Debug, Clone, PartialEq)]
pub struct InOperator {
    attribute: String,
    values: Vec<AttributeValue>,
}

impl InOperator {
    /// Build from a non-empty value set. Duplicates collapse; first
    /// occurrences keep their order.
    pub fn new<I, V>(attribute: impl Into<String>, values: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        let mut unique: Vec<AttributeValue> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }

        if unique.is_empty() {
            return Err(ValidationError::InvalidParameter {
                name: "values",
                reason: "in operator needs at least one value".to_string(),
            });
        }

        Ok(Self {
            attribute: attribute.into(),
            values: unique,
        })
    }

    /// Set of exactly one value
    pub fn single(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }
}

/// Matches if any word of `value` occurs in the attribute.
///
/// Tokenization happens server-side; hyphens count as word separators, so
/// `"actin-binding protein"` matches "actin" OR "binding" OR "protein".
#[derive(Debug, Clone, PartialEq)]
pub struct ContainsWordsOperator {
    pub attribute: String,
    pub value: String,
}

impl ContainsWordsOperator {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Matches if all words of `value` occur in the attribute in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainsPhraseOperator {
    pub attribute: String,
    pub value: String,
}

impl ContainsPhraseOperator {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Compares an attribute against a number or a date string.
///
/// ```rust
/// use rcsb_client::models::{ComparisonOperator, ComparisonType};
///
/// let released_after = ComparisonOperator::new(
///     "rcsb_accession_info.initial_release_date",
///     "2019-01-01T00:00:00Z",
///     ComparisonType::Greater,
/// );
/// assert_eq!(released_after.comparison_type, ComparisonType::Greater);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOperator {
    pub attribute: String,
    pub value: AttributeValue,
    pub comparison_type: ComparisonType,
}

impl ComparisonOperator {
    pub fn new(
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
        comparison_type: ComparisonType,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
            comparison_type,
        }
    }
}

/// Matches attribute values between two bounds.
///
/// Bounds are inclusive unless changed. Their ordering is checked by the
/// server, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeOperator {
    pub attribute: String,
    pub from_value: AttributeValue,
    pub to_value: AttributeValue,
    pub include_lower: bool,
    pub include_upper: bool,
    pub negation: bool,
}

impl RangeOperator {
    pub fn new(
        attribute: impl Into<String>,
        from_value: impl Into<AttributeValue>,
        to_value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            from_value: from_value.into(),
            to_value: to_value.into(),
            include_lower: true,
            include_upper: true,
            negation: false,
        }
    }

    pub fn include_lower(mut self, include: bool) -> Self {
        self.include_lower = include;
        self
    }

    pub fn include_upper(mut self, include: bool) -> Self {
        self.include_upper = include;
        self
    }

    /// Match values outside the range instead
    pub fn negate(mut self) -> Self {
        self.negation = true;
        self
    }
}

/// Matches when the attribute has any value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsOperator {
    pub attribute: String,
}

impl ExistsOperator {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

/// Sequence similarity search (MMseqs2).
///
/// Built through [`SequenceOperator::builder`]; cutoffs are validated by
/// [`SequenceOperatorBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOperator {
    sequence: String,
    sequence_type: SequenceType,
    evalue_cutoff: f64,
    identity_cutoff: f64,
}

impl SequenceOperator {
    pub const DEFAULT_EVALUE_CUTOFF: f64 = 100.0;
    pub const DEFAULT_IDENTITY_CUTOFF: f64 = 0.95;

    /// Operator with default cutoffs and an inferred sequence type
    pub fn new(sequence: impl Into<String>) -> Result<Self, ValidationError> {
        Self::builder(sequence).build()
    }

    pub fn builder(sequence: impl Into<String>) -> SequenceOperatorBuilder {
        SequenceOperatorBuilder {
            sequence: sequence.into(),
            sequence_type: None,
            evalue_cutoff: Self::DEFAULT_EVALUE_CUTOFF,
            identity_cutoff: Self::DEFAULT_IDENTITY_CUTOFF,
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn sequence_type(&self) -> SequenceType {
        self.sequence_type
    }

    pub fn evalue_cutoff(&self) -> f64 {
        self.evalue_cutoff
    }

    pub fn identity_cutoff(&self) -> f64 {
        self.identity_cutoff
    }

    /// Guess the polymer type from the sequence alphabet.
    ///
    /// Best effort: only A/C/G/T with at least one T is DNA, only A/C/G/U
    /// with at least one U is RNA, and protein letters including one outside
    /// A/C/G/T/U are protein. A protein fragment written purely in A, C, G
    /// and T reads as DNA; pass an explicit type for such sequences.
    pub fn resolve_sequence_type(sequence: &str) -> Result<SequenceType, ValidationError> {
        const PROTEIN_LETTERS: &str = "ABCDEFGHIKLMNPQRSTVWXYZ";
        const NUCLEOTIDE_LETTERS: &str = "ACGTU";

        let upper = sequence.to_ascii_uppercase();
        let only = |alphabet: &str| !upper.is_empty() && upper.chars().all(|c| alphabet.contains(c));

        if only("ACGT") && upper.contains('T') {
            Ok(SequenceType::Dna)
        } else if only("ACGU") && upper.contains('U') {
            Ok(SequenceType::Rna)
        } else if only(PROTEIN_LETTERS) && upper.chars().any(|c| !NUCLEOTIDE_LETTERS.contains(c)) {
            Ok(SequenceType::Protein)
        } else {
            Err(ValidationError::AmbiguousSequence(sequence.to_string()))
        }
    }
}

/// Builder for [`SequenceOperator`]
#[derive(Debug, Clone)]
pub struct SequenceOperatorBuilder {
    sequence: String,
    sequence_type: Option<SequenceType>,
    evalue_cutoff: f64,
    identity_cutoff: f64,
}

impl SequenceOperatorBuilder {
    pub fn sequence_type(mut self, sequence_type: SequenceType) -> Self {
        self.sequence_type = Some(sequence_type);
        self
    }

    /// Maximum E-value of reported hits (must be > 0)
    pub fn evalue_cutoff(mut self, cutoff: f64) -> Self {
        self.evalue_cutoff = cutoff;
        self
    }

    /// Minimum sequence identity of reported hits, in `[0, 1]`
    pub fn identity_cutoff(mut self, cutoff: f64) -> Self {
        self.identity_cutoff = cutoff;
        self
    }

    pub fn build(self) -> Result<SequenceOperator, ValidationError> {
        let identity_cutoff = validate_identity_cutoff(self.identity_cutoff)?;
        let evalue_cutoff = validate_evalue_cutoff(self.evalue_cutoff)?;

        if self.sequence.trim().is_empty() {
            return Err(ValidationError::InvalidParameter {
                name: "sequence",
                reason: "sequence is empty".to_string(),
            });
        }

        let sequence_type = match self.sequence_type {
            Some(sequence_type) => sequence_type,
            None => SequenceOperator::resolve_sequence_type(&self.sequence)?,
        };

        Ok(SequenceOperator {
            sequence: self.sequence,
            sequence_type,
            evalue_cutoff,
            identity_cutoff,
        })
    }
}

/// 3D shape similarity search against an assembly of a PDB entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureOperator {
    pdb_entry_id: String,
    assembly_id: u32,
    search_mode: StructureSearchMode,
}

impl StructureOperator {
    /// Strict shape match against `pdb_entry_id` assembly `assembly_id` (1-based)
    pub fn new(pdb_entry_id: &str, assembly_id: u32) -> Result<Self, ValidationError> {
        let pdb_entry_id = validate_entry_id(pdb_entry_id)?;
        if assembly_id == 0 {
            return Err(ValidationError::InvalidParameter {
                name: "assembly_id",
                reason: "assembly ids start at 1".to_string(),
            });
        }

        Ok(Self {
            pdb_entry_id,
            assembly_id,
            search_mode: StructureSearchMode::StrictShapeMatch,
        })
    }

    pub fn search_mode(mut self, mode: StructureSearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    pub fn pdb_entry_id(&self) -> &str {
        &self.pdb_entry_id
    }

    pub fn assembly_id(&self) -> u32 {
        self.assembly_id
    }

    pub fn mode(&self) -> StructureSearchMode {
        self.search_mode
    }
}

/// Chemical similarity search from a SMILES or InChI descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalOperator {
    descriptor: String,
    descriptor_type: DescriptorType,
    matching_criterion: DescriptorMatchingCriterion,
}

impl ChemicalOperator {
    /// Descriptors starting with `InChI=` are InChI; anything else is SMILES.
    pub fn new(
        descriptor: impl Into<String>,
        matching_criterion: DescriptorMatchingCriterion,
    ) -> Result<Self, ValidationError> {
        let descriptor = descriptor.into();
        if descriptor.trim().is_empty() {
            return Err(ValidationError::InvalidParameter {
                name: "descriptor",
                reason: "descriptor is empty".to_string(),
            });
        }

        let descriptor_type = if descriptor.starts_with("InChI=") {
            DescriptorType::InChI
        } else {
            DescriptorType::Smiles
        };

        Ok(Self {
            descriptor,
            descriptor_type,
            matching_criterion,
        })
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn descriptor_type(&self) -> DescriptorType {
        self.descriptor_type
    }

    pub fn matching_criterion(&self) -> DescriptorMatchingCriterion {
        self.matching_criterion
    }
}

/// Sequence motif search.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqMotifOperator {
    pub pattern: String,
    pub sequence_type: SequenceType,
    pub pattern_type: PatternType,
}

impl SeqMotifOperator {
    pub fn new(
        pattern: impl Into<String>,
        sequence_type: SequenceType,
        pattern_type: PatternType,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            sequence_type,
            pattern_type,
        }
    }
}

/// Any search operator.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOperator {
    Default(DefaultOperator),
    ExactMatch(ExactMatchOperator),
    In(InOperator),
    ContainsWords(ContainsWordsOperator),
    ContainsPhrase(ContainsPhraseOperator),
    Comparison(ComparisonOperator),
    Range(RangeOperator),
    Exists(ExistsOperator),
    Sequence(SequenceOperator),
    Structure(StructureOperator),
    Chemical(ChemicalOperator),
    SeqMotif(SeqMotifOperator),
}

impl SearchOperator {
    /// Short name of the operator kind, used in error messages and logs
    pub fn kind(&self) -> &'static str {
        match self {
            SearchOperator::Default(_) => "default",
            SearchOperator::ExactMatch(_) => "exact_match",
            SearchOperator::In(_) => "in",
            SearchOperator::ContainsWords(_) => "contains_words",
            SearchOperator::ContainsPhrase(_) => "contains_phrase",
            SearchOperator::Comparison(_) => "comparison",
            SearchOperator::Range(_) => "range",
            SearchOperator::Exists(_) => "exists",
            SearchOperator::Sequence(_) => "sequence",
            SearchOperator::Structure(_) => "structure",
            SearchOperator::Chemical(_) => "chemical",
            SearchOperator::SeqMotif(_) => "seqmotif",
        }
    }

    /// Attribute path, for operators that target one
    pub fn attribute(&self) -> Option<&str> {
        match self {
            SearchOperator::ExactMatch(op) => Some(&op.attribute),
            SearchOperator::In(op) => Some(&op.attribute),
            SearchOperator::ContainsWords(op) => Some(&op.attribute),
            SearchOperator::ContainsPhrase(op) => Some(&op.attribute),
            SearchOperator::Comparison(op) => Some(&op.attribute),
            SearchOperator::Range(op) => Some(&op.attribute),
            SearchOperator::Exists(op) => Some(&op.attribute),
            SearchOperator::Default(_)
            | SearchOperator::Sequence(_)
            | SearchOperator::Structure(_)
            | SearchOperator::Chemical(_)
            | SearchOperator::SeqMotif(_) => None,
        }
    }

    /// Service that runs this operator when none is given explicitly
    pub fn default_service(&self) -> SearchService {
        match self {
            SearchOperator::Default(_) => SearchService::FullText,
            SearchOperator::ExactMatch(_)
            | SearchOperator::In(_)
            | SearchOperator::ContainsWords(_)
            | SearchOperator::ContainsPhrase(_)
            | SearchOperator::Comparison(_)
            | SearchOperator::Range(_)
            | SearchOperator::Exists(_) => SearchService::Text,
            SearchOperator::Sequence(_) => SearchService::Sequence,
            SearchOperator::Structure(_) => SearchService::Structure,
            SearchOperator::Chemical(_) => SearchService::Chemical,
            SearchOperator::SeqMotif(_) => SearchService::SeqMotif,
        }
    }

    /// The `parameters` object of a terminal node
    pub fn parameters(&self) -> Value {
        match self {
            SearchOperator::Default(op) => json!({ "value": op.value }),
            SearchOperator::ExactMatch(op) => json!({
                "attribute": op.attribute,
                "operator": "exact_match",
                "value": op.value,
            }),
            SearchOperator::In(op) => json!({
                "attribute": op.attribute,
                "operator": "in",
                "value": op.values,
            }),
            SearchOperator::ContainsWords(op) => json!({
                "attribute": op.attribute,
                "operator": "contains_words",
                "value": op.value,
            }),
            SearchOperator::ContainsPhrase(op) => json!({
                "attribute": op.attribute,
                "operator": "contains_phrase",
                "value": op.value,
            }),
            SearchOperator::Comparison(op) => match op.comparison_type {
                ComparisonType::NotEqual => json!({
                    "attribute": op.attribute,
                    "operator": ComparisonType::Equal,
                    "negation": true,
                    "value": op.value,
                }),
                comparison_type => json!({
                    "attribute": op.attribute,
                    "operator": comparison_type,
                    "value": op.value,
                }),
            },
            SearchOperator::Range(op) => json!({
                "attribute": op.attribute,
                "operator": "range",
                "negation": op.negation,
                "value": {
                    "from": op.from_value,
                    "to": op.to_value,
                    "include_lower": op.include_lower,
                    "include_upper": op.include_upper,
                },
            }),
            SearchOperator::Exists(op) => json!({
                "attribute": op.attribute,
                "operator": "exists",
            }),
            SearchOperator::Sequence(op) => json!({
                "evalue_cutoff": op.evalue_cutoff,
                "identity_cutoff": op.identity_cutoff,
                "target": op.sequence_type,
                "value": op.sequence,
            }),
            SearchOperator::Structure(op) => json!({
                "value": {
                    "entry_id": op.pdb_entry_id,
                    "assembly_id": op.assembly_id.to_string(),
                },
                "operator": op.search_mode,
            }),
            SearchOperator::Chemical(op) => json!({
                "value": op.descriptor,
                "type": "descriptor",
                "descriptor_type": op.descriptor_type,
                "match_type": op.matching_criterion,
            }),
            SearchOperator::SeqMotif(op) => json!({
                "value": op.pattern,
                "pattern_type": op.pattern_type,
                "target": op.sequence_type,
            }),
        }
    }
}

impl From<DefaultOperator> for SearchOperator {
    fn from(op: DefaultOperator) -> Self {
        SearchOperator::Default(op)
    }
}

impl From<ExactMatchOperator> for SearchOperator {
    fn from(op: ExactMatchOperator) -> Self {
        SearchOperator::ExactMatch(op)
    }
}

impl From<InOperator> for SearchOperator {
    fn from(op: InOperator) -> Self {
        SearchOperator::In(op)
    }
}

impl From<ContainsWordsOperator> for SearchOperator {
    fn from(op: ContainsWordsOperator) -> Self {
        SearchOperator::ContainsWords(op)
    }
}

impl From<ContainsPhraseOperator> for SearchOperator {
    fn from(op: ContainsPhraseOperator) -> Self {
        SearchOperator::ContainsPhrase(op)
    }
}

impl From<ComparisonOperator> for SearchOperator {
    fn from(op: ComparisonOperator) -> Self {
        SearchOperator::Comparison(op)
    }
}

impl From<RangeOperator> for SearchOperator {
    fn from(op: RangeOperator) -> Self {
        SearchOperator::Range(op)
    }
}

impl From<ExistsOperator> for SearchOperator {
    fn from(op: ExistsOperator) -> Self {
        SearchOperator::Exists(op)
    }
}

impl From<SequenceOperator> for SearchOperator {
    fn from(op: SequenceOperator) -> Self {
        SearchOperator::Sequence(op)
    }
}

impl From<StructureOperator> for SearchOperator {
    fn from(op: StructureOperator) -> Self {
        SearchOperator::Structure(op)
    }
}

impl From<ChemicalOperator> for SearchOperator {
    fn from(op: ChemicalOperator) -> Self {
        SearchOperator::Chemical(op)
    }
}

impl From<SeqMotifOperator> for SearchOperator {
    fn from(op: SeqMotifOperator) -> Self {
        SearchOperator::SeqMotif(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ORGANISM: &str = "rcsb_entity_source_organism.taxonomy_lineage.name";

    #[test]
    fn test_default_operator_parameters() {
        let op = SearchOperator::from(DefaultOperator::new("ribosome"));
        assert_eq!(op.parameters(), json!({ "value": "ribosome" }));
        assert_eq!(op.attribute(), None);
        assert_eq!(op.default_service(), SearchService::FullText);
    }

    #[test]
    fn test_exact_match_parameters() {
        let op = SearchOperator::from(ExactMatchOperator::new(ORGANISM, "Mus musculus"));
        let params = op.parameters();
        assert_eq!(params["attribute"], ORGANISM);
        assert_eq!(params["operator"], "exact_match");
        assert_eq!(params["value"], "Mus musculus");
        assert_eq!(op.default_service(), SearchService::Text);
    }

    #[test]
    fn test_in_operator_collapses_duplicates_in_order() {
        let op = InOperator::new(
            "exptl.method",
            ["X-RAY DIFFRACTION", "ELECTRON MICROSCOPY", "X-RAY DIFFRACTION"],
        )
        .unwrap();
        assert_eq!(op.values().len(), 2);

        let params = SearchOperator::from(op).parameters();
        assert_eq!(params["operator"], "in");
        assert_eq!(
            params["value"],
            json!(["X-RAY DIFFRACTION", "ELECTRON MICROSCOPY"])
        );
    }

    #[test]
    fn test_in_operator_rejects_empty_values() {
        let values: Vec<&str> = Vec::new();
        assert!(InOperator::new("exptl.method", values).is_err());
    }

    #[test]
    fn test_contains_operators_pass_value_through() {
        let words = SearchOperator::from(ContainsWordsOperator::new(
            "struct.title",
            "actin-binding protein",
        ));
        let phrase = SearchOperator::from(ContainsPhraseOperator::new(
            "struct.title",
            "actin-binding protein",
        ));

        assert_eq!(words.parameters()["operator"], "contains_words");
        assert_eq!(words.parameters()["value"], "actin-binding protein");
        assert_eq!(phrase.parameters()["operator"], "contains_phrase");
        assert_eq!(phrase.parameters()["value"], "actin-binding protein");
    }

    #[test]
    fn test_comparison_parameters() {
        let op = SearchOperator::from(ComparisonOperator::new(
            "rcsb_entry_info.resolution_combined",
            4,
            ComparisonType::Less,
        ));
        let params = op.parameters();
        assert_eq!(params["operator"], "less");
        assert_eq!(params["value"], 4);
        assert!(params.get("negation").is_none());
    }

    #[test]
    fn test_not_equal_uses_negated_equals() {
        let op = SearchOperator::from(ComparisonOperator::new(
            "rcsb_entry_info.polymer_entity_count",
            1,
            ComparisonType::NotEqual,
        ));
        let params = op.parameters();
        assert_eq!(params["operator"], "equals");
        assert_eq!(params["negation"], true);
    }

    #[test]
    fn test_comparison_with_timestamp() {
        let released = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let op = ComparisonOperator::new(
            "rcsb_accession_info.initial_release_date",
            released,
            ComparisonType::Greater,
        );
        assert_eq!(op.value, AttributeValue::from("2019-01-01T00:00:00Z"));
    }

    #[test]
    fn test_range_parameters() {
        let op = RangeOperator::new(
            "rcsb_accession_info.initial_release_date",
            "2019-01-01",
            "2020-01-01",
        )
        .include_lower(true)
        .include_upper(false);

        let params = SearchOperator::from(op).parameters();
        assert_eq!(params["operator"], "range");
        assert_eq!(params["negation"], false);
        assert_eq!(params["value"]["from"], "2019-01-01");
        assert_eq!(params["value"]["to"], "2020-01-01");
        assert_eq!(params["value"]["include_lower"], true);
        assert_eq!(params["value"]["include_upper"], false);
    }

    #[test]
    fn test_range_bounds_not_checked_locally() {
        let op = RangeOperator::new(
            "rcsb_entry_info.resolution_combined",
            AttributeValue::try_from(5.0).unwrap(),
            AttributeValue::try_from(1.0).unwrap(),
        )
        .negate();
        let params = SearchOperator::from(op).parameters();
        assert_eq!(params["value"]["from"], 5.0);
        assert_eq!(params["value"]["to"], 1.0);
        assert_eq!(params["negation"], true);
    }

    #[test]
    fn test_negate_is_idempotent() {
        let op = RangeOperator::new("rcsb_entry_info.resolution_combined", 1, 3)
            .negate()
            .negate();
        assert!(op.negation);
        assert_eq!(SearchOperator::from(op).parameters()["negation"], true);
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                AttributeValue::try_from(value),
                Err(ValidationError::InvalidParameter { name: "value", .. })
            ));
        }

        let resolution = AttributeValue::try_from(2.5).unwrap();
        let op = ComparisonOperator::new(
            "rcsb_entry_info.resolution_combined",
            resolution,
            ComparisonType::LessOrEqual,
        );
        assert_eq!(SearchOperator::from(op).parameters()["value"], 2.5);

        let decoded: AttributeValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(decoded, AttributeValue::Float(FiniteFloat::new(1.5).unwrap()));
    }

    #[test]
    fn test_range_from_dates() {
        let from = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let op = RangeOperator::new("rcsb_accession_info.initial_release_date", from, to);
        assert_eq!(op.from_value, AttributeValue::from("2019-01-01"));
        assert_eq!(op.to_value, AttributeValue::from("2020-01-01"));
    }

    #[test]
    fn test_exists_parameters() {
        let op = SearchOperator::from(ExistsOperator::new("rcsb_primary_citation.pdbx_database_id_DOI"));
        assert_eq!(
            op.parameters(),
            json!({
                "attribute": "rcsb_primary_citation.pdbx_database_id_DOI",
                "operator": "exists",
            })
        );
    }

    #[test]
    fn test_sequence_identity_cutoff_validation() {
        let seq = "MTEYKLVVVGAGGVGKSALTIQLIQNHFVDEYDPTIEDSY";
        assert!(matches!(
            SequenceOperator::builder(seq).identity_cutoff(1.5).build(),
            Err(ValidationError::InvalidParameter { name: "identity_cutoff", .. })
        ));
        let op = SequenceOperator::builder(seq)
            .identity_cutoff(0.99)
            .build()
            .unwrap();
        assert_eq!(op.identity_cutoff(), 0.99);
    }

    #[test]
    fn test_sequence_evalue_cutoff_validation() {
        for cutoff in [0.0, f64::INFINITY, f64::NAN] {
            let result = SequenceOperator::builder("MTEYKLVVV")
                .evalue_cutoff(cutoff)
                .build();
            assert!(matches!(
                result,
                Err(ValidationError::InvalidParameter { name: "evalue_cutoff", .. })
            ));
        }
    }

    #[test]
    fn test_sequence_parameters() {
        let op = SequenceOperator::builder("MTEYKLVVVGAGGVGKSALTIQLIQ")
            .evalue_cutoff(1.0)
            .identity_cutoff(0.9)
            .build()
            .unwrap();
        let params = SearchOperator::from(op).parameters();
        assert_eq!(params["evalue_cutoff"], 1.0);
        assert_eq!(params["identity_cutoff"], 0.9);
        assert_eq!(params["target"], "pdb_protein_sequence");
        assert_eq!(params["value"], "MTEYKLVVVGAGGVGKSALTIQLIQ");
    }

    #[test]
    fn test_sequence_type_resolution() {
        assert_eq!(
            SequenceOperator::resolve_sequence_type("ATGCGTA").unwrap(),
            SequenceType::Dna
        );
        assert_eq!(
            SequenceOperator::resolve_sequence_type("AUGCGUA").unwrap(),
            SequenceType::Rna
        );
        assert_eq!(
            SequenceOperator::resolve_sequence_type("MTEYKLVVV").unwrap(),
            SequenceType::Protein
        );
        assert_eq!(
            SequenceOperator::resolve_sequence_type("mteyk").unwrap(),
            SequenceType::Protein
        );
    }

    #[test]
    fn test_sequence_type_ambiguous() {
        // No T or U, and nothing outside the nucleotide letters.
        assert!(matches!(
            SequenceOperator::resolve_sequence_type("ACGACG"),
            Err(ValidationError::AmbiguousSequence(_))
        ));
        // Both T and U.
        assert!(SequenceOperator::resolve_sequence_type("ACGTU").is_err());
        // Not an amino-acid letter.
        assert!(SequenceOperator::resolve_sequence_type("MTE1K").is_err());
    }

    #[test]
    fn test_explicit_sequence_type_skips_resolution() {
        let op = SequenceOperator::builder("ACGACG")
            .sequence_type(SequenceType::Protein)
            .build()
            .unwrap();
        assert_eq!(op.sequence_type(), SequenceType::Protein);
    }

    #[test]
    fn test_structure_parameters() {
        let op = StructureOperator::new("4HHB", 1)
            .unwrap()
            .search_mode(StructureSearchMode::RelaxedShapeMatch);
        let params = SearchOperator::from(op).parameters();
        assert_eq!(params["value"]["entry_id"], "4HHB");
        assert_eq!(params["value"]["assembly_id"], "1");
        assert_eq!(params["operator"], "relaxed_shape_match");
    }

    #[test]
    fn test_structure_validation() {
        assert!(StructureOperator::new("4HH", 1).is_err());
        assert!(StructureOperator::new("4HHB", 0).is_err());
        assert_eq!(
            StructureOperator::new("4HHB", 2).unwrap().mode(),
            StructureSearchMode::StrictShapeMatch
        );
    }

    #[test]
    fn test_chemical_descriptor_type() {
        let smiles = ChemicalOperator::new("CC(=O)O", DescriptorMatchingCriterion::GraphStrict)
            .unwrap();
        assert_eq!(smiles.descriptor_type(), DescriptorType::Smiles);

        let inchi = ChemicalOperator::new(
            "InChI=1S/C2H4O2/c1-2(3)4/h1H3,(H,3,4)",
            DescriptorMatchingCriterion::FingerprintSimilarity,
        )
        .unwrap();
        let params = SearchOperator::from(inchi).parameters();
        assert_eq!(params["type"], "descriptor");
        assert_eq!(params["descriptor_type"], "InChI");
        assert_eq!(params["match_type"], "fingerprint-similarity");
    }

    #[test]
    fn test_seqmotif_parameters() {
        let op = SeqMotifOperator::new("C-x(2,4)-C", SequenceType::Protein, PatternType::Prosite);
        let params = SearchOperator::from(op).parameters();
        assert_eq!(params["value"], "C-x(2,4)-C");
        assert_eq!(params["pattern_type"], "prosite");
        assert_eq!(params["target"], "pdb_protein_sequence");
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        assert!("greater".parse::<ComparisonType>().is_ok());
        assert!(matches!(
            "bigger".parse::<ComparisonType>(),
            Err(ValidationError::UnknownVariant { kind: "comparison type", .. })
        ));
        assert!("loose_shape_match".parse::<StructureSearchMode>().is_err());
        assert!("pdb_protein".parse::<SequenceType>().is_err());
        assert!("glob".parse::<PatternType>().is_err());
        assert!("graph-loose".parse::<DescriptorMatchingCriterion>().is_err());
    }

    #[test]
    fn test_wire_names_round_trip_through_from_str() {
        for mode in StructureSearchMode::ALL {
            assert_eq!(mode.as_str().parse::<StructureSearchMode>().unwrap(), *mode);
        }
        for comparison in ComparisonType::ALL {
            assert_eq!(comparison.to_string().parse::<ComparisonType>().unwrap(), *comparison);
        }
    }
}
