//! Input validation for identifiers, cutoffs and endpoint URLs.
//!
//! Everything here runs before a request is built, so a [`ValidationError`]
//! never involves the network.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown {kind} value: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid {kind} identifier: '{id}'")]
    InvalidIdentifier { kind: &'static str, id: String },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Cannot resolve sequence type for '{0}'")]
    AmbiguousSequence(String),

    #[error("Service '{service}' cannot run a {operator} operator")]
    IncompatibleService {
        service: &'static str,
        operator: &'static str,
    },

    #[error("Query group must contain at least one node")]
    EmptyGroup,

    #[error("No properties selected for data query")]
    EmptyProperties,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Shape of an RCSB identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// `4HHB`
    Entry,
    /// `4HHB-1`
    Assembly,
    /// `4HHB_1`
    Entity,
    /// `4HHB.A`
    Instance,
    /// `NAG`, `HEM`
    ChemicalComponent,
}

impl IdentifierKind {
    fn name(&self) -> &'static str {
        match self {
            IdentifierKind::Entry => "entry",
            IdentifierKind::Assembly => "assembly",
            IdentifierKind::Entity => "entity",
            IdentifierKind::Instance => "instance",
            IdentifierKind::ChemicalComponent => "chemical component",
        }
    }
}

fn is_entry_code(code: &str) -> bool {
    code.len() == 4 && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validate a 4-character PDB entry code, returning it trimmed.
pub fn validate_entry_id(id: &str) -> Result<String, ValidationError> {
    validate_identifier(id, IdentifierKind::Entry)
}

/// Validate an identifier against the shape expected for `kind`.
///
/// Composite identifiers must join a valid entry code and a non-empty
/// alphanumeric suffix with the kind's separator.
pub fn validate_identifier(id: &str, kind: IdentifierKind) -> Result<String, ValidationError> {
    let id = id.trim();
    let invalid = || ValidationError::InvalidIdentifier {
        kind: kind.name(),
        id: id.to_string(),
    };

    let separator = match kind {
        IdentifierKind::Entry => {
            return if is_entry_code(id) {
                Ok(id.to_string())
            } else {
                Err(invalid())
            };
        }
        IdentifierKind::ChemicalComponent => {
            let valid = (1..=5).contains(&id.len())
                && id.chars().all(|c| c.is_ascii_alphanumeric());
            return if valid { Ok(id.to_string()) } else { Err(invalid()) };
        }
        IdentifierKind::Assembly => '-',
        IdentifierKind::Entity => '_',
        IdentifierKind::Instance => '.',
    };

    let (entry, suffix) = id.split_once(separator).ok_or_else(invalid)?;
    if !is_entry_code(entry)
        || suffix.is_empty()
        || !suffix.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(invalid());
    }

    Ok(id.to_string())
}

/// Validate a sequence identity cutoff, which must lie in `[0, 1]`.
pub fn validate_identity_cutoff(cutoff: f64) -> Result<f64, ValidationError> {
    if !(0.0..=1.0).contains(&cutoff) {
        return Err(ValidationError::InvalidParameter {
            name: "identity_cutoff",
            reason: format!("{} is outside [0, 1]", cutoff),
        });
    }
    Ok(cutoff)
}

/// Validate an E-value cutoff, which must be finite and strictly positive.
pub fn validate_evalue_cutoff(cutoff: f64) -> Result<f64, ValidationError> {
    if !cutoff.is_finite() || cutoff <= 0.0 {
        return Err(ValidationError::InvalidParameter {
            name: "evalue_cutoff",
            reason: format!("{} is not a finite number greater than 0", cutoff),
        });
    }
    Ok(cutoff)
}

/// Validate an endpoint URL (http or https only).
pub fn validate_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("empty URL".to_string()));
    }

    let parsed = url::Url::parse(url).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(ValidationError::InvalidUrl(format!(
            "invalid scheme: {}",
            scheme
        ))),
    }
}
