//! Utility modules shared by the RCSB clients.
//!
//! - [`HttpClient`]: shared `reqwest` client with user agent and timeouts
//! - [`validate_identifier`], [`validate_entry_id`]: identifier shape checks
//! - [`validate_identity_cutoff`], [`validate_evalue_cutoff`]: sequence search cutoffs
//! - [`validate_url`]: endpoint override checks
//!
//! # Identifier Validation
//!
//! ```rust
//! use rcsb_client::utils::{validate_identifier, IdentifierKind};
//!
//! assert!(validate_identifier("4HHB_1", IdentifierKind::Entity).is_ok());
//! assert!(validate_identifier("4HHB", IdentifierKind::Instance).is_err());
//! ```

mod http;
mod validate;

pub use http::HttpClient;
pub use validate::{
    validate_entry_id, validate_evalue_cutoff, validate_identifier, validate_identity_cutoff,
    validate_url, IdentifierKind, ValidationError,
};
