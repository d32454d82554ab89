//! Validation and sanitization passes over the raw submission payload.

pub mod form;
pub mod sanitize;

pub use form::{validate_payload, ValidationReport};
pub use sanitize::{clean_text, sanitize_payload};
