//! Error types for enrichment analysis.
//!
//! Public operations return [`anyhow::Result`]; the variants below are what ends up inside the
//! `anyhow::Error` and can be recovered with `err.downcast_ref::<EnrichmentError>()`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnrichmentError {
    #[error("No reference loaded: call fit() before this operation")]
    NoReference,

    #[error("No universe registered: call set_universe() or fit with keep_whole = false")]
    NoUniverse,

    #[error("No result stored: call calc() before this operation")]
    NoResult,

    #[error("Invalid value '{value}' for {option}: choose one of {accepted}")]
    InvalidOption {
        option: String,
        value: String,
        accepted: String,
    },

    #[error("Unknown term '{term}', perhaps: {candidates:?}")]
    UnknownTerm {
        term: String,
        candidates: Vec<String>,
    },

    #[error("Score normalization is only applicable to the exploratory mode")]
    FocusedNormalization,

    #[error("Invalid contingency table for term '{term}': {reason}")]
    InvalidContingencyTable { term: String, reason: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Invalid p-value at index {index}: {value}")]
    InvalidPValue { index: usize, value: f64 },

    #[error("Empty p-value array")]
    EmptyPValues,
}

impl EnrichmentError {
    pub(crate) fn invalid_option(option: &str, value: &str, accepted: &[&str]) -> Self {
        EnrichmentError::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
            accepted: accepted
                .iter()
                .map(|a| format!("'{}'", a))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
