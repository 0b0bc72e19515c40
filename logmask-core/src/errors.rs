//! errors.rs - Custom error types for the logmask-core library.
//!
//! `ValidationError` is the only error a rule mutation can produce. It is
//! returned to whoever asked for the mutation and the store is left untouched.
//! The redaction path has no error type at all.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// A candidate masking pattern was rejected.
///
/// Every variant carries the offending pattern text so the configuration
/// collaborator can report exactly which entry was refused.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid regex pattern: {pattern} - {source}")]
    InvalidSyntax {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(
        "Pattern must have exactly 2 capture groups (found {found}): {pattern} - first group \
         should match the identifier to keep, second group should match the value to redact"
    )]
    GroupCount { pattern: String, found: usize },

    #[error("Pattern cannot be combined with the active rules: {pattern} - {source}")]
    Combined {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ValidationError {
    /// The pattern text that failed validation.
    pub fn pattern(&self) -> &str {
        match self {
            ValidationError::InvalidSyntax { pattern, .. } => pattern,
            ValidationError::GroupCount { pattern, .. } => pattern,
            ValidationError::Combined { pattern, .. } => pattern,
        }
    }
}

/// Errors raised while reading a masking configuration document.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LogmaskError {
    #[error("Invalid masking configuration: {0}")]
    Config(String),

    #[error("An unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}
