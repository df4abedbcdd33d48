//! Fatal sniff errors
//!
//! Recoverable structure anomalies are reported as warnings in the file's
//! report; everything here aborts the sniff for the run.

use thiserror::Error;

/// Errors that stop a sniff from running
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SniffError {
    #[error("invalid setting for property {property}: expected {expected}, got \"{value}\" instead")]
    InvalidProperty {
        property: String,
        value: String,
        expected: String,
    },

    #[error("invalid {property} property value \"{value}\"")]
    InvalidBoolean { property: String, value: String },

    #[error("invalid PHP version configured: \"{0}\"")]
    InvalidVersion(String),

    #[error("unknown sniff \"{0}\"")]
    UnknownSniff(String),

    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("unhandled token {kind} at line {line}, column {column}")]
    UnhandledToken {
        kind: &'static str,
        line: usize,
        column: usize,
    },
}

impl SniffError {
    pub fn invalid_property(property: &str, value: &str, expected: &str) -> Self {
        SniffError::InvalidProperty {
            property: property.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Unhandled token at `ptr`, with its printable location
    pub fn unhandled(stream: &csu_core::TokenStream, ptr: usize) -> Self {
        let token = &stream[ptr];
        SniffError::UnhandledToken {
            kind: token.kind.printable_name(),
            line: token.line,
            column: token.column,
        }
    }
}
