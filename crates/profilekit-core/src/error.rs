//! Core error types

use thiserror::Error;

/// Errors raised while converting between text, untyped documents and typed records
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to parse document: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("failed to convert document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("field {field} must be a string, found {found}")]
    InvalidField {
        field: &'static str,
        found: &'static str,
    },

    #[error("document declares {found}, expected {expected}")]
    IdentityMismatch { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
