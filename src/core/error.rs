use std::path::PathBuf;

use thiserror::Error;

use crate::core::FieldName;

/// Programmer errors raised by a `FormState`. A value that fails validation is
/// never one of these; it lands in the error map instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field '{field}'")]
    UnknownField { field: FieldName },

    #[error("validator failed on field '{field}': {reason}")]
    Validator { field: FieldName, reason: String },
}

impl FormError {
    pub fn unknown_field(field: impl Into<FieldName>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }
}

/// Errors raised while loading a form description.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid yaml form description: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid json form description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported form description format '{}' (expected .yaml, .yml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("field '{field}' has an invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        field: FieldName,
        pattern: String,
        reason: String,
    },
}
