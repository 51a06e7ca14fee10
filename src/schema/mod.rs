//! The validator seam. A [`FormState`](crate::state::form::FormState) never
//! evaluates rules itself; it hands a single-field projection of its record to
//! a [`SchemaValidator`] and stores whatever message comes back.

pub mod rules;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::FieldName;
use crate::core::record::Record;

/// One rule violation reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: FieldName,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<FieldName>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The value does not satisfy the schema.
    #[error("{} violation(s)", .0.len())]
    Invalid(Vec<Violation>),

    /// The schema itself is broken; not something the user can fix by typing.
    #[error("schema misconfigured: {0}")]
    Misconfigured(String),
}

impl SchemaError {
    pub fn invalid(field: impl Into<FieldName>, message: impl Into<String>) -> Self {
        Self::Invalid(vec![Violation::new(field, message)])
    }
}

#[async_trait]
pub trait SchemaValidator: Send + Sync {
    /// Validate `field` against `partial`, which holds only that field.
    async fn validate_at(&self, field: &FieldName, partial: &Record) -> Result<(), SchemaError>;
}

/// The message stored for `field` out of a list of violations: the first
/// non-empty one reported for that field, else the first non-empty one at all.
pub(crate) fn first_message(field: &FieldName, violations: &[Violation]) -> Option<String> {
    violations
        .iter()
        .find(|v| &v.field == field && !v.message.is_empty())
        .or_else(|| violations.iter().find(|v| !v.message.is_empty()))
        .map(|v| v.message.clone())
}
