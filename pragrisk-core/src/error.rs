//! Error types for catalogue forms.

use thiserror::Error;

/// A single field that failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Field {field} is too long: {actual} > {max} characters")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// Errors turning a form back into an entity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Field(#[from] ValidationError),

    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Selected {field} '{id}' is not among the loaded options")]
    UnknownReference { field: String, id: String },
}
