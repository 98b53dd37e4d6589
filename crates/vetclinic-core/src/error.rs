//! Error types for the clinic records.

use thiserror::Error;

use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ClinicError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// One or more submitted fields failed their rule. Nothing was
    /// persisted.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClinicError {
    /// Field errors carried by a validation failure, if this is one.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for ClinicError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
