//! Shared error types for the process optimization service

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid variable {field}: {reason}")]
    InvalidVariable { field: String, reason: String },

    #[error("Unknown variable kind: {input}")]
    UnknownVariableKind { input: String },

    #[error("Document encoding failed: {message}")]
    DocumentEncoding { message: String },
}

impl SharedError {
    pub fn invalid_variable(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidVariable {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
