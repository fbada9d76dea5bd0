//! Orchestrator-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use shared::{FailureBody, SharedError};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Storage operation failed: {message}")]
    StorageError { message: String },

    #[error("Compute service unreachable: {message}")]
    ComputeUnreachable { message: String },

    #[error("Compute service did not answer within {timeout_secs}s")]
    ComputeTimeout { timeout_secs: u64 },

    #[error("Compute service returned HTTP {status}: {body}")]
    ComputeStatus { status: u16, body: String },

    #[error("Compute service response could not be decoded: {message}")]
    ComputeProtocol { message: String },

    #[error("Invalid request: {details}")]
    InvalidRequest { details: String },

    #[error("Configuration error: {field}: {message}")]
    ConfigurationError { field: String, message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Blocking task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Failure classes exposed to HTTP callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Storage,
    Transport,
    Validation,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Storage => write!(f, "storage"),
            FailureKind::Transport => write!(f, "transport"),
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Internal => write!(f, "internal"),
        }
    }
}

impl OrchestratorError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::InvalidRequest {
            details: details.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::StorageError { .. } | Self::TaskError(_) => FailureKind::Storage,
            Self::ComputeUnreachable { .. }
            | Self::ComputeTimeout { .. }
            | Self::ComputeStatus { .. }
            | Self::ComputeProtocol { .. } => FailureKind::Transport,
            Self::InvalidRequest { .. } => FailureKind::Validation,
            Self::SharedError(SharedError::DocumentEncoding { .. }) => FailureKind::Internal,
            Self::SharedError(_) => FailureKind::Validation,
            Self::ConfigurationError { .. } | Self::IoError(_) => FailureKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ComputeTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => match self.kind() {
                FailureKind::Storage | FailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                FailureKind::Transport => StatusCode::BAD_GATEWAY,
                FailureKind::Validation => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// True when the compute service could not be reached or answered with a non-success status
    pub fn is_transport(&self) -> bool {
        self.kind() == FailureKind::Transport
    }
}

impl From<rusqlite::Error> for OrchestratorError {
    fn from(error: rusqlite::Error) -> Self {
        Self::storage(error.to_string())
    }
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let body = FailureBody::new(self.kind().to_string(), self.to_string());
        (self.status_code(), Json(body)).into_response()
    }
}
