//! Shared types for the process optimization service
//!
//! Contains the domain model (variables, runs, embedded documents), the
//! message bodies exchanged with the compute service and HTTP callers, and
//! logging helpers used by every component.

pub mod documents;
pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use documents::{
    Document, FeatureImportance, InputAssignment, PredictionResult, ResultDocument, RunParameters,
};

pub use messages::{
    // HTTP API bodies
    FailureBody, HealthStatus, OptimizeBody, RecordRunRequest, RunCreated,

    // Compute service bodies
    OptimizeReply, OptimizeRequest, ParameterRange, TrainResult,
};
