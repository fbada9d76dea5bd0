//! Message types for the process optimization service
//!
//! - `compute`: Orchestrator ↔ compute service bodies
//! - `api`: HTTP API request and response bodies

pub mod api;
pub mod compute;

pub use api::{FailureBody, HealthStatus, OptimizeBody, RecordRunRequest, RunCreated};

pub use compute::{OptimizeReply, OptimizeRequest, ParameterRange, TrainResult};
