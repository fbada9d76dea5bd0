//! Request handlers, one module per resource

pub mod compute;
pub mod health;
pub mod runs;
pub mod variables;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use std::sync::Arc;

use crate::core::RunOrchestrator;
use crate::error::{OrchestratorError, OrchestratorResult};

/// Router state shared by every handler
pub type AppState<C, R, G> = Arc<RunOrchestrator<C, R, G>>;

/// Unwrap a JSON body, turning extractor rejections into validation failures
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> OrchestratorResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| OrchestratorError::invalid_request(rejection.body_text()))
}
