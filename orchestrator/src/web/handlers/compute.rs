//! Compute service passthrough endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use shared::{OptimizeBody, TrainResult};

use super::{json_body, AppState};
use crate::error::OrchestratorResult;
use crate::traits::{ComputeGateway, RunStore, VariableCatalog};
use crate::web::{RUN_ID_HEADER, RUN_PERSISTENCE_HEADER};

/// `POST /api/train`
pub async fn train<C, R, G>(State(orchestrator): State<AppState<C, R, G>>) -> OrchestratorResult<Json<TrainResult>>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    Ok(Json(orchestrator.train().await?))
}

/// `POST /api/predict`; the compute body is returned as received
pub async fn predict<C, R, G>(
    State(orchestrator): State<AppState<C, R, G>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> OrchestratorResult<Json<Value>>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    Ok(Json(orchestrator.predict(json_body(payload)?).await?))
}

/// `POST /api/optimize`; the compute body is returned as received, with
/// headers describing whether the run was recorded
pub async fn optimize<C, R, G>(
    State(orchestrator): State<AppState<C, R, G>>,
    payload: Result<Json<OptimizeBody>, JsonRejection>,
) -> OrchestratorResult<Response>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    let outcome = orchestrator.optimize(json_body(payload)?).await?;

    let mut response = Json(outcome.response).into_response();
    let headers = response.headers_mut();
    headers.insert(
        RUN_PERSISTENCE_HEADER,
        HeaderValue::from_static(outcome.persistence.label()),
    );
    if let Some(run_id) = outcome.persistence.run_id() {
        headers.insert(RUN_ID_HEADER, HeaderValue::from(run_id));
    }
    Ok(response)
}
