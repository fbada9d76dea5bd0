//! Run history endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use shared::{EnrichedRun, RecordRunRequest, RunCreated};

use super::{json_body, AppState};
use crate::error::OrchestratorResult;
use crate::traits::{ComputeGateway, RunStore, VariableCatalog};

/// `POST /api/optimization`
pub async fn record_run<C, R, G>(
    State(orchestrator): State<AppState<C, R, G>>,
    payload: Result<Json<RecordRunRequest>, JsonRejection>,
) -> OrchestratorResult<(StatusCode, Json<RunCreated>)>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    let id = orchestrator.record_run(json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(RunCreated {
            id,
            message: "Optimization run saved".to_string(),
        }),
    ))
}

/// `GET /api/optimization`, newest first
pub async fn list_runs<C, R, G>(State(orchestrator): State<AppState<C, R, G>>) -> OrchestratorResult<Json<Vec<EnrichedRun>>>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    Ok(Json(orchestrator.runs().await?))
}
