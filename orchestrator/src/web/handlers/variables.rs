//! Variable catalog endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared::{NewVariable, Variable};

use super::{json_body, AppState};
use crate::error::OrchestratorResult;
use crate::traits::{ComputeGateway, RunStore, VariableCatalog};

/// `GET /api/variables`
pub async fn list_variables<C, R, G>(State(orchestrator): State<AppState<C, R, G>>) -> OrchestratorResult<Json<Vec<Variable>>>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    Ok(Json(orchestrator.variables().await?))
}

/// `GET /api/variables/:kind`, where kind is `Y` or `X` in any case
pub async fn list_variables_by_kind<C, R, G>(
    State(orchestrator): State<AppState<C, R, G>>,
    Path(kind): Path<String>,
) -> OrchestratorResult<Json<Vec<Variable>>>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    Ok(Json(orchestrator.variables_by_kind(&kind).await?))
}

/// `POST /api/variables`
pub async fn create_variable<C, R, G>(
    State(orchestrator): State<AppState<C, R, G>>,
    payload: Result<Json<NewVariable>, JsonRejection>,
) -> OrchestratorResult<(StatusCode, Json<Variable>)>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    let variable = orchestrator.register_variable(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(variable)))
}
