//! Service trait definitions for dependency injection
//!
//! Storage and the compute service are reached only through these traits,
//! so the run orchestrator can be exercised against mocks.

use async_trait::async_trait;
use serde_json::Value;
use shared::{EnrichedRun, NewRun, NewVariable, OptimizeReply, OptimizeRequest, RunId, TrainResult, Variable};

use crate::error::OrchestratorResult;

/// Durable catalog of process variables
#[mockall::automock]
#[async_trait]
pub trait VariableCatalog: Send + Sync {
    /// Every variable in insertion order
    async fn list_all(&self) -> OrchestratorResult<Vec<Variable>>;

    /// Variables of one kind, matched case-insensitively against `Y`/`X`.
    /// An unknown kind yields an empty list.
    async fn list_by_kind(&self, kind: &str) -> OrchestratorResult<Vec<Variable>>;

    /// Validate and insert one variable, returning the stored row
    async fn insert(&self, variable: NewVariable) -> OrchestratorResult<Variable>;

    /// Insert the fixture set in one transaction when the catalog is empty.
    /// Returns the number of rows inserted.
    async fn seed_if_empty(&self, fixtures: Vec<NewVariable>) -> OrchestratorResult<usize>;
}

/// Durable store of optimization runs
#[mockall::automock]
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Insert a run, stamping its creation time, and return the generated id
    async fn insert(&self, run: NewRun) -> OrchestratorResult<RunId>;

    /// All runs newest-first, joined to their target variable name
    async fn list_all(&self) -> OrchestratorResult<Vec<EnrichedRun>>;
}

/// Client for the external compute service
#[mockall::automock]
#[async_trait]
pub trait ComputeGateway: Send + Sync {
    /// Trigger a full retrain
    async fn train(&self) -> OrchestratorResult<TrainResult>;

    /// Forward a prediction payload; the response body is returned as received
    async fn predict(&self, payload: Value) -> OrchestratorResult<Value>;

    /// Search the given ranges for the optimum
    async fn optimize(&self, request: OptimizeRequest) -> OrchestratorResult<OptimizeReply>;
}
