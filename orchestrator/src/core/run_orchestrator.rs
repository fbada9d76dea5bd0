//! Run orchestration
//!
//! Composes the variable catalog, the run store and the compute gateway:
//! validates requests, forwards compute calls and records optimize
//! outcomes. The compute call and the run insert are not atomic; how a
//! failed insert is reported is governed by [`PersistencePolicy`].

use serde_json::{Map, Value};
use shared::{
    component_error, component_info, component_warn, Component, Document, EnrichedRun, NewRun, NewVariable,
    OptimizeBody, OptimizeReply, OptimizeRequest, PredictionResult, RecordRunRequest, ResultDocument, RunId,
    TrainResult, Variable, VariableId,
};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{ComputeGateway, RunStore, VariableCatalog};

/// What to do when the run write after a successful optimize call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PersistencePolicy {
    /// Log the failure and still return the compute response
    #[default]
    BestEffort,
    /// Fail the request with a storage error
    Required,
}

/// Whether an optimize outcome was recorded
#[derive(Debug, Clone, PartialEq)]
pub enum RunPersistence {
    Stored { run_id: RunId },
    /// Compute service reported a business failure, or an unrecognized body
    Skipped,
    /// Write failed under the best-effort policy
    Failed { reason: String },
}

impl RunPersistence {
    pub fn label(&self) -> &'static str {
        match self {
            RunPersistence::Stored { .. } => "stored",
            RunPersistence::Skipped => "skipped",
            RunPersistence::Failed { .. } => "failed",
        }
    }

    pub fn run_id(&self) -> Option<RunId> {
        match self {
            RunPersistence::Stored { run_id } => Some(*run_id),
            _ => None,
        }
    }
}

/// Compute response to return verbatim, plus what happened to the run record
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOutcome {
    pub response: Value,
    pub persistence: RunPersistence,
}

/// Orchestrates catalog reads, run recording and compute calls
pub struct RunOrchestrator<C, R, G>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    catalog: C,
    runs: R,
    gateway: G,
    persistence: PersistencePolicy,
}

impl<C, R, G> RunOrchestrator<C, R, G>
where
    C: VariableCatalog,
    R: RunStore,
    G: ComputeGateway,
{
    /// Create a new orchestrator with injected services
    pub fn new(catalog: C, runs: R, gateway: G) -> Self {
        Self {
            catalog,
            runs,
            gateway,
            persistence: PersistencePolicy::default(),
        }
    }

    pub fn with_persistence_policy(mut self, policy: PersistencePolicy) -> Self {
        self.persistence = policy;
        self
    }

    pub fn persistence_policy(&self) -> PersistencePolicy {
        self.persistence
    }

    pub async fn variables(&self) -> OrchestratorResult<Vec<Variable>> {
        self.catalog.list_all().await
    }

    pub async fn variables_by_kind(&self, kind: &str) -> OrchestratorResult<Vec<Variable>> {
        self.catalog.list_by_kind(kind).await
    }

    /// Administrative insert into the catalog, which validates it
    pub async fn register_variable(&self, variable: NewVariable) -> OrchestratorResult<Variable> {
        self.catalog.insert(variable).await
    }

    /// Record a run submitted by a client
    pub async fn record_run(&self, request: RecordRunRequest) -> OrchestratorResult<RunId> {
        let y_variable_id = require_target(request.y_variable)?;
        if let Some(score) = request.score {
            if !score.is_finite() {
                return Err(OrchestratorError::invalid_request("score must be a finite number"));
            }
        }

        let run = NewRun {
            y_variable_id,
            x_variables: request.x_variables.map(Document::Parsed),
            parameters: request.parameters.map(Document::Parsed),
            result: request.result.map(Document::Parsed),
            score: request.score,
            feature_importance: request.feature_importance.map(Document::Parsed),
        };
        let id = self.runs.insert(run).await?;
        component_info!(Component::Api, "Recorded run {} for variable {}", id, y_variable_id);
        Ok(id)
    }

    pub async fn runs(&self) -> OrchestratorResult<Vec<EnrichedRun>> {
        self.runs.list_all().await
    }

    pub async fn train(&self) -> OrchestratorResult<TrainResult> {
        let result = self.gateway.train().await?;
        if result.success {
            component_info!(Component::Api, "Model retrained, score {:?}", result.score);
        } else {
            component_warn!(Component::Api, "Compute service declined training: {:?}", result.message);
        }
        Ok(result)
    }

    pub async fn predict(&self, payload: Value) -> OrchestratorResult<Value> {
        self.gateway.predict(payload).await
    }

    /// Forward an optimize request and record the outcome on business success
    pub async fn optimize(&self, body: OptimizeBody) -> OrchestratorResult<OptimizeOutcome> {
        let request = validate_optimize(body)?;
        let y_variable_id = request.y_variable;

        let reply = self.gateway.optimize(request).await?;
        let persistence = self.persist_outcome(y_variable_id, &reply).await?;

        Ok(OptimizeOutcome {
            response: reply.body,
            persistence,
        })
    }

    async fn persist_outcome(
        &self,
        y_variable_id: VariableId,
        reply: &OptimizeReply,
    ) -> OrchestratorResult<RunPersistence> {
        if !reply.is_success() {
            component_info!(
                Component::Api,
                "Optimize not successful, run not recorded: {:?}",
                reply.message()
            );
            return Ok(RunPersistence::Skipped);
        }

        match self.runs.insert(optimize_run(y_variable_id, reply)).await {
            Ok(run_id) => {
                component_info!(Component::Api, "Recorded optimize run {} for variable {}", run_id, y_variable_id);
                Ok(RunPersistence::Stored { run_id })
            }
            Err(error) => match self.persistence {
                PersistencePolicy::BestEffort => {
                    component_error!(
                        Component::Api,
                        "Optimize succeeded but recording the run failed: {}",
                        error
                    );
                    Ok(RunPersistence::Failed {
                        reason: error.to_string(),
                    })
                }
                PersistencePolicy::Required => Err(error),
            },
        }
    }
}

fn require_target(y_variable: Option<VariableId>) -> OrchestratorResult<VariableId> {
    y_variable.ok_or_else(|| OrchestratorError::invalid_request("y_variable is required"))
}

fn validate_optimize(body: OptimizeBody) -> OrchestratorResult<OptimizeRequest> {
    let y_variable = require_target(body.y_variable)?;
    let ranges = body
        .ranges
        .ok_or_else(|| OrchestratorError::invalid_request("ranges is required"))?;

    if ranges.is_empty() {
        return Err(OrchestratorError::invalid_request("ranges must name at least one variable"));
    }
    if let Some((name, range)) = ranges.iter().find(|(_, range)| !range.is_ordered()) {
        return Err(OrchestratorError::invalid_request(format!(
            "range for '{}' must satisfy min <= max, got [{}, {}]",
            name,
            range.min(),
            range.max()
        )));
    }

    Ok(OptimizeRequest { y_variable, ranges })
}

/// Run record for a successful optimize call. Fields of an unexpected
/// shape are kept as raw documents; a non-numeric score is dropped.
fn optimize_run(y_variable_id: VariableId, reply: &OptimizeReply) -> NewRun {
    let parameters = reply.optimal_parameters();
    let feature_importance = reply.feature_importance();
    let raw_fields: Vec<&str> = [
        ("optimal_parameters", parameters.as_ref().is_some_and(Document::is_raw)),
        ("feature_importance", feature_importance.as_ref().is_some_and(Document::is_raw)),
    ]
    .into_iter()
    .filter_map(|(field, raw)| raw.then_some(field))
    .collect();
    if !raw_fields.is_empty() {
        component_warn!(Component::Api, "Optimize fields {:?} have an unexpected shape, storing as received", raw_fields);
    }

    let score = reply.score().unwrap_or_else(|value| {
        component_warn!(Component::Api, "Optimize score {} is not a number, not recorded", value);
        None
    });

    NewRun {
        y_variable_id,
        x_variables: None,
        parameters,
        result: reply.predicted_value().map(|value| Document::Parsed(prediction_document(value))),
        score,
        feature_importance,
    }
}

/// `{"predicted_value": v}`, typed when `v` is a number
fn prediction_document(value: &Value) -> ResultDocument {
    match value {
        Value::Number(number) => ResultDocument::Prediction(PredictionResult::new(number.clone())),
        other => {
            let mut map = Map::new();
            map.insert("predicted_value".to_string(), other.clone());
            ResultDocument::Other(map)
        }
    }
}
