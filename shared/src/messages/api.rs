//! HTTP API request and response bodies

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::compute::ParameterRange;
use crate::documents::{FeatureImportance, InputAssignment, ResultDocument, RunParameters};
use crate::types::{RunId, VariableId};

/// Body of `POST /api/optimization`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RecordRunRequest {
    #[serde(default)]
    pub y_variable: Option<VariableId>,
    #[serde(default)]
    pub x_variables: Option<InputAssignment>,
    #[serde(default)]
    pub parameters: Option<RunParameters>,
    #[serde(default)]
    pub result: Option<ResultDocument>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feature_importance: Option<FeatureImportance>,
}

/// Response of `POST /api/optimization`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunCreated {
    pub id: RunId,
    pub message: String,
}

/// Body of `POST /api/optimize`, validated before it reaches the compute service
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OptimizeBody {
    #[serde(default)]
    pub y_variable: Option<VariableId>,
    #[serde(default)]
    pub ranges: Option<BTreeMap<String, ParameterRange>>,
}

/// Liveness response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// Body returned for every failed API call
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
    pub error: String,
}

impl FailureBody {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: kind.into(),
        }
    }
}
