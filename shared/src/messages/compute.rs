//! Compute service wire messages
//!
//! Request and response bodies exchanged with the external training,
//! prediction and optimization service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::documents::{Document, FeatureImportance, RunParameters};
use crate::types::VariableId;

/// Outcome of a retrain on the compute service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TrainResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            score: None,
            message: Some(message.into()),
        }
    }
}

/// Search interval for one X variable, serialized as `[min, max]`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ParameterRange(pub f64, pub f64);

impl ParameterRange {
    pub fn min(&self) -> f64 {
        self.0
    }

    pub fn max(&self) -> f64 {
        self.1
    }

    pub fn is_ordered(&self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.0 <= self.1
    }
}

/// Optimize request forwarded to the compute service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OptimizeRequest {
    pub y_variable: VariableId,
    pub ranges: BTreeMap<String, ParameterRange>,
}

/// Optimize response body exactly as received.
///
/// The compute service reports the predicted value as `predicted_yield`;
/// both names are read. Each field is read on its own so one field of an
/// unexpected shape does not hide the others.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizeReply {
    pub body: Value,
}

impl OptimizeReply {
    pub fn from_body(body: Value) -> Self {
        Self { body }
    }

    /// Business success: the body says `success: true`
    pub fn is_success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool) == Some(true)
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// The predicted value under either name, whatever its JSON type
    pub fn predicted_value(&self) -> Option<&Value> {
        ["predicted_value", "predicted_yield"]
            .into_iter()
            .filter_map(|name| self.field(name))
            .next()
    }

    /// `Err` carries the offending value when `score` is present but not a number
    pub fn score(&self) -> Result<Option<f64>, &Value> {
        match self.field("score") {
            None => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or(value),
        }
    }

    pub fn optimal_parameters(&self) -> Option<Document<RunParameters>> {
        self.field("optimal_parameters").map(Document::from_value)
    }

    pub fn feature_importance(&self) -> Option<Document<FeatureImportance>> {
        self.field("feature_importance").map(Document::from_value)
    }

    /// A present, non-null field
    fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name).filter(|value| !value.is_null())
    }
}
