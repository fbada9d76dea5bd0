//! Test fixtures and data for orchestrator tests

#![allow(dead_code)]

use serde_json::{json, Value};
use shared::{OptimizeBody, ParameterRange, RecordRunRequest};
use std::collections::BTreeMap;

/// Common test data
pub struct TestFixtures;

impl TestFixtures {
    /// Id of the seeded yield variable
    pub const YIELD_ID: i64 = 1;
    /// Id the run store mocks hand out
    pub const RUN_ID: i64 = 7;

    pub fn temperature_ranges() -> BTreeMap<String, ParameterRange> {
        let mut ranges = BTreeMap::new();
        ranges.insert("Temperature".to_string(), ParameterRange(50.0, 150.0));
        ranges
    }

    pub fn optimize_body() -> OptimizeBody {
        OptimizeBody {
            y_variable: Some(Self::YIELD_ID),
            ranges: Some(Self::temperature_ranges()),
        }
    }

    pub fn optimize_body_json() -> Value {
        json!({"y_variable": Self::YIELD_ID, "ranges": {"Temperature": [50, 150]}})
    }

    pub fn optimize_success() -> Value {
        json!({
            "success": true,
            "optimal_parameters": {"Temperature": 120},
            "predicted_value": 85.6,
            "score": 0.89
        })
    }

    pub fn optimize_declined() -> Value {
        json!({"success": false, "message": "Model not trained"})
    }

    pub fn record_request() -> RecordRunRequest {
        RecordRunRequest {
            y_variable: Some(Self::YIELD_ID),
            parameters: Some(
                json!({"温度": 120.0, "圧力": 5.0})
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            ),
            score: Some(0.91),
            ..RecordRunRequest::default()
        }
    }
}
