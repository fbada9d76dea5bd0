//! HTTP client for the external compute service
//!
//! Forwards train, predict and optimize calls and normalizes failures:
//! an unreachable service, a timeout, a non-success status or an
//! undecodable body are transport failures. A success status whose body
//! says `success: false` is handed back untouched for the caller to report.

use async_trait::async_trait;
use serde_json::Value;
use shared::{component_debug, component_warn, Component, OptimizeReply, OptimizeRequest, TrainResult};
use std::time::{Duration, Instant};
use url::Url;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::ComputeGateway;

const TRAIN_ROUTE: &str = "api/ml/train";
const PREDICT_ROUTE: &str = "api/ml/predict";
const OPTIMIZE_ROUTE: &str = "api/ml/optimize";

/// Longest error body kept in a transport failure message
const MAX_ERROR_BODY: usize = 512;

/// Compute gateway over reqwest
#[derive(Clone)]
pub struct HttpComputeGateway {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpComputeGateway {
    /// Create a gateway for `base_url`; every call is bounded by `timeout`
    pub fn new(base_url: Url, timeout: Duration) -> OrchestratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OrchestratorError::config("compute_url", format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            timeout,
        })
    }

    fn endpoint(&self, route: &str) -> OrchestratorResult<Url> {
        self.base_url
            .join(route)
            .map_err(|e| OrchestratorError::config("compute_url", format!("cannot build {route} URL: {e}")))
    }

    fn transport_error(&self, error: reqwest::Error) -> OrchestratorError {
        if error.is_timeout() {
            OrchestratorError::ComputeTimeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            OrchestratorError::ComputeUnreachable {
                message: error.to_string(),
            }
        }
    }

    /// POST to a compute route and return the JSON body of a success response
    async fn post(&self, route: &str, payload: Option<&Value>) -> OrchestratorResult<Value> {
        let url = self.endpoint(route)?;
        let started = Instant::now();
        component_debug!(Component::Gateway, "POST {}", url);

        let mut request = self.client.post(url.clone());
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            let error = self.transport_error(e);
            component_warn!(Component::Gateway, "POST {} failed: {}", url, error);
            error
        })?;

        let status = response.status();
        if !status.is_success() {
            let body: String = match response.text().await {
                Ok(body) => body.chars().take(MAX_ERROR_BODY).collect(),
                Err(e) => {
                    component_warn!(Component::Gateway, "POST {} error body unreadable: {}", url, e);
                    format!("<error body unreadable: {e}>")
                }
            };
            component_warn!(Component::Gateway, "POST {} returned HTTP {}", url, status.as_u16());
            return Err(OrchestratorError::ComputeStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| OrchestratorError::ComputeProtocol { message: e.to_string() })?;

        component_debug!(
            Component::Gateway,
            "POST {} answered HTTP {} in {}ms",
            url,
            status.as_u16(),
            started.elapsed().as_millis()
        );
        Ok(body)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl ComputeGateway for HttpComputeGateway {
    async fn train(&self) -> OrchestratorResult<TrainResult> {
        let body = self.post(TRAIN_ROUTE, None).await?;
        serde_json::from_value(body).map_err(|e| OrchestratorError::ComputeProtocol {
            message: format!("unexpected train response: {e}"),
        })
    }

    async fn predict(&self, payload: Value) -> OrchestratorResult<Value> {
        self.post(PREDICT_ROUTE, Some(&payload)).await
    }

    async fn optimize(&self, request: OptimizeRequest) -> OrchestratorResult<OptimizeReply> {
        let payload = serde_json::to_value(&request).map_err(|e| OrchestratorError::ComputeProtocol {
            message: format!("cannot encode optimize request: {e}"),
        })?;
        let body = self.post(OPTIMIZE_ROUTE, Some(&payload)).await?;
        Ok(OptimizeReply::from_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_against_base_path() {
        let gateway =
            HttpComputeGateway::new(Url::parse("http://localhost:5001").unwrap(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            gateway.endpoint(TRAIN_ROUTE).unwrap().as_str(),
            "http://localhost:5001/api/ml/train"
        );

        let prefixed =
            HttpComputeGateway::new(Url::parse("http://compute.internal/ml").unwrap(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            prefixed.endpoint(OPTIMIZE_ROUTE).unwrap().as_str(),
            "http://compute.internal/ml/api/ml/optimize"
        );
    }
}
