//! HTTP surface
//!
//! Routes, CORS and request tracing around the run orchestrator.

pub mod handlers;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AllowedOrigins;
use crate::core::RunOrchestrator;
use crate::traits::{ComputeGateway, RunStore, VariableCatalog};
use handlers::{compute, health, runs, variables};

/// Header reporting whether an optimize outcome was recorded
pub const RUN_PERSISTENCE_HEADER: &str = "x-run-persistence";
/// Header carrying the id of the recorded run
pub const RUN_ID_HEADER: &str = "x-run-id";

/// Build the Axum router with all routes
pub fn build_router<C, R, G>(orchestrator: Arc<RunOrchestrator<C, R, G>>, origins: &AllowedOrigins) -> Router
where
    C: VariableCatalog + 'static,
    R: RunStore + 'static,
    G: ComputeGateway + 'static,
{
    Router::new()
        // Variable catalog
        .route(
            "/api/variables",
            get(variables::list_variables::<C, R, G>).post(variables::create_variable::<C, R, G>),
        )
        .route("/api/variables/:kind", get(variables::list_variables_by_kind::<C, R, G>))
        // Run history
        .route(
            "/api/optimization",
            get(runs::list_runs::<C, R, G>).post(runs::record_run::<C, R, G>),
        )
        // Compute service
        .route("/api/train", post(compute::train::<C, R, G>))
        .route("/api/predict", post(compute::predict::<C, R, G>))
        .route("/api/optimize", post(compute::optimize::<C, R, G>))
        // Health check
        .route("/health", get(health::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(origins))
                .into_inner(),
        )
        .with_state(orchestrator)
}

fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([
            HeaderName::from_static(RUN_PERSISTENCE_HEADER),
            HeaderName::from_static(RUN_ID_HEADER),
        ]);

    match origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(list) => layer.allow_origin(AllowOrigin::list(list.iter().cloned())),
    }
}
