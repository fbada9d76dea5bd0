//! Run orchestration and persistence for process optimization experiments
//!
//! Keeps a catalog of process variables and a history of optimization runs
//! in SQLite, and brokers train/predict/optimize calls to an external
//! compute service over HTTP. Successful optimize outcomes are recorded as
//! runs.

pub mod config;
pub mod core;
pub mod error;
pub mod server;
pub mod services;
pub mod traits;
pub mod web;

// Re-export commonly used types
pub use config::{AllowedOrigins, Args, ServerConfig};
pub use core::{OptimizeOutcome, PersistencePolicy, RunOrchestrator, RunPersistence};
pub use error::{FailureKind, OrchestratorError, OrchestratorResult};
pub use server::Server;
pub use traits::{ComputeGateway, RunStore, VariableCatalog};
pub use web::build_router;
