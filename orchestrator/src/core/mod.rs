//! Core business logic
//!
//! Pure orchestration over injected services; no direct I/O.

pub mod run_orchestrator;

pub use run_orchestrator::{OptimizeOutcome, PersistencePolicy, RunOrchestrator, RunPersistence};
