//! Service implementations
//!
//! Real implementations of the storage and compute service traits

pub mod compute_gateway;
pub mod database;
pub mod run_store;
pub mod seed;
pub mod variable_catalog;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use compute_gateway::HttpComputeGateway;
pub use database::Database;
pub use run_store::SqliteRunStore;
pub use variable_catalog::SqliteVariableCatalog;
