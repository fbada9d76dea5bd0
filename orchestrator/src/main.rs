//! Main entry point for the orchestrator binary
//!
//! Wires the SQLite-backed stores and the HTTP compute gateway into the run
//! orchestrator and serves the HTTP API.

use std::sync::Arc;

use orchestrator::{
    build_router,
    services::{seed, Database, HttpComputeGateway, SqliteRunStore, SqliteVariableCatalog},
    OrchestratorResult, RunOrchestrator, Server, ServerConfig, VariableCatalog,
};
use shared::{component_debug, component_info, logging, Component};

#[tokio::main]
async fn main() -> OrchestratorResult<()> {
    let config = ServerConfig::load()?;
    logging::init_tracing_with_level(Some(&config.log_level));

    logging::log_startup(Component::Server, "process optimization orchestrator");
    component_debug!(
        Component::Server,
        "Compute service {} (timeout {:?}), persistence {:?}",
        config.compute_url,
        config.compute_timeout,
        config.persistence
    );

    let database = Database::open(&config.database_path)?;
    component_info!(Component::RunStore, "Opened database {}", config.database_path.display());

    let catalog = SqliteVariableCatalog::new(database.clone());
    if let Err(e) = catalog.seed_if_empty(seed::default_variables()).await {
        logging::log_error(Component::Catalog, "Seeding default variables", &e);
        return Err(e);
    }

    let runs = SqliteRunStore::new(database);
    let gateway = HttpComputeGateway::new(config.compute_url.clone(), config.compute_timeout)?;

    let orchestrator =
        Arc::new(RunOrchestrator::new(catalog, runs, gateway).with_persistence_policy(config.persistence));
    let router = build_router(orchestrator, &config.allowed_origins);

    Server::bind(config.bind_addr, router).await?.run().await?;

    logging::log_success(Component::Server, "Orchestrator stopped gracefully");
    Ok(())
}
