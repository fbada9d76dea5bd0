//! Test helpers and builder patterns for orchestrator tests
//!
//! `OrchestratorBuilder` wires mocks for unit tests; `TestApp` serves the real
//! router over SQLite in memory against a mock compute service.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use orchestrator::services::{seed, Database, HttpComputeGateway, SqliteRunStore, SqliteVariableCatalog};
use orchestrator::traits::{MockComputeGateway, MockRunStore, MockVariableCatalog};
use orchestrator::*;
use url::Url;

pub type MockOrchestrator = RunOrchestrator<MockVariableCatalog, MockRunStore, MockComputeGateway>;

/// Builder for run orchestrators over mocks
pub struct OrchestratorBuilder {
    catalog: MockVariableCatalog,
    runs: MockRunStore,
    gateway: MockComputeGateway,
    policy: PersistencePolicy,
}

impl OrchestratorBuilder {
    /// Mocks with no expectations; any unexpected call panics
    pub fn new() -> Self {
        Self {
            catalog: MockVariableCatalog::new(),
            runs: MockRunStore::new(),
            gateway: MockComputeGateway::new(),
            policy: PersistencePolicy::default(),
        }
    }

    pub fn with_catalog<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockVariableCatalog),
    {
        setup(&mut self.catalog);
        self
    }

    pub fn with_runs<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockRunStore),
    {
        setup(&mut self.runs);
        self
    }

    pub fn with_gateway<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockComputeGateway),
    {
        setup(&mut self.gateway);
        self
    }

    pub fn with_policy(mut self, policy: PersistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> MockOrchestrator {
        RunOrchestrator::new(self.catalog, self.runs, self.gateway).with_persistence_policy(self.policy)
    }
}

/// Running server backed by a seeded in-memory database
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub database: Database,
}

impl TestApp {
    pub async fn spawn(compute_uri: &str) -> Self {
        Self::spawn_with_policy(compute_uri, PersistencePolicy::BestEffort).await
    }

    pub async fn spawn_with_policy(compute_uri: &str, policy: PersistencePolicy) -> Self {
        let database = Database::memory().unwrap();
        let catalog = SqliteVariableCatalog::new(database.clone());
        catalog.seed_if_empty(seed::default_variables()).await.unwrap();

        let runs = SqliteRunStore::new(database.clone());
        let gateway = HttpComputeGateway::new(Url::parse(compute_uri).unwrap(), Duration::from_secs(5)).unwrap();
        let orchestrator = Arc::new(RunOrchestrator::new(catalog, runs, gateway).with_persistence_policy(policy));

        let origins = AllowedOrigins::List(vec!["http://localhost:3000".parse().unwrap()]);
        let router = build_router(orchestrator, &origins);

        let server = Server::bind("127.0.0.1:0".parse().unwrap(), router).await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run_until(std::future::pending()));

        Self {
            addr,
            client: reqwest::Client::builder().no_proxy().build().unwrap(),
            database,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(body).send().await.unwrap()
    }

    pub async fn run_count(&self) -> i64 {
        self.database
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM optimization_runs", [], |row| row.get(0)))
            .await
            .unwrap()
    }

    /// Make every subsequent run insert fail
    pub async fn break_run_inserts(&self) {
        self.database
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_runs BEFORE INSERT ON optimization_runs
                     BEGIN SELECT RAISE(ABORT, 'disk quota exceeded'); END;",
                )
            })
            .await
            .unwrap();
    }
}
