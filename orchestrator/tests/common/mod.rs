//! Common test utilities for orchestrator tests

pub mod fixtures;
pub mod helpers;

#[allow(unused_imports)]
pub use fixtures::TestFixtures;
#[allow(unused_imports)]
pub use helpers::{OrchestratorBuilder, TestApp};
