//! Service-specific tests
//!
//! Each service has its own test file; shared fixtures live in `common`.

#[cfg(test)]
mod variable_catalog;

// Common test utilities for services
#[cfg(test)]
pub mod common {
    use shared::{NewVariable, VariableKind};

    use crate::services::{Database, SqliteRunStore, SqliteVariableCatalog};

    /// Fresh in-memory database with both stores attached
    pub fn memory_stores() -> (Database, SqliteVariableCatalog, SqliteRunStore) {
        let db = Database::memory().expect("in-memory database");
        let catalog = SqliteVariableCatalog::new(db.clone());
        let runs = SqliteRunStore::new(db.clone());
        (db, catalog, runs)
    }

    pub fn temperature() -> NewVariable {
        NewVariable::new("Temperature", VariableKind::Input)
            .with_description("Reactor temperature")
            .with_unit("°C")
            .with_bounds(50.0, 150.0)
            .with_default(100.0)
    }

    pub fn yield_variable() -> NewVariable {
        NewVariable::new("Yield", VariableKind::Output)
            .with_unit("%")
            .with_bounds(0.0, 100.0)
    }
}
