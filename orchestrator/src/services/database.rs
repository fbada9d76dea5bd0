//! SQLite connection handle shared by the catalog and the run store

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{OrchestratorError, OrchestratorResult};

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS variables (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    type          TEXT NOT NULL CHECK (type IN ('Y', 'X')),
    description   TEXT,
    unit          TEXT,
    min_value     REAL,
    max_value     REAL,
    default_value REAL
);

CREATE TABLE IF NOT EXISTS optimization_runs (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at         TEXT NOT NULL,
    y_variable_id      INTEGER,
    x_variables        TEXT DEFAULT '{}',
    parameters         TEXT DEFAULT '{}',
    result             TEXT DEFAULT '{}',
    score              REAL,
    feature_importance TEXT DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS idx_runs_created_at ON optimization_runs(created_at);
"#;

/// Owned SQLite connection. Each operation locks it for the duration of one
/// closure on the blocking pool and releases it when the closure returns.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> OrchestratorResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| OrchestratorError::storage(format!("failed to open sqlite db {}: {e}", path.display())))?;
        Self::from_connection(conn)
    }

    pub fn memory() -> OrchestratorResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| OrchestratorError::storage(format!("failed to open in-memory sqlite db: {e}")))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> OrchestratorResult<Self> {
        conn.execute_batch(DDL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `op` against the connection on the blocking pool
    pub async fn call<F, T>(&self, op: F) -> OrchestratorResult<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| OrchestratorError::storage("sqlite connection lock poisoned"))?;
            op(&mut guard).map_err(OrchestratorError::from)
        })
        .await?
    }
}
