//! SQLite-backed variable catalog

use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use shared::{component_debug, component_info, Component, NewVariable, Variable, VariableKind};

use crate::error::OrchestratorResult;
use crate::services::database::Database;
use crate::traits::VariableCatalog;

const SELECT_VARIABLES: &str =
    "SELECT id, name, type, description, unit, min_value, max_value, default_value FROM variables";

/// Variable catalog stored in the `variables` table
#[derive(Clone)]
pub struct SqliteVariableCatalog {
    db: Database,
}

impl SqliteVariableCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn variable_from_row(row: &Row<'_>) -> rusqlite::Result<Variable> {
    let tag: String = row.get(2)?;
    let kind = VariableKind::from_tag(&tag)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(Variable {
        id: row.get(0)?,
        name: row.get(1)?,
        kind,
        description: row.get(3)?,
        unit: row.get(4)?,
        min_value: row.get(5)?,
        max_value: row.get(6)?,
        default_value: row.get(7)?,
    })
}

fn insert_variable(conn: &Connection, variable: &NewVariable) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO variables(name, type, description, unit, min_value, max_value, default_value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            variable.name,
            variable.kind.as_tag(),
            variable.description,
            variable.unit,
            variable.min_value,
            variable.max_value,
            variable.default_value,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

#[async_trait]
impl VariableCatalog for SqliteVariableCatalog {
    async fn list_all(&self) -> OrchestratorResult<Vec<Variable>> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_VARIABLES} ORDER BY id"))?;
                let rows = stmt.query_map([], variable_from_row)?;
                rows.collect()
            })
            .await
    }

    async fn list_by_kind(&self, kind: &str) -> OrchestratorResult<Vec<Variable>> {
        let Some(kind) = VariableKind::parse(kind) else {
            component_debug!(Component::Catalog, "Unknown variable kind '{}', returning no variables", kind);
            return Ok(Vec::new());
        };

        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_VARIABLES} WHERE type = ?1 ORDER BY id"))?;
                let rows = stmt.query_map(params![kind.as_tag()], variable_from_row)?;
                rows.collect()
            })
            .await
    }

    async fn insert(&self, variable: NewVariable) -> OrchestratorResult<Variable> {
        variable.validate()?;

        let stored = variable.clone();
        let id = self.db.call(move |conn| insert_variable(conn, &stored)).await?;

        component_info!(Component::Catalog, "Registered variable '{}' ({}) as id {}", variable.name, variable.kind, id);
        Ok(variable.into_variable(id))
    }

    async fn seed_if_empty(&self, fixtures: Vec<NewVariable>) -> OrchestratorResult<usize> {
        for fixture in &fixtures {
            fixture.validate()?;
        }

        let inserted = self
            .db
            .call(move |conn| {
                let existing: i64 = conn.query_row("SELECT COUNT(*) FROM variables", [], |row| row.get(0))?;
                if existing > 0 {
                    return Ok(0);
                }

                // Dropping the transaction on error rolls the whole batch back
                let tx = conn.transaction()?;
                for fixture in &fixtures {
                    insert_variable(&tx, fixture)?;
                }
                tx.commit()?;
                Ok(fixtures.len())
            })
            .await?;

        if inserted > 0 {
            component_info!(Component::Catalog, "Seeded {} variables into empty catalog", inserted);
        } else {
            component_debug!(Component::Catalog, "Catalog already populated, skipping seed");
        }
        Ok(inserted)
    }
}
