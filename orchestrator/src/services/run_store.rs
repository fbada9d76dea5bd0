//! SQLite-backed run store
//!
//! Runs keep their four documents as JSON text. Writes encode them here and
//! reads decode them here; nothing else in the service touches the text.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{params, Row};
use shared::{
    component_debug, component_warn, Component, Document, EnrichedRun, FeatureImportance, InputAssignment, NewRun,
    ResultDocument, RunId, RunParameters, VariableId,
};

use crate::error::OrchestratorResult;
use crate::services::database::Database;
use crate::traits::RunStore;

/// Run row as stored, documents still encoded. Columns are read by their
/// stored type, so a legacy row of unexpected types is still listed.
struct StoredRun {
    id: RunId,
    created_at: String,
    y_variable_id: Option<VariableId>,
    y_variable_name: Option<String>,
    x_variables: Option<String>,
    parameters: Option<String>,
    result: Option<String>,
    score: Option<f64>,
    feature_importance: Option<String>,
    /// Columns whose stored value could not be used
    unreadable: Vec<&'static str>,
}

/// Document column as text: blobs are read as UTF-8, numbers as their literal
fn column_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
    }
}

fn column_number(value: ValueRef<'_>) -> Result<Option<f64>, ()> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i as f64)),
        ValueRef::Real(f) => Ok(Some(f)),
        ValueRef::Text(_) | ValueRef::Blob(_) => Err(()),
    }
}

impl StoredRun {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut unreadable = Vec::new();

        let y_variable_id = match row.get_ref(2)? {
            ValueRef::Integer(id) => Some(id),
            ValueRef::Null => None,
            _ => {
                unreadable.push("y_variable_id");
                None
            }
        };
        let score = column_number(row.get_ref(7)?).unwrap_or_else(|()| {
            unreadable.push("score");
            None
        });

        Ok(Self {
            id: row.get(0)?,
            created_at: column_text(row.get_ref(1)?).unwrap_or_default(),
            y_variable_id,
            y_variable_name: column_text(row.get_ref(3)?),
            x_variables: column_text(row.get_ref(4)?),
            parameters: column_text(row.get_ref(5)?),
            result: column_text(row.get_ref(6)?),
            score,
            feature_importance: column_text(row.get_ref(8)?),
            unreadable,
        })
    }

    fn decode(self) -> EnrichedRun {
        if !self.unreadable.is_empty() {
            component_warn!(
                Component::RunStore,
                "Run {} has unreadable columns {:?}, listing them as null",
                self.id,
                self.unreadable
            );
        }

        let run = EnrichedRun {
            id: self.id,
            created_at: self.created_at,
            y_variable_id: self.y_variable_id,
            y_variable_name: self.y_variable_name,
            x_variables: Document::<InputAssignment>::decode(self.x_variables.as_deref()),
            parameters: Document::<RunParameters>::decode(self.parameters.as_deref()),
            result: Document::<ResultDocument>::decode(self.result.as_deref()),
            score: self.score,
            feature_importance: Document::<FeatureImportance>::decode(self.feature_importance.as_deref()),
        };

        let raw_fields: Vec<&str> = [
            ("x_variables", run.x_variables.is_raw()),
            ("parameters", run.parameters.is_raw()),
            ("result", run.result.is_raw()),
            ("feature_importance", run.feature_importance.is_raw()),
        ]
        .into_iter()
        .filter_map(|(field, raw)| raw.then_some(field))
        .collect();

        if !raw_fields.is_empty() {
            component_warn!(
                Component::RunStore,
                "Run {} has undecodable documents {:?}, returning stored text",
                run.id,
                raw_fields
            );
        }
        run
    }
}

/// Run store over the `optimization_runs` table
#[derive(Clone)]
pub struct SqliteRunStore {
    db: Database,
}

impl SqliteRunStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RunStore for SqliteRunStore {
    async fn insert(&self, run: NewRun) -> OrchestratorResult<RunId> {
        let x_variables = Document::text_or_empty(run.x_variables.as_ref())?;
        let parameters = Document::text_or_empty(run.parameters.as_ref())?;
        let result = Document::text_or_empty(run.result.as_ref())?;
        let feature_importance = Document::text_or_empty(run.feature_importance.as_ref())?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let y_variable_id = run.y_variable_id;
        let score = run.score;

        let id = self
            .db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO optimization_runs
                        (created_at, y_variable_id, x_variables, parameters, result, score, feature_importance)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![created_at, y_variable_id, x_variables, parameters, result, score, feature_importance],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        component_debug!(Component::RunStore, "Stored run {} targeting variable {}", id, y_variable_id);
        Ok(id)
    }

    async fn list_all(&self) -> OrchestratorResult<Vec<EnrichedRun>> {
        let rows = self
            .db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT r.id, r.created_at, r.y_variable_id, v.name,
                            r.x_variables, r.parameters, r.result, r.score, r.feature_importance
                     FROM optimization_runs r
                     LEFT JOIN variables v ON r.y_variable_id = v.id
                     ORDER BY r.created_at DESC, r.id DESC",
                )?;
                let rows = stmt.query_map([], StoredRun::from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;

        Ok(rows.into_iter().map(StoredRun::decode).collect())
    }
}
