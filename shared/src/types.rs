//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::documents::{Document, FeatureImportance, InputAssignment, ResultDocument, RunParameters};
use crate::errors::{SharedError, SharedResult};

/// Generated identifier of a catalog variable
pub type VariableId = i64;

/// Generated identifier of an optimization run
pub type RunId = i64;

/// Component tag attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Catalog,
    RunStore,
    Gateway,
    Api,
    Server,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Catalog => write!(f, "catalog"),
            Component::RunStore => write!(f, "run_store"),
            Component::Gateway => write!(f, "gateway"),
            Component::Api => write!(f, "api"),
            Component::Server => write!(f, "server"),
        }
    }
}

/// Role of a process variable: the optimization objective (Y) or a controllable input (X)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    #[serde(rename = "Y")]
    Output,
    #[serde(rename = "X")]
    Input,
}

impl VariableKind {
    /// Case-insensitive match against the two tags; anything else is `None`
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            k if k.eq_ignore_ascii_case("y") => Some(Self::Output),
            k if k.eq_ignore_ascii_case("x") => Some(Self::Input),
            _ => None,
        }
    }

    /// Tag as stored in the catalog table
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Output => "Y",
            Self::Input => "X",
        }
    }

    pub fn from_tag(tag: &str) -> SharedResult<Self> {
        Self::parse(tag).ok_or_else(|| SharedError::UnknownVariableKind {
            input: tag.to_string(),
        })
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Stored process variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub default_value: Option<f64>,
}

/// Variable definition before insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub default_value: Option<f64>,
}

impl NewVariable {
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            unit: None,
            min_value: None,
            max_value: None,
            default_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default_value = Some(default);
        self
    }

    /// Check name and `min <= default <= max` over whichever bounds are present
    pub fn validate(&self) -> SharedResult<()> {
        if self.name.trim().is_empty() {
            return Err(SharedError::invalid_variable("name", "must not be empty"));
        }

        for (field, value) in [
            ("min_value", self.min_value),
            ("max_value", self.max_value),
            ("default_value", self.default_value),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(SharedError::invalid_variable(field, format!("{v} is not a finite number")));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(SharedError::invalid_variable(
                    "min_value",
                    format!("{min} is greater than max_value {max}"),
                ));
            }
        }
        if let (Some(min), Some(default)) = (self.min_value, self.default_value) {
            if default < min {
                return Err(SharedError::invalid_variable(
                    "default_value",
                    format!("{default} is below min_value {min}"),
                ));
            }
        }
        if let (Some(max), Some(default)) = (self.max_value, self.default_value) {
            if default > max {
                return Err(SharedError::invalid_variable(
                    "default_value",
                    format!("{default} is above max_value {max}"),
                ));
            }
        }

        Ok(())
    }

    pub fn into_variable(self, id: VariableId) -> Variable {
        Variable {
            id,
            name: self.name,
            kind: self.kind,
            description: self.description,
            unit: self.unit,
            min_value: self.min_value,
            max_value: self.max_value,
            default_value: self.default_value,
        }
    }
}

/// Run record before insertion. Absent documents are stored as `{}`;
/// raw documents are stored as their text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRun {
    pub y_variable_id: VariableId,
    pub x_variables: Option<Document<InputAssignment>>,
    pub parameters: Option<Document<RunParameters>>,
    pub result: Option<Document<ResultDocument>>,
    pub score: Option<f64>,
    pub feature_importance: Option<Document<FeatureImportance>>,
}

impl NewRun {
    pub fn for_variable(y_variable_id: VariableId) -> Self {
        Self {
            y_variable_id,
            ..Default::default()
        }
    }
}

/// Stored run joined to its target variable, documents decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRun {
    pub id: RunId,
    pub created_at: String,
    pub y_variable_id: Option<VariableId>,
    pub y_variable_name: Option<String>,
    pub x_variables: Document<InputAssignment>,
    pub parameters: Document<RunParameters>,
    pub result: Document<ResultDocument>,
    pub score: Option<f64>,
    pub feature_importance: Document<FeatureImportance>,
}
