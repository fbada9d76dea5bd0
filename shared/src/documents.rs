//! Document fields embedded in optimization runs
//!
//! Runs carry four JSON documents that are persisted as text next to the
//! relational columns. Their shape varies per experiment, so reads decode
//! them into the known shape where possible and keep the original text
//! otherwise. A malformed document is never an error on the read path.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use crate::errors::{SharedError, SharedResult};

/// X-variable name to the value it was set to. Values keep their JSON
/// number form, so `100` is written back as `100`, not `100.0`.
pub type InputAssignment = BTreeMap<String, Number>;

/// X-variable name to its normalized weight
pub type FeatureImportance = BTreeMap<String, Number>;

/// Free-form run parameters (algorithm hyperparameters, optimal settings)
pub type RunParameters = Map<String, Value>;

/// Result produced by an optimize call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionResult {
    pub predicted_value: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Number>,
}

impl PredictionResult {
    pub fn new(predicted_value: Number) -> Self {
        Self {
            predicted_value,
            confidence: None,
        }
    }

    /// `None` for NaN or infinite values, which JSON cannot carry
    pub fn from_f64(predicted_value: f64) -> Option<Self> {
        Number::from_f64(predicted_value).map(Self::new)
    }
}

/// Result document: the optimize shape when it matches exactly, any object otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultDocument {
    Prediction(PredictionResult),
    Other(Map<String, Value>),
}

impl Default for ResultDocument {
    fn default() -> Self {
        ResultDocument::Other(Map::new())
    }
}

impl ResultDocument {
    pub fn predicted_value(&self) -> Option<f64> {
        match self {
            ResultDocument::Prediction(prediction) => prediction.predicted_value.as_f64(),
            ResultDocument::Other(map) => map.get("predicted_value").and_then(Value::as_f64),
        }
    }
}

/// A stored document, decoded or kept as the text it was stored with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document<T> {
    Parsed(T),
    Raw(String),
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Serialize a document for storage
    pub fn encode(value: &T) -> SharedResult<String> {
        serde_json::to_string(value).map_err(|e| SharedError::DocumentEncoding { message: e.to_string() })
    }

    /// Text to store for an optional document, substituting the empty document
    pub fn text_or_empty(document: Option<&Self>) -> SharedResult<String> {
        match document {
            Some(document) => document.to_text(),
            None => Self::encode(&T::default()),
        }
    }

    /// Read a JSON value received over the wire. A value that does not fit
    /// `T` is kept as its JSON text.
    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => Document::Parsed(parsed),
            Err(_) => Document::Raw(value.to_string()),
        }
    }

    /// Decode stored text. Missing or blank text is the empty document;
    /// text that does not fit `T` is returned raw.
    pub fn decode(text: Option<&str>) -> Self {
        match text {
            None => Document::Parsed(T::default()),
            Some(s) if s.trim().is_empty() => Document::Parsed(T::default()),
            Some(s) => match serde_json::from_str::<T>(s) {
                Ok(value) => Document::Parsed(value),
                Err(_) => Document::Raw(s.to_string()),
            },
        }
    }

    pub fn parsed(&self) -> Option<&T> {
        match self {
            Document::Parsed(value) => Some(value),
            Document::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Document::Raw(_))
    }

    /// Text form: re-encoded when parsed, verbatim when raw
    pub fn to_text(&self) -> SharedResult<String> {
        match self {
            Document::Parsed(value) => Self::encode(value),
            Document::Raw(text) => Ok(text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encoded_text_survives_decode() {
        let mut assignment = InputAssignment::new();
        assignment.insert("温度".to_string(), Number::from_f64(120.5).unwrap());
        assignment.insert("圧力".to_string(), Number::from(5));
        let text = Document::encode(&assignment).unwrap();

        let decoded = Document::<InputAssignment>::decode(Some(&text));
        assert_eq!(decoded.parsed(), Some(&assignment));
        assert_eq!(decoded.to_text().unwrap(), text);
    }

    #[test]
    fn test_client_documents_are_written_back_unchanged() {
        for text in [r#"{"温度":100}"#, r#"{"圧力":5.0,"温度":100}"#, r#"{"触媒量":0.25}"#] {
            let decoded = Document::<InputAssignment>::decode(Some(text));
            assert!(!decoded.is_raw(), "{text} should decode");
            assert_eq!(decoded.to_text().unwrap(), text);
        }

        let importance = Document::<FeatureImportance>::decode(Some(r#"{"温度":1}"#));
        assert_eq!(importance.to_text().unwrap(), r#"{"温度":1}"#);

        let result = Document::<ResultDocument>::decode(Some(r#"{"predicted_value":85}"#));
        assert!(matches!(result.parsed(), Some(ResultDocument::Prediction(_))));
        assert_eq!(result.to_text().unwrap(), r#"{"predicted_value":85}"#);
    }

    #[test]
    fn test_wire_values_that_do_not_fit_are_kept_as_json_text() {
        let value = json!({"温度": 0.7, "圧力": null});
        let document = Document::<FeatureImportance>::from_value(&value);
        assert!(document.is_raw());
        assert_eq!(serde_json::from_str::<Value>(&document.to_text().unwrap()).unwrap(), value);

        let fits = Document::<FeatureImportance>::from_value(&json!({"温度": 0.7}));
        assert!(!fits.is_raw());
    }

    #[test]
    fn test_free_form_parameters_keep_their_values() {
        let text = r#"{"grid_points":10,"method":"grid","weights":[0.1,0.2]}"#;
        let decoded = Document::<RunParameters>::decode(Some(text));
        assert!(!decoded.is_raw());
        assert_eq!(decoded.to_text().unwrap(), text);
    }

    #[test]
    fn test_malformed_text_is_kept_raw() {
        let decoded = Document::<InputAssignment>::decode(Some("{not json"));
        assert_eq!(decoded, Document::Raw("{not json".to_string()));
        assert_eq!(decoded.to_text().unwrap(), "{not json");

        // Valid JSON of the wrong shape is also kept as stored
        let wrong_shape = Document::<InputAssignment>::decode(Some(r#"{"温度":"hot"}"#));
        assert!(wrong_shape.is_raw());
    }

    #[test]
    fn test_missing_text_is_empty_document() {
        assert_eq!(Document::<InputAssignment>::decode(None), Document::Parsed(InputAssignment::new()));
        assert_eq!(Document::<InputAssignment>::decode(Some("  ")), Document::Parsed(InputAssignment::new()));
        assert_eq!(Document::<InputAssignment>::text_or_empty(None).unwrap(), "{}");
        assert_eq!(Document::<ResultDocument>::text_or_empty(None).unwrap(), "{}");

        let raw = Document::<InputAssignment>::Raw("{legacy".to_string());
        assert_eq!(Document::text_or_empty(Some(&raw)).unwrap(), "{legacy");
    }

    #[test]
    fn test_result_document_recognizes_prediction_shape() {
        let decoded = Document::<ResultDocument>::decode(Some(r#"{"predicted_value":85.6}"#));
        assert_eq!(
            decoded,
            Document::Parsed(ResultDocument::Prediction(PredictionResult::from_f64(85.6).unwrap()))
        );
        assert_eq!(decoded.to_text().unwrap(), r#"{"predicted_value":85.6}"#);
    }

    #[test]
    fn test_result_document_keeps_extra_fields() {
        let text = r#"{"note":"manual","predicted_value":70.0}"#;
        let decoded = Document::<ResultDocument>::decode(Some(text));
        match decoded.parsed() {
            Some(ResultDocument::Other(map)) => assert_eq!(map.get("note"), Some(&json!("manual"))),
            other => panic!("expected free-form result, got {other:?}"),
        }
        assert_eq!(decoded.parsed().unwrap().predicted_value(), Some(70.0));
        assert_eq!(decoded.to_text().unwrap(), text);
    }

    #[test]
    fn test_documents_serialize_untagged() {
        let parsed: Document<InputAssignment> = Document::Parsed(InputAssignment::new());
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!({}));

        let raw: Document<InputAssignment> = Document::Raw("legacy".to_string());
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!("legacy"));
    }
}
