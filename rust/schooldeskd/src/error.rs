use serde_json::json;
use thiserror::Error;

/// Failures raised by the query engine. Page overflow is never an error: it is clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("unknown sort key for {entity}: {key}")]
    UnknownSortKey {
        entity: &'static str,
        key: String,
        allowed: Vec<&'static str>,
    },

    #[error("unknown filter field for {entity}: {field}")]
    UnknownFilterField {
        entity: &'static str,
        field: String,
        allowed: Vec<&'static str>,
    },

    #[error("unknown value for filter {field}: {value}")]
    UnknownFilterValue {
        field: String,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    BadParams(String),
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NotFound { .. } => "not_found",
            _ => "bad_params",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            EngineError::UnknownSortKey { key, allowed, .. } => Some(json!({
                "sortBy": key,
                "allowed": allowed,
            })),
            EngineError::UnknownFilterField { field, allowed, .. } => Some(json!({
                "field": field,
                "allowed": allowed,
            })),
            EngineError::UnknownFilterValue {
                field,
                value,
                allowed,
            } => Some(json!({
                "field": field,
                "value": value,
                "allowed": allowed,
            })),
            EngineError::NotFound { id, .. } => Some(json!({ "id": id })),
            EngineError::BadParams(_) => None,
        }
    }
}
