//! Unified error handling with the API's `{"detail": ...}` error envelope.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// One segment of a validation error location, e.g. `["body", "title"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocPart {
    Key(String),
    Index(u64),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub loc: Vec<LocPart>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ValidationIssue {
    pub fn body(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self::at("body", field, msg, kind)
    }

    pub fn query(field: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self::at("query", field, msg, kind)
    }

    fn at(source: &str, field: &str, msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec![LocPart::Key(source.to_string()), LocPart::Key(field.to_string())],
            msg: msg.into(),
            kind: kind.to_string(),
        }
    }

    /// Field name the issue refers to: the second location segment.
    pub fn field(&self) -> Option<&str> {
        match self.loc.get(1) {
            Some(LocPart::Key(name)) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Error payload: a plain message or a list of validation issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

/// Consistent JSON envelope for all API error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<ValidationIssue>),
}

impl AppError {
    /// Not-found error for an issue id, worded the way the API reports it.
    pub fn issue_not_found(id: i64) -> Self {
        Self::NotFound(format!("Issue with id {id} not found"))
    }

    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// The `detail` payload sent to clients.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => {
                ErrorDetail::Message(msg.clone())
            }
            AppError::Validation(issues) => ErrorDetail::Validation(issues.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![ValidationIssue {
            loc: vec![LocPart::Key("body".to_string())],
            msg: rejection.body_text(),
            kind: "json_invalid".to_string(),
        }])
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(vec![ValidationIssue {
            loc: vec![LocPart::Key("query".to_string())],
            msg: rejection.body_text(),
            kind: "query_invalid".to_string(),
        }])
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected issue id");
        AppError::Validation(vec![ValidationIssue {
            loc: vec![
                LocPart::Key("path".to_string()),
                LocPart::Key("issue_id".to_string()),
            ],
            msg: "Input should be a valid integer, unable to parse string as an integer".to_string(),
            kind: "int_parsing".to_string(),
        }])
    }
}
