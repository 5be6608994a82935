//! Typed error enum for issue API calls.

use thiserror::Error;

use crate::errors::{AppError, ErrorBody, ErrorDetail, ValidationIssue};

/// Errors from issue API operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found: {}", .message.as_deref().unwrap_or("no detail"))]
    NotFound { message: Option<String> },
    #[error("validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<ValidationIssue>),
    #[error("HTTP status {status}: {}", .message.as_deref().unwrap_or("no detail"))]
    Api { status: u16, message: Option<String> },
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("JSON parse error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Classify a non-success response by status code and `{"detail": ...}` body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.detail);
        match (status, detail) {
            (422, Some(ErrorDetail::Validation(issues))) => ClientError::ValidationFailed(issues),
            (404, Some(ErrorDetail::Message(message))) => ClientError::NotFound {
                message: Some(message),
            },
            (404, _) => ClientError::NotFound { message: None },
            (status, Some(ErrorDetail::Message(message))) => ClientError::Api {
                status,
                message: Some(message),
            },
            (status, _) => ClientError::Api {
                status,
                message: None,
            },
        }
    }

    /// The server's human-readable message, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::NotFound { message } | ClientError::Api { message, .. } => {
                message.as_deref().filter(|m| !m.is_empty())
            }
            _ => None,
        }
    }

    /// Banner text: the server's message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        let status = err.status_code().as_u16();
        match err.detail() {
            ErrorDetail::Validation(issues) => ClientError::ValidationFailed(issues),
            ErrorDetail::Message(message) if status == 404 => ClientError::NotFound {
                message: Some(message),
            },
            ErrorDetail::Message(message) => ClientError::Api {
                status,
                message: Some(message),
            },
        }
    }
}
