//! Error types for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the retrieval step
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    /// Transport failure or an error reported by the search backend
    #[error("search backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The search backend answered but returned no rows at all
    #[error("did not find anything in the search backend")]
    NoData,
}

/// A failed read from the completion backend's event stream.
///
/// Never surfaced to the caller; the relay converts it into a clean
/// stream termination.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The underlying HTTP body failed mid-stream
    #[error("stream transport error: {0}")]
    Transport(String),

    /// A `data:` payload that is not a completion chunk
    #[error("malformed stream chunk: {0}")]
    Malformed(String),
}

/// Gateway errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The inbound chat request is unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Retrieval failed
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// The completion backend answered with a non-success status
    #[error("Completion backend returned HTTP {status}: {body}")]
    CompletionBackend { status: u16, body: String },

    /// The completion backend could not be reached
    #[error("Completion backend error: {0}")]
    Completion(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a completion transport error
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Config(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidRequest(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Retrieval(_)
            | Error::CompletionBackend { .. }
            | Error::Completion(_)
            | Error::Http(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Retrieval(RetrievalError::BackendUnavailable(_)) => "retrieval_unavailable",
            Error::Retrieval(RetrievalError::NoData) => "retrieval_no_data",
            Error::CompletionBackend { .. } => "completion_backend_error",
            Error::Completion(_) => "completion_error",
            Error::Json(_) => "json_error",
            Error::Http(_) => "http_error",
            Error::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut error = json!({
            "type": self.error_type(),
            "message": self.to_string(),
        });

        // Attach the backend payload as JSON when it parses, raw text otherwise
        if let Error::CompletionBackend { status, body } = &self {
            let payload = serde_json::from_str::<Value>(body)
                .unwrap_or_else(|_| Value::String(body.clone()));
            error["backend_status"] = json!(status);
            error["backend_error"] = payload;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
