//! Mapping from storage outcomes to HTTP responses.
//!
//! This is the only place where error kinds turn into status codes. Every error response
//! carries a JSON `{ "error": ... }` body.

use api_shared::ErrorRes;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use filestore_core::FilesError;

/// Storage operation an error came from; used to phrase server errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Read,
    Delete,
}

impl Operation {
    fn failure_prefix(self) -> &'static str {
        match self {
            Operation::List => "Failed to list files",
            Operation::Create => "Failed to create file",
            Operation::Read => "Failed to read file",
            Operation::Delete => "Failed to delete file",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
    /// Extractor rejection, keeping the status axum chose for it.
    Rejected(StatusCode, String),
}

impl ApiError {
    /// Classifies a storage error for the given operation, logging server-side failures.
    pub fn from_files(op: Operation, err: FilesError) -> Self {
        match err {
            FilesError::MissingField => ApiError::BadRequest("Filename is required".into()),
            FilesError::InvalidName(_) => ApiError::BadRequest("Invalid filename".into()),
            FilesError::NotFound(name) => {
                ApiError::NotFound(format!("File \"{}\" not found", name))
            }
            FilesError::NotText(_) => ApiError::BadRequest(
                "File contains binary data and cannot be displayed as text".into(),
            ),
            FilesError::StorageFailure(detail) | FilesError::InvalidConfig(detail) => {
                tracing::error!("{}: {}", op.failure_prefix(), detail);
                ApiError::Internal(format!("{}: {}", op.failure_prefix(), detail))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected(status, _) => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg)
            | ApiError::Rejected(_, msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorRes {
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}
