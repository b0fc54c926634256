//! Error types for mediscribe.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Lookup failures
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // Request validation
    #[error("No valid fields to update")]
    NoValidFields,

    #[error("{0}")]
    Validation(String),

    // Upstream failures
    #[error("Blob upload failed: {0}")]
    Storage(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Transcription did not complete after {attempts} status checks")]
    TranscriptionTimeout { attempts: u32 },

    #[error("Report generation failed: {0}")]
    SummarizationFailed(String),

    #[error("Report rendering failed: {0}")]
    Render(String),

    // Persistence
    #[error("Document store error: {0}")]
    Store(String),

    // Caller went away or the service is shutting down
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::RoomNotFound(_) | Error::UserNotFound(_) => StatusCode::NOT_FOUND,
            Error::NoValidFields | Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mongodb::error::Error> for Error {
    fn from(err: mongodb::error::Error) -> Self {
        Error::Store(err.to_string())
    }
}

/// JSON error body returned to HTTP callers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
