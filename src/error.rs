use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::quiz::DocumentError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid quiz: {0}")]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of a call to the generative service, including the input
/// checks that run before the call is made.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("generation service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("generation service returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("generated quiz violates the document contract: {0}")]
    ContractViolation(#[from] DocumentError),
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("quiz storage unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::ServiceUnavailable(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, json!(msg)),
            Error::Conflict(msg) => (StatusCode::CONFLICT, json!(msg)),
            Error::Validation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, json!(errors)),
            Error::Document(err) => (StatusCode::UNPROCESSABLE_ENTITY, json!(err.to_string())),
            Error::Generation(GenerationError::EmptyTopic) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "topic": ["topic must not be empty"] }),
            ),
            Error::Generation(err) => {
                tracing::warn!(error = %err, "Generation request failed");
                (
                    StatusCode::BAD_REQUEST,
                    json!("Failed to generate content, please try again"),
                )
            }
            Error::Publish(err) => {
                tracing::error!(error = %err, "Publishing quiz failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("Failed to save quiz, please try again"),
                )
            }
            Error::Json(err) => (StatusCode::BAD_REQUEST, json!(err.to_string())),
            Error::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("An unexpected error occurred"),
                )
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("An unexpected error occurred"),
                )
            }
            Error::MalformedBody(msg) => (StatusCode::UNPROCESSABLE_ENTITY, json!({ "body": [msg] })),
            Error::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("An unexpected error occurred"),
                )
            }
        };

        let body = Json(json!({ "error": body }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::MalformedBody(rejection.body_text())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
