//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::schema::ValidationErrors;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Validation(errors) => {
                let fields: Vec<serde_json::Value> = errors
                    .errors
                    .iter()
                    .map(|e| json!({"field": e.field, "error": e.kind.to_string()}))
                    .collect();
                let body = Json(json!({
                    "error": true,
                    "message": "Request validation failed",
                    "fields": fields,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            ServerError::Model(detail) => {
                tracing::error!(detail = %detail, "Model invocation error");
                opaque_500()
            }
            ServerError::Storage(detail) => {
                tracing::error!(detail = %detail, "Storage error");
                opaque_500()
            }
            ServerError::Unavailable(message) => {
                tracing::error!(detail = %message, "Readiness check failed");
                let body = Json(json!({
                    "error": true,
                    "message": message,
                }));
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
        }
    }
}

// 5xx responses never leak internals; detail goes to the log only.
fn opaque_500() -> Response {
    let body = Json(json!({
        "error": true,
        "message": "An internal error occurred",
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

pub type Result<T> = std::result::Result<T, ServerError>;
