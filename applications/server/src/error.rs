/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] RosterError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Store(e) => match e {
                RosterError::NotFound { .. } => StatusCode::NOT_FOUND,
                RosterError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                RosterError::ConstraintViolation(_) => StatusCode::CONFLICT,
                RosterError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RosterError::Migration(_) | RosterError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ServerError::NotFound(msg) => msg,
            ServerError::Store(ref e) => match e {
                RosterError::NotFound { .. }
                | RosterError::InvalidInput(_)
                | RosterError::ConstraintViolation(_) => e.to_string(),
                RosterError::Unavailable(_) => {
                    tracing::error!("Store unavailable: {:?}", e);
                    "Store unavailable".to_string()
                }
                RosterError::Migration(_) | RosterError::Database(_) => {
                    tracing::error!("Database error: {:?}", e);
                    "Database error".to_string()
                }
            },
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
