//! Central error type + Axum integration.
//!
//! Every expected failure is mapped here at the gateway boundary;
//! anything unexpected becomes `Internal` and reaches the client only
//! as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or malformed. The message is scoped
    /// to a single field.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Email or username exists")]
    DuplicateCredential,

    /// Unknown username and wrong password surface identically so the
    /// response cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Not found")]
    NotFound,

    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::DuplicateCredential
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(ref e) => tracing::error!(error = %e, "internal error"),
            AppError::Validation { field, ref message } => {
                tracing::warn!(field, message = %message, "validation failed")
            }
            _ => {}
        }

        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
