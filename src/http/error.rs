use crate::error::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Storage { .. } | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Error::Validation(message) | Error::NotFound(message) | Error::Unauthorized(message) => {
                ErrorResponse {
                    error: message,
                    details: None,
                }
            }
            Error::Storage { message, details } => {
                error!("{}: {}", message, details);
                ErrorResponse {
                    error: message,
                    details: Some(details),
                }
            }
            Error::Internal(e) => {
                error!("Internal error: {:#}", e);
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    details: Some(e.to_string()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
