//! API error responses

use crate::domain::shared::DomainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid data format")]
    InvalidDataFormat,

    #[error("Invalid count parameter")]
    InvalidCount,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidDataFormat => "INVALID_DATA_FORMAT",
            ApiError::InvalidCount => "INVALID_COUNT",
            ApiError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidDataFormat | ApiError::InvalidCount => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(_) => ApiError::InvalidDataFormat,
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Storage(detail) => {
                tracing::error!("Storage error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        (self.status(), body).into_response()
    }
}
