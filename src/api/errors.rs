use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::{error, warn};

use super::models::ErrorResponse;
use crate::errors::{LadderError, ValidationError};

/// Error returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        warn!("Rejected request: {}", err);
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }
}

impl From<LadderError> for ApiError {
    fn from(err: LadderError) -> Self {
        match err {
            LadderError::Validation(e) => e.into(),
            LadderError::PlayerNotFound(id) => Self::not_found(format!("Player {} not found", id)),
            LadderError::Storage(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("Storage error: {:#}", err);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal storage error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation: ApiError = LadderError::from(ValidationError::SelfPlay).into();
        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing: ApiError = LadderError::PlayerNotFound(9).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let storage: ApiError = LadderError::Storage(anyhow::anyhow!("disk I/O error")).into();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.message, "Internal storage error");
    }
}
