//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::contact::ContactError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Invalid(msg) => AppError::BadRequest(msg),
            ContactError::Store(err) => AppError::Store(err),
        }
    }
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Authentication(err) => (StatusCode::UNAUTHORIZED, err.code().to_string()),
            AppError::Store(StoreError::PermissionDenied) => {
                (StatusCode::FORBIDDEN, "Permission denied".to_string())
            }
            AppError::Store(StoreError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("Message {} not found", id))
            }
            AppError::Store(err) => {
                tracing::error!("Store error: {}", err);
                (StatusCode::BAD_GATEWAY, "Message store unavailable".to_string())
            }
            AppError::WebSocket(msg) => {
                tracing::error!("WebSocket error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "WebSocket error".to_string())
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthErrorCode;
    use crate::models::MessageId;

    #[test]
    fn store_errors_map_to_gateway_statuses() {
        let (status, _) = AppError::Store(StoreError::PermissionDenied).status_and_message();
        assert_eq!(status, StatusCode::FORBIDDEN);

        let id = MessageId::parse("-Nabc").unwrap();
        let (status, message) = AppError::Store(StoreError::NotFound(id)).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(message.contains("-Nabc"));

        let (status, _) = AppError::Store(StoreError::Closed).status_and_message();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_submission_is_a_bad_request() {
        let err: AppError = ContactError::Invalid("name is required".to_string()).into();
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "name is required");
    }

    #[test]
    fn auth_errors_expose_only_the_code() {
        let err = AppError::from(AuthError::new(AuthErrorCode::WrongPassword, "password mismatch"));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "auth/wrong-password");
    }
}
