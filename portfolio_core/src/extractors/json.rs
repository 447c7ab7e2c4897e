//! JSON body extractor whose rejections use the API error envelope

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::models::ApiResponse;

pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiJsonRejection::from(rejection)),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApiJsonRejection {
    MissingContentType,
    Syntax,
    Data(String),
    Body,
}

impl From<JsonRejection> for ApiJsonRejection {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiJsonRejection::MissingContentType,
            JsonRejection::JsonSyntaxError(_) => ApiJsonRejection::Syntax,
            JsonRejection::JsonDataError(err) => ApiJsonRejection::Data(err.body_text()),
            _ => ApiJsonRejection::Body,
        }
    }
}

impl IntoResponse for ApiJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiJsonRejection::MissingContentType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Expected a request with Content-Type: application/json".to_string(),
            ),
            ApiJsonRejection::Syntax => (StatusCode::BAD_REQUEST, "Invalid JSON format".to_string()),
            ApiJsonRejection::Data(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiJsonRejection::Body => (
                StatusCode::BAD_REQUEST,
                "Failed to read request body".to_string(),
            ),
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl std::fmt::Display for ApiJsonRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiJsonRejection::MissingContentType => write!(f, "Missing JSON content type"),
            ApiJsonRejection::Syntax => write!(f, "Invalid JSON"),
            ApiJsonRejection::Data(msg) => write!(f, "Invalid JSON data: {}", msg),
            ApiJsonRejection::Body => write!(f, "Unreadable request body"),
        }
    }
}

impl std::error::Error for ApiJsonRejection {}
