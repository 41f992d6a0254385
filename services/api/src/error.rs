use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kpix_common::error::KpixError;

pub struct ApiError(pub KpixError);

impl From<KpixError> for ApiError {
    fn from(err: KpixError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            KpixError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            KpixError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
