use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use photo_restore::RestoreError;
use serde_json::json;
use thiserror::Error;

/// Message shown when an upload cannot be decoded as an image.
pub const UNREADABLE_IMAGE: &str = "Unable to read image. Please upload a valid image file.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required form field: {0}")]
    MissingField(&'static str),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Restoration failed: {0}")]
    Restore(#[from] RestoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingField(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ApiError::Process(ProcessError::Decode(_)) => {
                (StatusCode::BAD_REQUEST, UNREADABLE_IMAGE.to_string())
            }
            ApiError::Process(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Template(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}
