use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::error::ApiError;

/// The `image` part of an upload form.
#[derive(Debug)]
pub struct UploadedImage {
    /// File name as sent by the client (not yet sanitized)
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Fields of the enhance form.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// `None` when the part is missing or has an empty file name
    pub image: Option<UploadedImage>,
    pub mode: Option<String>,
}

/// Collect the `image` and `mode` parts; other parts are ignored.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if file_name.is_empty() {
                    tracing::debug!("Image part without file name ignored");
                    continue;
                }
                form.image = Some(UploadedImage {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            Some("mode") => {
                let mode = field.text().await.map_err(multipart_error)?;
                form.mode = Some(mode);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unexpected form field");
            }
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(e.body_text())
    }
}
