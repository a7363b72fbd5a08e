use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::upload::read_upload_form;
use crate::error::{ApiError, ProcessError, UNREADABLE_IMAGE};
use crate::services::{PageRenderer, PageView, RestoreService, ResultStore};

/// Query parameters for the JSON-free enhance API
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnhanceQuery {
    /// Mode tag: `low_light`, `fog` or `smoke`. Anything else returns the
    /// image unchanged.
    pub mode: Option<String>,
}

/// Multipart body accepted by the enhance endpoints
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct EnhanceUpload {
    /// Image file (PNG, JPEG, BMP, GIF, TIFF or WebP)
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// Enhance an image and return the result as PNG
///
/// The `image` part must carry a file name. Unknown or missing modes pass
/// the decoded image through unchanged.
#[utoipa::path(
    post,
    path = "/api/enhance",
    request_body(content = EnhanceUpload, content_type = "multipart/form-data"),
    params(EnhanceQuery),
    responses(
        (status = 200, description = "Processed image", body = String, content_type = "image/png"),
        (status = 400, description = "Missing image part or undecodable image"),
        (status = 413, description = "Upload larger than the configured limit"),
    ),
    tag = "Enhance"
)]
pub async fn handle_enhance_api(
    State(restore_service): State<Arc<RestoreService>>,
    Query(query): Query<EnhanceQuery>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_upload_form(multipart).await?;
    let image = form.image.ok_or(ApiError::MissingField("image"))?;
    let mode = query.mode.unwrap_or_default();

    tracing::info!(
        file = %image.file_name,
        bytes = image.bytes.len(),
        mode = %mode,
        "API enhance request"
    );

    let restored = restore_service.restore_bytes(image.bytes, mode).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        restored.png,
    )
        .into_response())
}

/// Form submission from the upload page.
///
/// Missing image part or empty file name redirects back to the form.
pub async fn handle_enhance_form(
    State(restore_service): State<Arc<RestoreService>>,
    State(result_store): State<Arc<ResultStore>>,
    State(pages): State<Arc<PageRenderer>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_upload_form(multipart).await?;
    let Some(image) = form.image else {
        return Ok(Redirect::to("/").into_response());
    };
    let mode = form.mode.unwrap_or_default();

    tracing::info!(
        file = %image.file_name,
        bytes = image.bytes.len(),
        mode = %mode,
        "Form enhance request"
    );

    let original = result_store
        .save_upload(&image.file_name, &image.bytes)
        .await
        .map_err(ProcessError::from)?;

    let restored = match restore_service.restore_bytes(image.bytes, mode.clone()).await {
        Ok(restored) => restored,
        Err(ApiError::Process(ProcessError::Decode(e))) => {
            tracing::warn!(
                %e,
                file = %original.path.display(),
                "Uploaded file is not a readable image"
            );
            return Ok((StatusCode::BAD_REQUEST, UNREADABLE_IMAGE).into_response());
        }
        Err(e) => return Err(e),
    };

    let processed = result_store
        .save_result(&restored.png)
        .await
        .map_err(ProcessError::from)?;

    let html = pages.render(&PageView {
        original_image: Some(original.url),
        processed_image: Some(processed.url),
        mode: Some(mode),
    })?;

    Ok(Html(html).into_response())
}
