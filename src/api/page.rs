use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::error::ApiError;
use crate::services::{PageRenderer, PageView};

/// The upload form with no images.
pub async fn handle_index(
    State(pages): State<Arc<PageRenderer>>,
) -> Result<Html<String>, ApiError> {
    Ok(Html(pages.render(&PageView::default())?))
}
