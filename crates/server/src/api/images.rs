use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::error::{engine_error, ApiError};
use crate::state::AppState;

/// GET /image/{filename}
///
/// Serves the stored bytes, or the default image when the file is absent.
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let image = state
        .engine()
        .get_image(&filename)
        .await
        .map_err(|e| engine_error(&e))?;

    if image.fallback {
        debug!("Serving {} in place of {}", image.name, filename);
    }

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], image.bytes).into_response())
}
