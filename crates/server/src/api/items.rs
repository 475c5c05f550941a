use std::io;
use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bazaar_core::{AddItemRequest, Item, ItemId, ItemSummary};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{bad_request, engine_error, ApiError, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub message: String,
    pub id: ItemId,
    pub image_name: String,
}

#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Missing keyword behaves like the empty keyword.
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<ItemSummary>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /items
///
/// Multipart form with `name`, `category` and `image` fields. Unknown
/// fields are ignored.
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AddItemResponse>, ApiError> {
    let mut request = AddItemRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e)),
        };

        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => request.name = Some(read_text(field).await?),
            "category" => request.category = Some(read_text(field).await?),
            "image" => match field.bytes().await {
                Ok(bytes) => request.image = Some(bytes.to_vec()),
                Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    return Err(multipart_error(e));
                }
                Err(e) => {
                    let e = state.engine().upload_interrupted(io::Error::other(e));
                    return Err(engine_error(&e));
                }
            },
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let added = state
        .engine()
        .add_item(request)
        .await
        .map_err(|e| engine_error(&e))?;

    Ok(Json(AddItemResponse {
        message: format!("item received: {}", added.name),
        id: added.id,
        image_name: added.image_name,
    }))
}

/// GET /items
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemListResponse>, ApiError> {
    let items = state
        .engine()
        .list_items()
        .await
        .map_err(|e| engine_error(&e))?;

    Ok(Json(ItemListResponse { items }))
}

/// GET /items/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id: ItemId = id
        .parse()
        .map_err(|_| bad_request(format!("Invalid item id: {}", id)))?;

    let item = state
        .engine()
        .get_item(id)
        .await
        .map_err(|e| engine_error(&e))?;

    Ok(Json(item))
}

/// GET /search?keyword=
pub async fn search_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let items = state
        .engine()
        .search_items(&query.keyword)
        .await
        .map_err(|e| engine_error(&e))?;

    Ok(Json(SearchResponse { items }))
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

/// Keeps the status axum assigns, e.g. 413 when the body limit is hit.
fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    (
        e.status(),
        Json(ErrorResponse {
            message: e.body_text(),
            kind: None,
            stage: None,
        }),
    )
}
