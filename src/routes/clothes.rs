use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::ClothingItem,
    routes::{extract::AppJson, AppState},
    services::clothing::{self, GenerateTagsRequest, UploadClothingRequest},
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default, alias = "userId")]
    user_id: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub data: ClothingItem,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub success: bool,
    pub tags: Vec<String>,
}

/// Lists a user's clothing, newest first
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<ClothingItem>>> {
    let items = clothing::list_clothes(state.wardrobe.as_ref(), &params.user_id).await?;
    Ok(Json(items))
}

/// Fetches one clothing item
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<ClothingItem>> {
    let item = clothing::get_clothing(state.wardrobe.as_ref(), &id).await?;
    Ok(Json(item))
}

/// Uploads, tags and stores a clothing item
pub async fn upload(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<UploadClothingRequest>,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let item = clothing::upload_clothing(
        state.wardrobe.as_ref(),
        &state.images,
        state.model.as_ref(),
        request,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            data: item,
        }),
    ))
}

/// Suggests tags for an image without storing it
pub async fn generate_tags(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<GenerateTagsRequest>,
) -> AppResult<Json<TagsResponse>> {
    let tags = clothing::generate_tags(state.model.as_ref(), request).await?;
    Ok(Json(TagsResponse {
        success: true,
        tags,
    }))
}

/// Deletes a clothing item and its image
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    clothing::delete_clothing(state.wardrobe.as_ref(), &state.images, &id).await?;
    Ok(Json(json!({ "message": "Clothing item deleted successfully" })))
}
