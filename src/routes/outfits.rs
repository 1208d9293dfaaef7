use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{SaveOutfitRequest, SavedOutfit},
    routes::{extract::AppJson, AppState},
    services::saved_outfits,
};

/// Lists a user's saved outfits
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<SavedOutfit>>> {
    let outfits = saved_outfits::list_saved_outfits(state.outfits.as_ref(), &user_id).await?;
    Ok(Json(outfits))
}

/// Saves an outfit built from wardrobe item ids
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    AppJson(request): AppJson<SaveOutfitRequest>,
) -> AppResult<(StatusCode, Json<SavedOutfit>)> {
    let outfit = saved_outfits::save_outfit(
        state.wardrobe.as_ref(),
        state.outfits.as_ref(),
        &user_id,
        request,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(outfit)))
}

/// Deletes a saved outfit
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path((user_id, outfit_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    saved_outfits::delete_saved_outfit(state.outfits.as_ref(), &user_id, &outfit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
