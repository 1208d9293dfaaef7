use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendedOutfit},
    routes::{extract::AppJson, AppState},
    services::recommendations,
};

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub success: bool,
    pub outfit: RecommendedOutfit,
}

/// Handler for the outfit recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id = request.user_id.as_deref().unwrap_or(""),
        "Processing recommendation request"
    );

    let outfit =
        recommendations::recommend_outfit(state.wardrobe.as_ref(), state.model.as_ref(), request)
            .await?;

    tracing::info!(
        request_id = %request_id,
        outfit_id = %outfit.id,
        "Recommendation completed"
    );

    Ok(Json(RecommendationResponse {
        success: true,
        outfit,
    }))
}
