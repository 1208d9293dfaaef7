use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

use crate::{
    db::WardrobeStore,
    error::{AppResult, RecommendationError},
    models::{OutfitConstraints, RecommendationRequest, RecommendedOutfit, ResolvedOutfit},
    services::{
        prompt::recommendation_prompt,
        providers::GenerativeModel,
        response_parser::parse_recommendation,
        wardrobe::{load_wardrobe, PartitionedWardrobe},
    },
};

fn required(value: Option<String>, field: &'static str) -> Result<String, RecommendationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RecommendationError::MissingParameter(field))
}

/// Checks that every required field is present and non-empty
pub fn validate_request(
    request: RecommendationRequest,
) -> Result<OutfitConstraints, RecommendationError> {
    Ok(OutfitConstraints {
        user_id: required(request.user_id, "userId")?,
        weather: required(request.weather, "weather")?,
        season: required(request.season, "season")?,
        occasion: required(request.occasion, "occasion")?,
        additional_info: request.additional_info.filter(|info| !info.trim().is_empty()),
    })
}

/// Stamps a resolved outfit with a fresh id and creation time
pub fn assemble(resolved: ResolvedOutfit) -> RecommendedOutfit {
    RecommendedOutfit {
        id: Uuid::new_v4().to_string(),
        name: resolved.name,
        description: resolved.description,
        top: resolved.top,
        bottom: resolved.bottom,
        shoes: resolved.shoes,
        occasion: resolved.occasion,
        weather: resolved.weather,
        season: resolved.season,
        created_at: Utc::now(),
    }
}

/// Generates an AI outfit recommendation from the user's wardrobe
///
/// Pipeline:
/// 1. Validate the request (no I/O on failure)
/// 2. Load and partition the wardrobe; require at least one top and bottom
/// 3. Build the prompt and call the model once, without retry
/// 4. Extract, validate and resolve the response against the wardrobe
/// 5. Assemble the final outfit
pub async fn recommend_outfit(
    store: &dyn WardrobeStore,
    model: &dyn GenerativeModel,
    request: RecommendationRequest,
) -> AppResult<RecommendedOutfit> {
    let start = Instant::now();
    let constraints = validate_request(request)?;

    let records = load_wardrobe(store, &constraints.user_id).await?;
    let wardrobe = PartitionedWardrobe::partition(records);
    wardrobe.ensure_recommendable()?;

    tracing::info!(
        user_id = %constraints.user_id,
        tops = wardrobe.tops.len(),
        bottoms = wardrobe.bottoms.len(),
        shoes = wardrobe.shoes.len(),
        "Requesting outfit recommendation"
    );

    let prompt = recommendation_prompt(&constraints, &wardrobe);
    let response = model.generate(&prompt).await.map_err(|e| {
        tracing::error!(error = %e, provider = model.name(), "Outfit generation failed");
        RecommendationError::GenerationFailed(e.to_string())
    })?;

    let resolved = parse_recommendation(&response, &wardrobe, &constraints).map_err(|e| {
        tracing::warn!(
            kind = e.kind(),
            error = %e,
            raw_response = %response,
            "Model response rejected"
        );
        e
    })?;

    let outfit = assemble(resolved);

    tracing::info!(
        user_id = %constraints.user_id,
        outfit_id = %outfit.id,
        has_shoes = outfit.shoes.is_some(),
        processing_time_ms = start.elapsed().as_millis(),
        "Outfit recommendation completed"
    );

    Ok(outfit)
}
