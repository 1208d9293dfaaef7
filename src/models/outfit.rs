use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClothingItem;

/// Constraints for an AI outfit recommendation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default, alias = "additional_info")]
    pub additional_info: Option<String>,
}

/// Recommendation request with every required field present and non-empty
#[derive(Debug, Clone, PartialEq)]
pub struct OutfitConstraints {
    pub user_id: String,
    pub weather: String,
    pub season: String,
    pub occasion: String,
    pub additional_info: Option<String>,
}

/// Model output after validation and resolution, before id/timestamp stamping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOutfit {
    pub name: String,
    pub description: String,
    pub top: ClothingItem,
    pub bottom: ClothingItem,
    pub shoes: Option<ClothingItem>,
    pub occasion: String,
    pub weather: String,
    pub season: String,
}

/// A generated outfit handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedOutfit {
    pub id: String,
    pub name: String,
    pub description: String,
    pub top: ClothingItem,
    pub bottom: ClothingItem,
    pub shoes: Option<ClothingItem>,
    pub occasion: String,
    pub weather: String,
    pub season: String,
    pub created_at: DateTime<Utc>,
}

/// Outfit kept in a user's saved list, created manually or from a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOutfit {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub top: Option<ClothingItem>,
    pub bottom: Option<ClothingItem>,
    pub shoes: Option<ClothingItem>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body for saving an outfit; items are referenced by clothing id.
/// Item ids are accepted in snake_case or camelCase.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveOutfitRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "topId")]
    pub top_id: Option<String>,
    #[serde(default, alias = "bottomId")]
    pub bottom_id: Option<String>,
    #[serde(default, alias = "shoesId")]
    pub shoes_id: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}
