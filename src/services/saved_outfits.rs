use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{OutfitStore, WardrobeStore},
    error::{AppError, AppResult},
    models::{ClothingItem, SaveOutfitRequest, SavedOutfit, Slot},
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Looks up an optional item reference in the user's wardrobe; the item's
/// category must fill `slot`.
fn hydrate(
    wardrobe: &[ClothingItem],
    id: Option<&str>,
    slot: Slot,
) -> AppResult<Option<ClothingItem>> {
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        return Ok(None);
    };

    let item = wardrobe
        .iter()
        .find(|item| item.id == id)
        .ok_or_else(|| AppError::NotFound(format!("{} '{}' is not in your wardrobe", slot, id)))?;

    if Slot::for_category(&item.category) != Some(slot) {
        return Err(AppError::InvalidInput(format!(
            "Item '{}' is {}, not a {} item",
            id, item.category, slot
        )));
    }

    Ok(Some(item.clone()))
}

/// Saved outfits for a user, oldest first
pub async fn list_saved_outfits(
    outfits: &dyn OutfitStore,
    user_id: &str,
) -> AppResult<Vec<SavedOutfit>> {
    outfits.list(user_id).await
}

/// Validates, hydrates and appends an outfit to the user's saved list
pub async fn save_outfit(
    wardrobe: &dyn WardrobeStore,
    outfits: &dyn OutfitStore,
    user_id: &str,
    request: SaveOutfitRequest,
) -> AppResult<SavedOutfit> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Please enter an outfit name".to_string()));
    }
    if request.top_id.is_none() && request.bottom_id.is_none() && request.shoes_id.is_none() {
        return Err(AppError::InvalidInput(
            "An outfit needs at least one clothing item".to_string(),
        ));
    }

    let items: Vec<ClothingItem> = wardrobe
        .list_by_user(user_id)
        .await?
        .into_iter()
        .map(ClothingItem::from)
        .collect();

    let outfit = SavedOutfit {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name,
        description: non_empty(request.description),
        top: hydrate(&items, request.top_id.as_deref(), Slot::Top)?,
        bottom: hydrate(&items, request.bottom_id.as_deref(), Slot::Bottom)?,
        shoes: hydrate(&items, request.shoes_id.as_deref(), Slot::Shoes)?,
        occasion: non_empty(request.occasion),
        weather: non_empty(request.weather),
        season: non_empty(request.season),
        created_at: Utc::now(),
    };

    if outfit.top.is_none() && outfit.bottom.is_none() && outfit.shoes.is_none() {
        return Err(AppError::InvalidInput(
            "An outfit needs at least one clothing item".to_string(),
        ));
    }

    outfits.append(&outfit).await?;
    Ok(outfit)
}

/// Removes a saved outfit by id
pub async fn delete_saved_outfit(
    outfits: &dyn OutfitStore,
    user_id: &str,
    outfit_id: &str,
) -> AppResult<()> {
    if outfits.remove(user_id, outfit_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Outfit {} not found", outfit_id)))
    }
}
