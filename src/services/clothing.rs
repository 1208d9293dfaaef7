use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::WardrobeStore,
    error::{AppError, AppResult},
    models::{Category, ClothingItem, NewClothing, User},
    services::{
        images::{ImagePayload, ImageStorage},
        providers::GenerativeModel,
        tagging::tag_image,
        wardrobe::UNNAMED_ITEM,
    },
};

/// Body of a clothing upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadClothingRequest {
    pub user: User,
    #[serde(default)]
    pub name: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image: ImagePayload,
}

/// Body of a tag-only request; nothing is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTagsRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image: ImagePayload,
}

fn display_name(name: Option<&str>) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNNAMED_ITEM)
        .to_string()
}

/// All clothing for a user, newest first
pub async fn list_clothes(store: &dyn WardrobeStore, user_id: &str) -> AppResult<Vec<ClothingItem>> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("User ID is required".to_string()));
    }

    let records = store.list_by_user(user_id).await?;
    Ok(records.into_iter().map(ClothingItem::from).collect())
}

/// A single clothing item
pub async fn get_clothing(store: &dyn WardrobeStore, id: &str) -> AppResult<ClothingItem> {
    store
        .get(id)
        .await?
        .map(ClothingItem::from)
        .ok_or_else(|| AppError::NotFound(format!("Clothing item {} not found", id)))
}

/// Stores the image, tags it, and records the new clothing item
pub async fn upload_clothing(
    store: &dyn WardrobeStore,
    images: &ImageStorage,
    model: &dyn GenerativeModel,
    request: UploadClothingRequest,
) -> AppResult<ClothingItem> {
    let category: Category = request.category.parse().map_err(AppError::InvalidInput)?;
    if request.user.id.trim().is_empty() || request.user.email.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "User id and email are required".to_string(),
        ));
    }
    let image = request.image.decode()?;
    let name = display_name(request.name.as_deref());

    let user = store.upsert_user(&request.user).await?;

    tracing::info!(
        user_id = %user.id,
        name = %name,
        category = %category,
        user_tags = request.tags.len(),
        "Uploading clothing item"
    );

    let image_url = images.save(&image).await?;
    let tags = tag_image(model, &image, category.as_str(), &name, &request.tags).await;

    let new_item = NewClothing {
        id: Uuid::new_v4().to_string(),
        name,
        category,
        image_url: image_url.clone(),
        tags,
        user_id: user.id,
    };

    match store.insert(&new_item).await {
        Ok(record) => Ok(ClothingItem::from(record)),
        Err(e) => {
            // Don't leave an orphaned file behind
            images.remove(&image_url).await;
            Err(e)
        }
    }
}

/// Tags an image without saving anything
pub async fn generate_tags(
    model: &dyn GenerativeModel,
    request: GenerateTagsRequest,
) -> AppResult<Vec<String>> {
    let category: Category = request.category.parse().map_err(AppError::InvalidInput)?;
    let image = request.image.decode()?;
    let name = display_name(request.name.as_deref());

    Ok(tag_image(model, &image, category.as_str(), &name, &request.tags).await)
}

/// Deletes a clothing item and its stored image
pub async fn delete_clothing(
    store: &dyn WardrobeStore,
    images: &ImageStorage,
    id: &str,
) -> AppResult<()> {
    let record = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Clothing item {} not found", id)))?;

    if !store.delete(id).await? {
        return Err(AppError::NotFound(format!("Clothing item {} not found", id)));
    }

    images.remove(&record.image_url).await;

    tracing::info!(clothing_id = %id, user_id = %record.user_id, "Clothing item deleted");

    Ok(())
}
