use crate::{
    db::WardrobeStore,
    error::{AppResult, RecommendationError, WardrobeShortfall},
    models::{ClothingItem, ClothingRecord, Slot},
};

/// Name used for items stored without one
pub(crate) const UNNAMED_ITEM: &str = "Unnamed Item";

/// Decodes the persisted tag encoding (a JSON string array).
///
/// Missing or undecodable tags degrade to an empty list.
pub fn decode_tags(tags_text: Option<&str>) -> Vec<String> {
    let Some(raw) = tags_text.filter(|raw| !raw.trim().is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!(error = %e, raw = %raw, "Failed to decode stored tags");
            Vec::new()
        }
    }
}

impl From<ClothingRecord> for ClothingItem {
    fn from(record: ClothingRecord) -> Self {
        let tags = decode_tags(record.tags_text.as_deref());
        let name = record
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNNAMED_ITEM.to_string());

        ClothingItem {
            id: record.id,
            name,
            category: record.category,
            image_url: record.image_url,
            tags,
            user_id: record.user_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A wardrobe split into the candidate lists for each slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedWardrobe {
    pub tops: Vec<ClothingItem>,
    pub bottoms: Vec<ClothingItem>,
    pub shoes: Vec<ClothingItem>,
    pub other: Vec<ClothingItem>,
}

impl PartitionedWardrobe {
    /// Classifies every record into exactly one bucket
    pub fn partition(records: Vec<ClothingRecord>) -> Self {
        let mut wardrobe = Self::default();

        for item in records.into_iter().map(ClothingItem::from) {
            match Slot::for_category(&item.category) {
                Some(Slot::Top) => wardrobe.tops.push(item),
                Some(Slot::Bottom) => wardrobe.bottoms.push(item),
                Some(Slot::Shoes) => wardrobe.shoes.push(item),
                None => wardrobe.other.push(item),
            }
        }

        wardrobe
    }

    /// Candidate list for a slot
    pub fn candidates(&self, slot: Slot) -> &[ClothingItem] {
        match slot {
            Slot::Top => &self.tops,
            Slot::Bottom => &self.bottoms,
            Slot::Shoes => &self.shoes,
        }
    }

    /// Resolves an id against a slot's candidates by exact match
    pub fn resolve(&self, slot: Slot, id: &str) -> Option<&ClothingItem> {
        self.candidates(slot).iter().find(|item| item.id == id)
    }

    /// Fails unless at least one top and one bottom are available
    pub fn ensure_recommendable(&self) -> Result<(), RecommendationError> {
        if self.tops.is_empty() {
            return Err(RecommendationError::InsufficientWardrobe(
                WardrobeShortfall::NoTops,
            ));
        }
        if self.bottoms.is_empty() {
            return Err(RecommendationError::InsufficientWardrobe(
                WardrobeShortfall::NoBottoms,
            ));
        }
        Ok(())
    }
}

/// Loads every clothing record a user owns.
///
/// An empty wardrobe is reported as `InsufficientWardrobe` rather than an
/// empty list.
pub async fn load_wardrobe(
    store: &dyn WardrobeStore,
    user_id: &str,
) -> AppResult<Vec<ClothingRecord>> {
    let records = store.list_by_user(user_id).await?;

    if records.is_empty() {
        return Err(RecommendationError::InsufficientWardrobe(WardrobeShortfall::NoItems).into());
    }

    tracing::debug!(user_id = %user_id, items = records.len(), "Wardrobe loaded");

    Ok(records)
}
