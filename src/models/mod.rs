pub mod clothing;
pub mod outfit;

pub use clothing::{Category, ClothingItem, ClothingRecord, NewClothing, Slot, User};
pub use outfit::{
    OutfitConstraints, RecommendationRequest, RecommendedOutfit, ResolvedOutfit,
    SaveOutfitRequest, SavedOutfit,
};
