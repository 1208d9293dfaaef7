//! Storage collaborators used by the services.
//!
//! Handlers and services only ever see these traits, so tests can swap in
//! mocks or in-memory fakes without a database or Redis.
use crate::{
    error::AppResult,
    models::{ClothingRecord, NewClothing, SavedOutfit, User},
};

/// Persistent clothing catalogue
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WardrobeStore: Send + Sync {
    /// All clothing owned by `user_id`, newest first
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<ClothingRecord>>;

    /// A single clothing row by id
    async fn get(&self, id: &str) -> AppResult<Option<ClothingRecord>>;

    /// Inserts the user if no user with that email exists, returning the stored row
    async fn upsert_user(&self, user: &User) -> AppResult<User>;

    /// Inserts a clothing row
    async fn insert(&self, item: &NewClothing) -> AppResult<ClothingRecord>;

    /// Deletes a clothing row, returning whether one existed
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

/// User-scoped, append-only list of saved outfits
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait OutfitStore: Send + Sync {
    /// Saved outfits for `user_id` in insertion order
    async fn list(&self, user_id: &str) -> AppResult<Vec<SavedOutfit>>;

    /// Appends an outfit to its owner's list
    async fn append(&self, outfit: &SavedOutfit) -> AppResult<()>;

    /// Removes an outfit by id, returning whether it was present
    async fn remove(&self, user_id: &str, outfit_id: &str) -> AppResult<bool>;
}
