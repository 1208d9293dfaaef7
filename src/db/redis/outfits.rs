use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;

use crate::db::OutfitStore;
use crate::error::AppError;
use crate::error::AppResult;
use crate::models::SavedOutfit;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    SavedOutfits(String),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::SavedOutfits(user_id) => write!(f, "outfits:{}", user_id),
        }
    }
}

/// Creates a Redis client for the saved-outfit store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Saved outfits kept as one Redis list of JSON documents per user
#[derive(Clone)]
pub struct RedisOutfitStore {
    redis_client: Client,
}

impl RedisOutfitStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    /// Raw list entries for a user, in insertion order
    async fn entries(&self, key: &StoreKey) -> AppResult<Vec<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let entries: Vec<String> = conn.lrange(key.to_string(), 0, -1).await?;
        Ok(entries)
    }
}

/// Decodes stored entries, dropping any that no longer deserialize
fn decode_entries(entries: &[String]) -> Vec<SavedOutfit> {
    entries
        .iter()
        .filter_map(|raw| match serde_json::from_str::<SavedOutfit>(raw) {
            Ok(outfit) => Some(outfit),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable saved outfit entry");
                None
            }
        })
        .collect()
}

/// Finds the stored entry whose outfit id matches
fn find_entry<'a>(entries: &'a [String], outfit_id: &str) -> Option<&'a String> {
    entries.iter().find(|raw| {
        serde_json::from_str::<SavedOutfit>(raw)
            .map(|outfit| outfit.id == outfit_id)
            .unwrap_or(false)
    })
}

#[async_trait::async_trait]
impl OutfitStore for RedisOutfitStore {
    async fn list(&self, user_id: &str) -> AppResult<Vec<SavedOutfit>> {
        let entries = self
            .entries(&StoreKey::SavedOutfits(user_id.to_string()))
            .await?;
        Ok(decode_entries(&entries))
    }

    async fn append(&self, outfit: &SavedOutfit) -> AppResult<()> {
        let json = serde_json::to_string(outfit)
            .map_err(|e| AppError::Internal(format!("Outfit serialization error: {}", e)))?;

        let key = StoreKey::SavedOutfits(outfit.user_id.clone());
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.rpush(key.to_string(), json).await?;

        tracing::info!(
            outfit_id = %outfit.id,
            user_id = %outfit.user_id,
            "Outfit saved"
        );

        Ok(())
    }

    /// Finds the stored entry by id, then LREMs it by value. The two calls are
    /// not atomic; an append or remove in between cannot make LREM delete a
    /// different outfit.
    async fn remove(&self, user_id: &str, outfit_id: &str) -> AppResult<bool> {
        let key = StoreKey::SavedOutfits(user_id.to_string());
        let entries = self.entries(&key).await?;

        let Some(entry) = find_entry(&entries, outfit_id) else {
            return Ok(false);
        };

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let removed: i64 = conn.lrem(key.to_string(), 1, entry).await?;

        tracing::info!(outfit_id = %outfit_id, user_id = %user_id, removed, "Outfit deleted");

        Ok(removed > 0)
    }
}
