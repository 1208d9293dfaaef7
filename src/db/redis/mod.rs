pub mod outfits;

pub use outfits::create_redis_client;
pub use outfits::RedisOutfitStore;
pub use outfits::StoreKey;
