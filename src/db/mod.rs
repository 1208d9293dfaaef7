pub mod postgres;
pub mod redis;
pub mod store;

pub use postgres::{create_pool, run_migrations, PgWardrobeStore};
pub use redis::create_redis_client;
pub use redis::RedisOutfitStore;
pub use redis::StoreKey;
pub use store::{OutfitStore, WardrobeStore};
