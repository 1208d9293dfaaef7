use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wardrobe_api::{
    create_router,
    db::{create_pool, create_redis_client, run_migrations, PgWardrobeStore, RedisOutfitStore},
    services::{GeminiClient, ImageStorage},
    AppState, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wardrobe_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let redis_client = create_redis_client(&config.redis_url)?;

    let images = ImageStorage::new(&config.upload_dir);
    tokio::fs::create_dir_all(images.upload_dir()).await?;

    let model = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
    );

    let state = Arc::new(AppState {
        wardrobe: Arc::new(PgWardrobeStore::new(pool)),
        outfits: Arc::new(RedisOutfitStore::new(redis_client)),
        model: Arc::new(model),
        images,
    });

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
