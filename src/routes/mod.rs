use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    db::{OutfitStore, WardrobeStore},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{GenerativeModel, ImageStorage},
};

pub mod clothes;
pub mod extract;
pub mod outfits;
pub mod recommendations;

/// Base64 inflates the 5 MB image limit by a third; leave room for the JSON envelope
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub wardrobe: Arc<dyn WardrobeStore>,
    pub outfits: Arc<dyn OutfitStore>,
    pub model: Arc<dyn GenerativeModel>,
    pub images: ImageStorage,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.images.upload_dir());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .nest_service("/uploads", uploads)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Recommendations
        .route("/outfits/recommend", post(recommendations::recommend))
        // Clothing catalogue
        .route(
            "/clothes",
            get(clothes::list)
                .post(clothes::upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/clothes/tags",
            post(clothes::generate_tags).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/clothes/:id", get(clothes::get).delete(clothes::remove))
        // Saved outfits
        .route(
            "/users/:user_id/outfits",
            get(outfits::list).post(outfits::save),
        )
        .route("/users/:user_id/outfits/:outfit_id", delete(outfits::remove))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
