use std::sync::{Arc, Mutex};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde_json::{json, Value};
use tempfile::TempDir;

use wardrobe_api::{
    create_router,
    db::{OutfitStore, WardrobeStore},
    error::AppResult,
    models::{ClothingRecord, NewClothing, SavedOutfit, User},
    services::{
        providers::{GenerationError, ImageInput},
        GenerativeModel, ImageStorage,
    },
    AppState,
};

#[derive(Default)]
struct InMemoryWardrobe {
    records: Mutex<Vec<ClothingRecord>>,
    users: Mutex<Vec<User>>,
}

#[async_trait::async_trait]
impl WardrobeStore for InMemoryWardrobe {
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<ClothingRecord>> {
        let records = self.records.lock().unwrap();
        let mut owned: Vec<ClothingRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn get(&self, id: &str) -> AppResult<Option<ClothingRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn upsert_user(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn insert(&self, item: &NewClothing) -> AppResult<ClothingRecord> {
        let now = Utc::now();
        let record = ClothingRecord {
            id: item.id.clone(),
            name: Some(item.name.clone()),
            category: item.category.as_str().to_string(),
            image_url: item.image_url.clone(),
            tags_text: Some(serde_json::to_string(&item.tags).unwrap()),
            user_id: item.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }
}

#[derive(Default)]
struct InMemoryOutfits {
    outfits: Mutex<Vec<SavedOutfit>>,
}

#[async_trait::async_trait]
impl OutfitStore for InMemoryOutfits {
    async fn list(&self, user_id: &str) -> AppResult<Vec<SavedOutfit>> {
        let outfits = self.outfits.lock().unwrap();
        Ok(outfits
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append(&self, outfit: &SavedOutfit) -> AppResult<()> {
        self.outfits.lock().unwrap().push(outfit.clone());
        Ok(())
    }

    async fn remove(&self, user_id: &str, outfit_id: &str) -> AppResult<bool> {
        let mut outfits = self.outfits.lock().unwrap();
        let before = outfits.len();
        outfits.retain(|o| !(o.user_id == user_id && o.id == outfit_id));
        Ok(outfits.len() != before)
    }
}

/// Model stub returning fixed text for prompts and image prompts
struct ScriptedModel {
    reply: Option<String>,
    tags: String,
}

#[async_trait::async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.reply.clone().ok_or(GenerationError::EmptyResponse)
    }

    async fn generate_with_image(
        &self,
        _prompt: &str,
        _image: &ImageInput,
    ) -> Result<String, GenerationError> {
        Ok(self.tags.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct TestApp {
    server: TestServer,
    wardrobe: Arc<InMemoryWardrobe>,
    _uploads: TempDir,
}

fn record(id: &str, name: &str, category: &str, tags: &[&str]) -> ClothingRecord {
    let now = Utc::now();
    ClothingRecord {
        id: id.to_string(),
        name: Some(name.to_string()),
        category: category.to_string(),
        image_url: format!("/uploads/{}.png", id),
        tags_text: Some(serde_json::to_string(tags).unwrap()),
        user_id: "u1".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn create_test_app(records: Vec<ClothingRecord>, reply: Option<&str>) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let wardrobe = Arc::new(InMemoryWardrobe {
        records: Mutex::new(records),
        users: Mutex::new(Vec::new()),
    });

    let state = Arc::new(AppState {
        wardrobe: wardrobe.clone(),
        outfits: Arc::new(InMemoryOutfits::default()),
        model: Arc::new(ScriptedModel {
            reply: reply.map(str::to_string),
            tags: r#"["casual", "Cotton"]"#.to_string(),
        }),
        images: ImageStorage::new(uploads.path()),
    });

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        wardrobe,
        _uploads: uploads,
    }
}

fn breezy_wardrobe() -> Vec<ClothingRecord> {
    vec![
        record("t1", "Linen Shirt", "top", &["linen", "white"]),
        record("b1", "Chinos", "bottom", &["beige"]),
        record("s1", "Loafers", "shoes", &["leather"]),
    ]
}

const BREEZY_REPLY: &str = r#"Here is my pick:
{"name":"Breezy Day","description":"Light layers","top":{"id":"t1"},"bottom":{"id":"b1"},"shoes":{"id":"s1"}}
Enjoy!"#;

fn recommendation_body() -> Value {
    json!({
        "userId": "u1",
        "weather": "sunny",
        "season": "summer",
        "occasion": "brunch"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(Vec::new(), None);
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommend_outfit() {
    let app = create_test_app(breezy_wardrobe(), Some(BREEZY_REPLY));

    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&recommendation_body())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let outfit = &body["outfit"];
    assert_eq!(outfit["name"], "Breezy Day");
    assert_eq!(outfit["top"]["id"], "t1");
    assert_eq!(outfit["top"]["tags"], json!(["linen", "white"]));
    assert_eq!(outfit["bottom"]["id"], "b1");
    assert_eq!(outfit["shoes"]["id"], "s1");
    assert_eq!(outfit["occasion"], "brunch");
    assert_eq!(outfit["weather"], "sunny");
    assert_eq!(outfit["season"], "summer");
    assert!(!outfit["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_recommend_missing_parameter() {
    let app = create_test_app(breezy_wardrobe(), Some(BREEZY_REPLY));

    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&json!({ "userId": "u1", "season": "summer", "occasion": "brunch" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "MissingParameter");
}

#[tokio::test]
async fn test_recommend_empty_wardrobe() {
    let app = create_test_app(Vec::new(), Some(BREEZY_REPLY));

    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&recommendation_body())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "InsufficientWardrobe");
}

#[tokio::test]
async fn test_recommend_without_bottoms() {
    let app = create_test_app(
        vec![record("t1", "Linen Shirt", "top", &[])],
        Some(BREEZY_REPLY),
    );

    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&recommendation_body())
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "InsufficientWardrobe");
}

#[tokio::test]
async fn test_recommend_unusable_model_output() {
    let app = create_test_app(breezy_wardrobe(), Some("I cannot decide today."));

    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&recommendation_body())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "MalformedRecommendation");
}

#[tokio::test]
async fn test_recommend_model_failure() {
    let app = create_test_app(breezy_wardrobe(), None);

    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&recommendation_body())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "GenerationFailed");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let app = create_test_app(Vec::new(), None);

    let response = app
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-abc"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-abc");

    // Errors carry a generated id too
    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_list_get_and_delete_clothes() {
    let app = create_test_app(breezy_wardrobe(), None);

    let response = app.server.get("/api/v1/clothes").add_query_param("user_id", "u1").await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 3);

    let response = app.server.get("/api/v1/clothes/b1").await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["name"], "Chinos");
    assert_eq!(item["tags"], json!(["beige"]));

    app.server.delete("/api/v1/clothes/b1").await.assert_status_ok();
    app.server
        .get("/api/v1/clothes/b1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete("/api/v1/clothes/b1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_clothes_requires_user() {
    let app = create_test_app(breezy_wardrobe(), None);
    let response = app.server.get("/api/v1/clothes").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "InvalidInput");
}

#[tokio::test]
async fn test_upload_clothing() {
    let app = create_test_app(Vec::new(), None);

    let response = app
        .server
        .post("/api/v1/clothes")
        .json(&json!({
            "user": { "id": "u9", "email": "u9@example.com" },
            "name": "Denim Jacket",
            "category": "outerwear",
            "tags": ["Blue"],
            "image": { "mime_type": "image/png", "data": BASE64.encode(b"not really a png") }
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["category"], "outerwear");
    assert_eq!(body["data"]["tags"], json!(["blue", "casual", "cotton"]));
    assert!(body["data"]["image_url"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/"));

    let stored = app.wardrobe.list_by_user("u9").await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_upload_rejects_unknown_category() {
    let app = create_test_app(Vec::new(), None);

    let response = app
        .server
        .post("/api/v1/clothes")
        .json(&json!({
            "user": { "id": "u9", "email": "u9@example.com" },
            "category": "hat",
            "image": { "mime_type": "image/png", "data": BASE64.encode(b"png") }
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.wardrobe.list_by_user("u9").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_tags() {
    let app = create_test_app(Vec::new(), None);

    let response = app
        .server
        .post("/api/v1/clothes/tags")
        .json(&json!({
            "category": "top",
            "image": { "mime_type": "image/jpeg", "data": BASE64.encode(b"jpeg") }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["tags"], json!(["casual", "cotton"]));
}

#[tokio::test]
async fn test_saved_outfit_flow() {
    let app = create_test_app(breezy_wardrobe(), None);

    let response = app
        .server
        .post("/api/v1/users/u1/outfits")
        .json(&json!({
            "name": "Office Monday",
            "top_id": "t1",
            "bottom_id": "b1",
            "occasion": "work"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let saved: Value = response.json();
    assert_eq!(saved["top"]["name"], "Linen Shirt");
    let outfit_id = saved["id"].as_str().unwrap().to_string();

    let response = app.server.get("/api/v1/users/u1/outfits").await;
    response.assert_status_ok();
    let outfits: Vec<Value> = response.json();
    assert_eq!(outfits.len(), 1);
    assert_eq!(outfits[0]["name"], "Office Monday");

    app.server
        .delete(&format!("/api/v1/users/u1/outfits/{}", outfit_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let outfits: Vec<Value> = app.server.get("/api/v1/users/u1/outfits").await.json();
    assert!(outfits.is_empty());

    app.server
        .delete(&format!("/api/v1/users/u1/outfits/{}", outfit_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_outfit_with_foreign_item() {
    let app = create_test_app(breezy_wardrobe(), None);

    let response = app
        .server
        .post("/api/v1/users/u2/outfits")
        .json(&json!({ "name": "Borrowed", "top_id": "t1" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_uses_failure_envelope() {
    let app = create_test_app(breezy_wardrobe(), Some(BREEZY_REPLY));

    let response = app
        .server
        .post("/api/v1/outfits/recommend")
        .json(&json!({
            "userId": "u1",
            "weather": 5,
            "season": "summer",
            "occasion": "brunch"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "InvalidInput");
    assert!(body["message"].as_str().unwrap().contains("weather"));

    let response = app
        .server
        .post("/api/v1/users/u1/outfits")
        .text("{not json")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "InvalidInput");
}

#[tokio::test]
async fn test_save_outfit_rejects_wrong_slot() {
    let app = create_test_app(breezy_wardrobe(), None);

    let response = app
        .server
        .post("/api/v1/users/u1/outfits")
        .json(&json!({ "name": "Upside Down", "top_id": "s1", "bottom_id": "t1" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "InvalidInput");

    let outfits: Vec<Value> = app.server.get("/api/v1/users/u1/outfits").await.json();
    assert!(outfits.is_empty());
}

#[tokio::test]
async fn test_save_outfit_camel_case_ids() {
    let app = create_test_app(breezy_wardrobe(), None);

    let response = app
        .server
        .post("/api/v1/users/u1/outfits")
        .json(&json!({ "name": "Weekend", "topId": "t1", "shoesId": "s1" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let saved: Value = response.json();
    assert_eq!(saved["top"]["id"], "t1");
    assert_eq!(saved["shoes"]["id"], "s1");
    assert!(saved["bottom"].is_null());
}
