use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::WardrobeStore,
    error::{AppError, AppResult},
    models::{ClothingRecord, NewClothing, User},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Clothing catalogue backed by the `users` and `clothes` tables
#[derive(Clone)]
pub struct PgWardrobeStore {
    pool: PgPool,
}

impl PgWardrobeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WardrobeStore for PgWardrobeStore {
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<ClothingRecord>> {
        let rows = sqlx::query_as::<_, ClothingRecord>(
            r#"
            SELECT id, name, category, image_url, tags_text, user_id, created_at, updated_at
            FROM clothes
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: &str) -> AppResult<Option<ClothingRecord>> {
        let row = sqlx::query_as::<_, ClothingRecord>(
            r#"
            SELECT id, name, category, image_url, tags_text, user_id, created_at, updated_at
            FROM clothes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_user(&self, user: &User) -> AppResult<User> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, name, image_url
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert(&self, item: &NewClothing) -> AppResult<ClothingRecord> {
        let tags_text = serde_json::to_string(&item.tags)
            .map_err(|e| AppError::Internal(format!("Tag serialization error: {}", e)))?;

        let row = sqlx::query_as::<_, ClothingRecord>(
            r#"
            INSERT INTO clothes (id, name, category, image_url, tags_text, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category, image_url, tags_text, user_id, created_at, updated_at
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.category.as_str())
        .bind(&item.image_url)
        .bind(tags_text)
        .bind(&item.user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            clothing_id = %row.id,
            user_id = %row.user_id,
            category = %row.category,
            "Clothing item stored"
        );

        Ok(row)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM clothes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
