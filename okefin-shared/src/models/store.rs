/// Store (`toko`) model
///
/// A store belongs to one user. Nothing in the schema stops a user from
/// owning several; the "primary" store of a user is the one with the lowest
/// id, which is the store auto-created at registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Store {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateStore {
    pub name: String,
    pub photo_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStore {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

impl Store {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
        data: CreateStore,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            r#"
            INSERT INTO stores (user_id, name, photo_url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, photo_url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.name)
        .bind(data.photo_url)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            r#"
            SELECT id, user_id, name, photo_url, created_at, updated_at
            FROM stores
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Primary store of a user (lowest id)
    pub async fn find_primary_for_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            r#"
            SELECT id, user_id, name, photo_url, created_at, updated_at
            FROM stores
            WHERE user_id = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn list<'e, E: PgExecutor<'e>>(executor: E, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            r#"
            SELECT id, user_id, name, photo_url, created_at, updated_at
            FROM stores
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }

    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM stores")
            .fetch_one(executor)
            .await
    }

    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        data: UpdateStore,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Store>(
            r#"
            UPDATE stores
            SET name = COALESCE($2, name),
                photo_url = COALESCE($3, photo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, name, photo_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.photo_url)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a store; its products and their photos cascade
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
