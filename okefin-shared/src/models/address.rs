/// Shipping address (`alamat`) model
///
/// Every address belongs to exactly one user. Reads for a user go through
/// the `*_owned` helpers, which put the ownership predicate in the query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    /// Label such as "Rumah" or "Kantor"
    pub title: String,
    pub recipient_name: String,
    pub phone: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAddress {
    pub title: String,
    pub recipient_name: String,
    pub phone: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAddress {
    pub title: Option<String>,
    pub recipient_name: Option<String>,
    pub phone: Option<String>,
    pub detail: Option<String>,
}

impl Address {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
        data: CreateAddress,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (user_id, title, recipient_name, phone, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, recipient_name, phone, detail, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(data.title)
        .bind(data.recipient_name)
        .bind(data.phone)
        .bind(data.detail)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            SELECT id, user_id, title, recipient_name, phone, detail, created_at, updated_at
            FROM addresses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds an address only if it belongs to `user_id`
    pub async fn find_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            SELECT id, user_id, title, recipient_name, phone, detail, created_at, updated_at
            FROM addresses
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn list_by_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            SELECT id, user_id, title, recipient_name, phone, detail, created_at, updated_at
            FROM addresses
            WHERE user_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }

    pub async fn count_by_user<'e, E: PgExecutor<'e>>(executor: E, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM addresses WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    /// Partial update; `None` fields keep their value
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        data: UpdateAddress,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Address>(
            r#"
            UPDATE addresses
            SET title = COALESCE($2, title),
                recipient_name = COALESCE($3, recipient_name),
                phone = COALESCE($4, phone),
                detail = COALESCE($5, detail),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, recipient_name, phone, detail, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.recipient_name)
        .bind(data.phone)
        .bind(data.detail)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
