/// Product photo model
///
/// A product has zero or more photo URLs. Updating the photo list replaces
/// it wholesale ([`ProductPhoto::delete_for_product`] then inserts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductPhoto {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductPhoto {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        product_id: i64,
        url: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ProductPhoto>(
            r#"
            INSERT INTO product_photos (product_id, url)
            VALUES ($1, $2)
            RETURNING id, product_id, url, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(url)
        .fetch_one(executor)
        .await
    }

    /// Photo URLs of one product in insertion order
    pub async fn urls_for_product<'e, E: PgExecutor<'e>>(
        executor: E,
        product_id: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT url FROM product_photos WHERE product_id = $1 ORDER BY id ASC")
            .bind(product_id)
            .fetch_all(executor)
            .await
    }

    /// Photos of several products in one query
    pub async fn list_for_products<'e, E: PgExecutor<'e>>(
        executor: E,
        product_ids: &[i64],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProductPhoto>(
            r#"
            SELECT id, product_id, url, created_at, updated_at
            FROM product_photos
            WHERE product_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await
    }

    pub async fn delete_for_product<'e, E: PgExecutor<'e>>(
        executor: E,
        product_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM product_photos WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
