/// Immutable product snapshots
///
/// A snapshot copies a product's fields at a point in time. Order lines
/// reference snapshots rather than live products, so price and description
/// stay as they were when ordered even after the product changes or is
/// deleted. Snapshots are append-only and never replayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use super::product::Product;

/// Why a snapshot was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "snapshot_reason", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SnapshotReason {
    Created,
    Updated,
    Deleted,
    /// Taken per order line during order placement
    Ordered,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSnapshot {
    pub id: i64,
    pub product_id: i64,
    pub store_id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub reseller_price: String,
    pub consumer_price: String,
    pub description: String,
    pub reason: SnapshotReason,
    pub created_at: DateTime<Utc>,
}

impl ProductSnapshot {
    /// Copies the current fields of `product`
    pub async fn capture<'e, E: PgExecutor<'e>>(
        executor: E,
        product: &Product,
        reason: SnapshotReason,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ProductSnapshot>(
            r#"
            INSERT INTO product_snapshots
                (product_id, store_id, category_id, name, slug, reseller_price, consumer_price, description, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, product_id, store_id, category_id, name, slug, reseller_price,
                      consumer_price, description, reason, created_at
            "#,
        )
        .bind(product.id)
        .bind(product.store_id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.reseller_price)
        .bind(&product.consumer_price)
        .bind(&product.description)
        .bind(reason)
        .fetch_one(executor)
        .await
    }

    /// History of a product sold from one of `user_id`'s stores, oldest first
    ///
    /// Snapshots outlive their product, so this still answers after delete.
    pub async fn history_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        product_id: i64,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProductSnapshot>(
            r#"
            SELECT s.id, s.product_id, s.store_id, s.category_id, s.name, s.slug, s.reseller_price,
                   s.consumer_price, s.description, s.reason, s.created_at
            FROM product_snapshots s
            JOIN stores st ON st.id = s.store_id
            WHERE s.product_id = $1 AND st.user_id = $2
            ORDER BY s.id ASC
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_all(executor)
        .await
    }
}
