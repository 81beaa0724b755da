/// Order line model
///
/// A line references the product snapshot taken at order time (not the live
/// product) and records the store the product belonged to, the quantity,
/// and the line total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub snapshot_id: i64,
    pub store_id: i64,
    pub quantity: i32,
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderLine {
    pub order_id: i64,
    pub snapshot_id: i64,
    pub store_id: i64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Order line joined with the product id and name from its snapshot
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderLineDetail {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub store_id: i64,
    pub quantity: i32,
    pub line_total: f64,
}

impl OrderLineDetail {
    /// Unit price derived as `line_total / quantity`
    pub fn unit_price(&self) -> f64 {
        if self.quantity == 0 {
            return 0.0;
        }
        self.line_total / f64::from(self.quantity)
    }
}

impl OrderLine {
    pub async fn create<'e, E: PgExecutor<'e>>(executor: E, data: CreateOrderLine) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, OrderLine>(
            r#"
            INSERT INTO order_lines (order_id, snapshot_id, store_id, quantity, line_total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, order_id, snapshot_id, store_id, quantity, line_total, created_at, updated_at
            "#,
        )
        .bind(data.order_id)
        .bind(data.snapshot_id)
        .bind(data.store_id)
        .bind(data.quantity)
        .bind(data.line_total)
        .fetch_one(executor)
        .await
    }

    /// Lines of several orders with their snapshot data, in insertion order
    pub async fn details_for_orders<'e, E: PgExecutor<'e>>(
        executor: E,
        order_ids: &[i64],
    ) -> Result<Vec<OrderLineDetail>, sqlx::Error> {
        sqlx::query_as::<_, OrderLineDetail>(
            r#"
            SELECT l.id, l.order_id, s.product_id, s.name AS product_name,
                   l.store_id, l.quantity, l.line_total
            FROM order_lines l
            JOIN product_snapshots s ON s.id = l.snapshot_id
            WHERE l.order_id = ANY($1)
            ORDER BY l.id ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(executor)
        .await
    }
}
