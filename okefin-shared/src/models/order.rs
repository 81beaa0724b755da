/// Order (`trx`) model and status lifecycle
///
/// # Status lifecycle
///
/// ```text
/// pending ──> completed
///    │
///    └─────> cancelled
/// ```
///
/// `completed` and `cancelled` are terminal. Setting `pending` on a pending
/// order is accepted as a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting payment or fulfilment
    Pending,

    Completed,

    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal orders accept no further status changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!(
                "invalid status '{}', expected one of: pending, completed, cancelled",
                other
            )),
        }
    }
}

/// Builds an invoice code `INV-<unix-seconds>-<6 digits>`
///
/// The digits are the sub-second nanoseconds modulo 1,000,000.
pub fn invoice_code(now: DateTime<Utc>) -> String {
    format!(
        "INV-{}-{:06}",
        now.timestamp(),
        now.timestamp_subsec_nanos() % 1_000_000
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub address_id: i64,
    pub total_price: f64,
    pub status: OrderStatus,
    pub invoice_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Inserts a pending order
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
        address_id: i64,
        total_price: f64,
        invoice_code: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, address_id, total_price, status, invoice_code)
            VALUES ($1, $2, $3, 'pending', $4)
            RETURNING id, user_id, address_id, total_price, status, invoice_code, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(address_id)
        .bind(total_price)
        .bind(invoice_code)
        .fetch_one(executor)
        .await
    }

    /// Finds an order only if it was placed by `user_id`
    pub async fn find_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, address_id, total_price, status, invoice_code, created_at, updated_at
            FROM orders
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
        sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, address_id, total_price, status, invoice_code, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY id DESC
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
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    pub async fn set_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, address_id, total_price, status, invoice_code, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await
    }
}
