/// Product (`produk`) model
///
/// Products belong to a store and a category. The price is stored twice as
/// fixed-point strings (`reseller_price`, `consumer_price`, both `"%.2f"`),
/// and both are written with the same value.
///
/// Ownership is "the product's store belongs to the user"; the `*_owned`
/// queries express it as a join through `stores`.
///
/// # Example
///
/// ```
/// use okefin_shared::models::product::{format_price, slugify};
///
/// assert_eq!(slugify("Kopi Gayo Premium"), "kopi-gayo-premium");
/// assert_eq!(format_price(15000.0), "15000.00");
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Lowercases and replaces spaces with hyphens
///
/// Slugs are not checked for uniqueness.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Formats a price as a two-decimal string
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub store_id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub reseller_price: String,
    pub consumer_price: String,
    pub stock: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Consumer price as a number (0.0 if the stored string is unparseable)
    pub fn price(&self) -> f64 {
        self.consumer_price.parse().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub store_id: i64,
    pub category_id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub description: String,
}

/// Partial product update; `None` fields keep their value
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
}

impl Product {
    pub async fn create<'e, E: PgExecutor<'e>>(executor: E, data: CreateProduct) -> Result<Self, sqlx::Error> {
        let price = format_price(data.price);

        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (store_id, category_id, name, slug, reseller_price, consumer_price, stock, description)
            VALUES ($1, $2, $3, $4, $5, $5, $6, $7)
            RETURNING id, store_id, category_id, name, slug, reseller_price, consumer_price,
                      stock, description, created_at, updated_at
            "#,
        )
        .bind(data.store_id)
        .bind(data.category_id)
        .bind(&data.name)
        .bind(slugify(&data.name))
        .bind(price)
        .bind(data.stock)
        .bind(data.description)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, store_id, category_id, name, slug, reseller_price, consumer_price,
                   stock, description, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a product whose store belongs to `user_id`
    pub async fn find_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.store_id, p.category_id, p.name, p.slug, p.reseller_price,
                   p.consumer_price, p.stock, p.description, p.created_at, p.updated_at
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE p.id = $1 AND s.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Like [`Product::find_owned`], but row-locks the product until the
    /// surrounding transaction ends
    pub async fn lock_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.store_id, p.category_id, p.name, p.slug, p.reseller_price,
                   p.consumer_price, p.stock, p.description, p.created_at, p.updated_at
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE p.id = $1 AND s.user_id = $2
            FOR UPDATE OF p
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
    }

    /// Row-locks any product until the surrounding transaction ends
    ///
    /// Used by order placement, where the buyer is not the owner.
    pub async fn lock_for_update<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, store_id, category_id, name, slug, reseller_price, consumer_price,
                   stock, description, created_at, updated_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Products of every store owned by `user_id`
    pub async fn list_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.store_id, p.category_id, p.name, p.slug, p.reseller_price,
                   p.consumer_price, p.stock, p.description, p.created_at, p.updated_at
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE s.user_id = $1
            ORDER BY p.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }

    pub async fn count_owned<'e, E: PgExecutor<'e>>(executor: E, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products p
            JOIN stores s ON s.id = p.store_id
            WHERE s.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(executor)
        .await
    }

    /// Partial update
    ///
    /// A new name also regenerates the slug; a new price rewrites both price
    /// columns.
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        data: UpdateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        let slug = data.name.as_deref().map(slugify);
        let price = data.price.map(format_price);

        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET category_id = COALESCE($2, category_id),
                name = COALESCE($3, name),
                slug = COALESCE($4, slug),
                reseller_price = COALESCE($5, reseller_price),
                consumer_price = COALESCE($5, consumer_price),
                stock = COALESCE($6, stock),
                description = COALESCE($7, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, store_id, category_id, name, slug, reseller_price, consumer_price,
                      stock, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.category_id)
        .bind(data.name)
        .bind(slug)
        .bind(price)
        .bind(data.stock)
        .bind(data.description)
        .fetch_optional(executor)
        .await
    }

    /// Decrements stock only if enough remains
    ///
    /// Returns false (and changes nothing) when `stock < quantity`.
    pub async fn decrement_stock<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Kopi Gayo"), "kopi-gayo");
        assert_eq!(slugify("ALREADY-slugged"), "already-slugged");
        // Only spaces are replaced; consecutive spaces are kept as-is
        assert_eq!(slugify("Dua  Spasi"), "dua--spasi");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(10.0), "10.00");
        assert_eq!(format_price(99.999), "100.00");
        assert_eq!(format_price(0.5), "0.50");
    }

    #[test]
    fn test_price_parses_consumer_price() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            store_id: 1,
            category_id: 1,
            name: "Teh".to_string(),
            slug: "teh".to_string(),
            reseller_price: "9000.00".to_string(),
            consumer_price: "9500.50".to_string(),
            stock: 3,
            description: String::new(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.price(), 9500.5);
    }
}
