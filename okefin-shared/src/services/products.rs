/// Products (`produk`)
///
/// A product is owned by whoever owns its store. Create, update, and delete
/// each run in one transaction together with the photo rows and the product
/// snapshot they write.
///
/// # Snapshots
///
/// | Operation | Snapshot reason | Taken |
/// |-----------|-----------------|-------|
/// | create    | `created`       | after insert, same transaction |
/// | update    | `updated`       | after update, same transaction |
/// | delete    | `deleted`       | before the delete transaction, best effort |
use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    error::{ServiceError, ServiceResult},
    models::{
        category::Category,
        product::{CreateProduct, Product, UpdateProduct},
        product_photo::ProductPhoto,
        product_snapshot::{ProductSnapshot, SnapshotReason},
        store::Store,
    },
    pagination::{Page, Pagination},
};

use super::non_empty;

/// A product with its photo URLs
#[derive(Debug, Clone)]
pub struct ProductView {
    pub product: Product,
    pub photo_urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub description: String,
    pub photo_urls: Vec<String>,
}

/// Product changes
///
/// `None`, blank strings, and zero numbers keep the stored value. A
/// non-empty `photo_urls` replaces every existing photo.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub photo_urls: Vec<String>,
}

impl ProductChanges {
    fn into_update(self) -> (UpdateProduct, Vec<String>) {
        let update = UpdateProduct {
            category_id: self.category_id.filter(|id| *id > 0),
            name: non_empty(self.name),
            price: self.price.filter(|p| *p > 0.0),
            stock: self.stock.filter(|s| *s > 0),
            description: non_empty(self.description),
        };
        (update, self.photo_urls)
    }
}

async fn require_category(pool: &PgPool, category_id: i64) -> ServiceResult<()> {
    if !Category::exists(pool, category_id).await? {
        return Err(ServiceError::not_found("Category"));
    }
    Ok(())
}

/// Creates a product in the caller's primary store
///
/// # Errors
///
/// - `NotFound` if the caller has no store or the category does not exist
/// - `InvalidInput` if the name is blank or the price is not positive
pub async fn create_product(pool: &PgPool, user_id: i64, input: NewProduct) -> ServiceResult<ProductView> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("nama_produk is required".to_string()));
    }
    if input.price.is_nan() || input.price <= 0.0 {
        return Err(ServiceError::InvalidInput("harga must be greater than 0".to_string()));
    }

    let store = Store::find_primary_for_user(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Toko"))?;
    require_category(pool, input.category_id).await?;

    let mut tx = pool.begin().await?;

    let product = Product::create(
        &mut *tx,
        CreateProduct {
            store_id: store.id,
            category_id: input.category_id,
            name: input.name,
            price: input.price,
            stock: input.stock,
            description: input.description,
        },
    )
    .await?;

    for url in &input.photo_urls {
        ProductPhoto::create(&mut *tx, product.id, url).await?;
    }
    ProductSnapshot::capture(&mut *tx, &product, SnapshotReason::Created).await?;

    tx.commit().await?;

    tracing::info!(user_id, product_id = product.id, store_id = store.id, "Product created");

    Ok(ProductView {
        product,
        photo_urls: input.photo_urls,
    })
}

/// Products of the caller's stores with their photos
pub async fn list_products(
    pool: &PgPool,
    user_id: i64,
    pagination: Pagination,
) -> ServiceResult<Page<ProductView>> {
    let products = Product::list_owned(pool, user_id, pagination.limit, pagination.offset()).await?;
    let total = Product::count_owned(pool, user_id).await?;

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let mut photos: HashMap<i64, Vec<String>> = HashMap::new();
    for photo in ProductPhoto::list_for_products(pool, &ids).await? {
        photos.entry(photo.product_id).or_default().push(photo.url);
    }

    let items = products
        .into_iter()
        .map(|product| {
            let photo_urls = photos.remove(&product.id).unwrap_or_default();
            ProductView { product, photo_urls }
        })
        .collect();

    Ok(Page::new(items, &pagination, total))
}

pub async fn get_product(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<ProductView> {
    let product = Product::find_owned(pool, id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Produk"))?;
    let photo_urls = ProductPhoto::urls_for_product(pool, product.id).await?;

    Ok(ProductView { product, photo_urls })
}

/// Applies a partial update to an owned product
pub async fn update_product(
    pool: &PgPool,
    user_id: i64,
    id: i64,
    changes: ProductChanges,
) -> ServiceResult<ProductView> {
    let (update, photo_urls) = changes.into_update();
    if let Some(category_id) = update.category_id {
        require_category(pool, category_id).await?;
    }

    let mut tx = pool.begin().await?;

    Product::lock_owned(&mut *tx, id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Produk"))?;

    let product = Product::update(&mut *tx, id, update)
        .await?
        .ok_or_else(|| ServiceError::not_found("Produk"))?;

    if !photo_urls.is_empty() {
        let removed = ProductPhoto::delete_for_product(&mut *tx, id).await?;
        for url in &photo_urls {
            ProductPhoto::create(&mut *tx, id, url).await?;
        }
        tracing::debug!(product_id = id, removed, added = photo_urls.len(), "Replaced product photos");
    }

    ProductSnapshot::capture(&mut *tx, &product, SnapshotReason::Updated).await?;
    let photo_urls = ProductPhoto::urls_for_product(&mut *tx, id).await?;

    tx.commit().await?;

    tracing::info!(user_id, product_id = id, "Product updated");

    Ok(ProductView { product, photo_urls })
}

/// Deletes an owned product and its photos
///
/// Order lines keep pointing at their snapshots, so past orders are not
/// affected.
pub async fn delete_product(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<()> {
    match Product::find_owned(pool, id, user_id).await {
        Ok(Some(product)) => {
            if let Err(e) = ProductSnapshot::capture(pool, &product, SnapshotReason::Deleted).await {
                tracing::warn!(product_id = id, error = %e, "Failed to snapshot deleted product");
            }
        }
        Ok(None) => return Err(ServiceError::not_found("Produk")),
        Err(e) => {
            tracing::warn!(product_id = id, error = %e, "Failed to load product for snapshot");
        }
    }

    let mut tx = pool.begin().await?;

    Product::lock_owned(&mut *tx, id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Produk"))?;

    ProductPhoto::delete_for_product(&mut *tx, id).await?;
    Product::delete(&mut *tx, id).await?;

    tx.commit().await?;

    tracing::info!(user_id, product_id = id, "Product deleted");
    Ok(())
}

/// Snapshot history of an owned product, oldest first
///
/// Deleted products keep their history.
///
/// # Errors
///
/// `NotFound` if no snapshot of the product belongs to the caller's stores.
pub async fn product_history(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<Vec<ProductSnapshot>> {
    let history = ProductSnapshot::history_owned(pool, id, user_id).await?;
    if history.is_empty() {
        return Err(ServiceError::not_found("Produk"));
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_blank_changes_are_ignored() {
        let changes = ProductChanges {
            category_id: Some(0),
            name: Some("  ".to_string()),
            price: Some(0.0),
            stock: Some(0),
            description: Some(String::new()),
            photo_urls: vec![],
        };

        let (update, photos) = changes.into_update();
        assert!(update.category_id.is_none());
        assert!(update.name.is_none());
        assert!(update.price.is_none());
        assert!(update.stock.is_none());
        assert!(update.description.is_none());
        assert!(photos.is_empty());
    }

    #[test]
    fn test_set_changes_are_kept() {
        let changes = ProductChanges {
            category_id: Some(3),
            name: Some("Kopi".to_string()),
            price: Some(12000.0),
            stock: Some(7),
            description: None,
            photo_urls: vec!["/uploads/a.png".to_string()],
        };

        let (update, photos) = changes.into_update();
        assert_eq!(update.category_id, Some(3));
        assert_eq!(update.name.as_deref(), Some("Kopi"));
        assert_eq!(update.price, Some(12000.0));
        assert_eq!(update.stock, Some(7));
        assert_eq!(photos, vec!["/uploads/a.png".to_string()]);
    }
}
