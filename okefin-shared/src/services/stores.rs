/// Stores (`toko`)
///
/// Anyone authenticated can list stores; reading one by id, updating, and
/// deleting are limited to the owner.
use sqlx::PgPool;

use crate::{
    error::{ServiceError, ServiceResult},
    models::store::{CreateStore, Store, UpdateStore},
    pagination::{Page, Pagination},
};

use super::non_empty;

pub async fn create_store(pool: &PgPool, user_id: i64, data: CreateStore) -> ServiceResult<Store> {
    if data.name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("nama_toko is required".to_string()));
    }

    let store = Store::create(pool, user_id, data).await?;
    tracing::debug!(user_id, store_id = store.id, "Store created");
    Ok(store)
}

pub async fn list_stores(pool: &PgPool, pagination: Pagination) -> ServiceResult<Page<Store>> {
    let items = Store::list(pool, pagination.limit, pagination.offset()).await?;
    let total = Store::count(pool).await?;
    Ok(Page::new(items, &pagination, total))
}

/// The caller's primary store
pub async fn my_store(pool: &PgPool, user_id: i64) -> ServiceResult<Store> {
    Store::find_primary_for_user(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Toko"))
}

/// A store by id, only if the caller owns it
pub async fn get_store(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<Store> {
    match Store::find_by_id(pool, id).await? {
        Some(store) if store.user_id == user_id => Ok(store),
        _ => Err(ServiceError::not_found("Toko")),
    }
}

pub async fn update_store(pool: &PgPool, user_id: i64, id: i64, changes: UpdateStore) -> ServiceResult<Store> {
    let store = get_store(pool, user_id, id).await?;

    let changes = UpdateStore {
        name: non_empty(changes.name),
        photo_url: non_empty(changes.photo_url),
    };

    Store::update(pool, store.id, changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("Toko"))
}

/// Deletes an owned store together with its products
pub async fn delete_store(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<()> {
    let store = get_store(pool, user_id, id).await?;
    Store::delete(pool, store.id).await?;

    tracing::info!(user_id, store_id = id, "Store deleted");
    Ok(())
}
