/// Shipping addresses (`alamat`)
///
/// Every operation is scoped to the caller. An address owned by someone else
/// is reported as not found.
use sqlx::PgPool;

use crate::{
    error::{conflict_on_violation, ServiceError, ServiceResult},
    models::address::{Address, CreateAddress, UpdateAddress},
    pagination::{Page, Pagination},
};

use super::non_empty;

pub async fn create_address(pool: &PgPool, user_id: i64, data: CreateAddress) -> ServiceResult<Address> {
    let address = Address::create(pool, user_id, data).await?;
    tracing::debug!(user_id, address_id = address.id, "Address created");
    Ok(address)
}

pub async fn list_addresses(pool: &PgPool, user_id: i64, pagination: Pagination) -> ServiceResult<Page<Address>> {
    let items = Address::list_by_user(pool, user_id, pagination.limit, pagination.offset()).await?;
    let total = Address::count_by_user(pool, user_id).await?;
    Ok(Page::new(items, &pagination, total))
}

pub async fn get_address(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<Address> {
    Address::find_owned(pool, id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Alamat"))
}

pub async fn update_address(
    pool: &PgPool,
    user_id: i64,
    id: i64,
    changes: UpdateAddress,
) -> ServiceResult<Address> {
    let address = get_address(pool, user_id, id).await?;

    let changes = UpdateAddress {
        title: non_empty(changes.title),
        recipient_name: non_empty(changes.recipient_name),
        phone: non_empty(changes.phone),
        detail: non_empty(changes.detail),
    };

    Address::update(pool, address.id, changes)
        .await?
        .ok_or_else(|| ServiceError::not_found("Alamat"))
}

/// Deletes an owned address
///
/// # Errors
///
/// `Conflict` while orders still ship to it.
pub async fn delete_address(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<()> {
    let address = get_address(pool, user_id, id).await?;

    Address::delete(pool, address.id)
        .await
        .map_err(|e| conflict_on_violation(e, "Alamat is used by existing orders"))?;

    tracing::debug!(user_id, address_id = id, "Address deleted");
    Ok(())
}
