/// Product categories
///
/// Categories are global. Admin-only access is enforced by the HTTP layer.
use sqlx::PgPool;

use crate::{
    error::{conflict_on_violation, ServiceError, ServiceResult},
    models::category::Category,
    pagination::{Page, Pagination},
};

fn require_name(name: &str) -> ServiceResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput("nama_category is required".to_string()));
    }
    Ok(name)
}

pub async fn create_category(pool: &PgPool, name: &str) -> ServiceResult<Category> {
    let category = Category::create(pool, require_name(name)?).await?;
    tracing::info!(category_id = category.id, "Category created");
    Ok(category)
}

pub async fn list_categories(pool: &PgPool, pagination: Pagination) -> ServiceResult<Page<Category>> {
    let items = Category::list(pool, pagination.limit, pagination.offset()).await?;
    let total = Category::count(pool).await?;
    Ok(Page::new(items, &pagination, total))
}

pub async fn get_category(pool: &PgPool, id: i64) -> ServiceResult<Category> {
    Category::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Category"))
}

/// Renames a category; a blank name leaves it unchanged
pub async fn update_category(pool: &PgPool, id: i64, name: &str) -> ServiceResult<Category> {
    if name.trim().is_empty() {
        return get_category(pool, id).await;
    }

    Category::rename(pool, id, name.trim())
        .await?
        .ok_or_else(|| ServiceError::not_found("Category"))
}

/// Deletes a category
///
/// # Errors
///
/// `Conflict` while products still reference it.
pub async fn delete_category(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let deleted = Category::delete(pool, id)
        .await
        .map_err(|e| conflict_on_violation(e, "Category is used by existing products"))?;

    if !deleted {
        return Err(ServiceError::not_found("Category"));
    }

    tracing::info!(category_id = id, "Category deleted");
    Ok(())
}
