/// Category endpoints (admin only)

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, PageParams, ValidJson},
    response::{ApiResponse, DELETE_OK, GET_OK, POST_OK, PUT_OK},
};
use axum::extract::State;
use chrono::{DateTime, Utc};
use okefin_shared::{models::category::Category, pagination::Page, services};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 255, message = "nama_category must be 1-255 characters"))]
    pub nama_category: String,
}

/// Rename request; an empty name leaves the category unchanged
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateCategoryRequest {
    #[validate(length(max = 255, message = "nama_category must be at most 255 characters"))]
    pub nama_category: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub nama_category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            nama_category: category.name,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CategoryRequest>,
) -> ApiResult<ApiResponse<CategoryResponse>> {
    let category = services::categories::create_category(&state.db, &req.nama_category).await?;
    Ok(ApiResponse::created(POST_OK, category.into()))
}

pub async fn list_categories(
    State(state): State<AppState>,
    PageParams(pagination): PageParams,
) -> ApiResult<ApiResponse<Page<CategoryResponse>>> {
    let page = services::categories::list_categories(&state.db, pagination).await?;
    Ok(ApiResponse::ok(GET_OK, page.map(CategoryResponse::from)))
}

pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<CategoryResponse>> {
    let category = services::categories::get_category(&state.db, id).await?;
    Ok(ApiResponse::ok(GET_OK, category.into()))
}

pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<UpdateCategoryRequest>,
) -> ApiResult<ApiResponse<CategoryResponse>> {
    let category = services::categories::update_category(&state.db, id, &req.nama_category).await?;
    Ok(ApiResponse::ok(PUT_OK, category.into()))
}

/// # Errors
///
/// - `404 Not Found`: No such category
/// - `409 Conflict`: Products still use the category
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Option<()>>> {
    services::categories::delete_category(&state.db, id).await?;
    Ok(ApiResponse::ok(DELETE_OK, None))
}
