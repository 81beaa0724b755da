/// Store (`toko`) endpoints

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, PageParams, ValidJson},
    response::{ApiResponse, DELETE_OK, GET_OK, POST_OK, PUT_OK},
};
use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use okefin_shared::{
    auth::middleware::AuthContext,
    models::store::{CreateStore, Store, UpdateStore},
    pagination::Page,
    services,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoreRequest {
    #[validate(length(min = 1, max = 255, message = "nama_toko must be 1 to 255 characters"))]
    pub nama_toko: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "url_foto must be at most 255 characters"))]
    pub url_foto: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateStoreRequest {
    #[validate(length(max = 255, message = "nama_toko must be at most 255 characters"))]
    pub nama_toko: Option<String>,

    #[validate(length(max = 255, message = "url_foto must be at most 255 characters"))]
    pub url_foto: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub id: i64,
    pub id_user: i64,
    pub nama_toko: String,
    pub url_foto: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Store> for StoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            id_user: store.user_id,
            nama_toko: store.name,
            url_foto: store.photo_url,
            created_at: store.created_at,
            updated_at: store.updated_at,
        }
    }
}

pub async fn create_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateStoreRequest>,
) -> ApiResult<ApiResponse<StoreResponse>> {
    let store = services::stores::create_store(
        &state.db,
        auth.user_id,
        CreateStore {
            name: req.nama_toko,
            photo_url: req.url_foto,
        },
    )
    .await?;

    Ok(ApiResponse::created(POST_OK, store.into()))
}

/// Every store, not only the caller's
pub async fn list_stores(
    State(state): State<AppState>,
    PageParams(pagination): PageParams,
) -> ApiResult<ApiResponse<Page<StoreResponse>>> {
    let page = services::stores::list_stores(&state.db, pagination).await?;
    Ok(ApiResponse::ok(GET_OK, page.map(StoreResponse::from)))
}

pub async fn get_my_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<StoreResponse>> {
    let store = services::stores::my_store(&state.db, auth.user_id).await?;
    Ok(ApiResponse::ok(GET_OK, store.into()))
}

pub async fn get_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<StoreResponse>> {
    let store = services::stores::get_store(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(GET_OK, store.into()))
}

pub async fn update_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<UpdateStoreRequest>,
) -> ApiResult<ApiResponse<StoreResponse>> {
    let store = services::stores::update_store(
        &state.db,
        auth.user_id,
        id,
        UpdateStore {
            name: req.nama_toko,
            photo_url: req.url_foto,
        },
    )
    .await?;

    Ok(ApiResponse::ok(PUT_OK, store.into()))
}

pub async fn delete_store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Option<()>>> {
    services::stores::delete_store(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(DELETE_OK, None))
}
