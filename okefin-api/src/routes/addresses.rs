/// Address (`alamat`) endpoints
///
/// All addresses are scoped to the caller; someone else's address answers 404.

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
    models::address::{Address, CreateAddress, UpdateAddress},
    pagination::Page,
    services,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[validate(length(min = 1, max = 255, message = "judul_alamat must be 1 to 255 characters"))]
    pub judul_alamat: String,

    #[validate(length(min = 1, max = 255, message = "nama_penerima must be 1 to 255 characters"))]
    pub nama_penerima: String,

    #[validate(length(min = 1, max = 255, message = "no_telp must be 1 to 255 characters"))]
    pub no_telp: String,

    #[validate(length(min = 1, max = 255, message = "detail_alamat must be 1 to 255 characters"))]
    pub detail_alamat: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateAddressRequest {
    #[validate(length(max = 255, message = "judul_alamat must be at most 255 characters"))]
    pub judul_alamat: Option<String>,

    #[validate(length(max = 255, message = "nama_penerima must be at most 255 characters"))]
    pub nama_penerima: Option<String>,

    #[validate(length(max = 255, message = "no_telp must be at most 255 characters"))]
    pub no_telp: Option<String>,

    #[validate(length(max = 255, message = "detail_alamat must be at most 255 characters"))]
    pub detail_alamat: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub id: i64,
    pub id_user: i64,
    pub judul_alamat: String,
    pub nama_penerima: String,
    pub no_telp: String,
    pub detail_alamat: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            id_user: address.user_id,
            judul_alamat: address.title,
            nama_penerima: address.recipient_name,
            no_telp: address.phone,
            detail_alamat: address.detail,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}

pub async fn create_address(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateAddressRequest>,
) -> ApiResult<ApiResponse<AddressResponse>> {
    let address = services::addresses::create_address(
        &state.db,
        auth.user_id,
        CreateAddress {
            title: req.judul_alamat,
            recipient_name: req.nama_penerima,
            phone: req.no_telp,
            detail: req.detail_alamat,
        },
    )
    .await?;

    Ok(ApiResponse::created(POST_OK, address.into()))
}

/// `GET /alamat` and `GET /alamat/my`
pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PageParams(pagination): PageParams,
) -> ApiResult<ApiResponse<Page<AddressResponse>>> {
    let page = services::addresses::list_addresses(&state.db, auth.user_id, pagination).await?;
    Ok(ApiResponse::ok(GET_OK, page.map(AddressResponse::from)))
}

pub async fn get_address(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<AddressResponse>> {
    let address = services::addresses::get_address(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(GET_OK, address.into()))
}

pub async fn update_address(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<UpdateAddressRequest>,
) -> ApiResult<ApiResponse<AddressResponse>> {
    let address = services::addresses::update_address(
        &state.db,
        auth.user_id,
        id,
        UpdateAddress {
            title: req.judul_alamat,
            recipient_name: req.nama_penerima,
            phone: req.no_telp,
            detail: req.detail_alamat,
        },
    )
    .await?;

    Ok(ApiResponse::ok(PUT_OK, address.into()))
}

/// # Errors
///
/// - `404 Not Found`: No such address for the caller
/// - `409 Conflict`: Orders still ship to this address
pub async fn delete_address(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Option<()>>> {
    services::addresses::delete_address(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(DELETE_OK, None))
}
