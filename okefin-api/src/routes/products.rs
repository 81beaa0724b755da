/// Product (`produk`) endpoints
///
/// Products are created in the caller's primary store. Reads, updates, and
/// deletes are scoped to products of the caller's stores.

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
    models::product_snapshot::{ProductSnapshot, SnapshotReason},
    pagination::Page,
    services::{
        self,
        products::{NewProduct, ProductChanges, ProductView},
    },
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Longest photo URL the `product_photos` table stores
pub const MAX_PHOTO_URL_LEN: usize = 512;

fn validate_photo_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls.iter().any(|url| url.chars().count() > MAX_PHOTO_URL_LEN) {
        return Err(ValidationError::new("photo_url_length"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "nama_produk must be 1 to 255 characters"))]
    pub nama_produk: String,

    #[validate(range(exclusive_min = 0.0, message = "harga must be greater than 0"))]
    pub harga: f64,

    #[validate(range(min = 1, message = "stok must be greater than 0"))]
    pub stok: i32,

    #[validate(range(min = 1, message = "id_category is required"))]
    pub id_category: i64,

    #[validate(
        length(min = 1, message = "url_fotos needs at least one photo"),
        custom(function = "validate_photo_urls", message = "url_fotos entries must be at most 512 characters")
    )]
    pub url_fotos: Vec<String>,

    #[serde(default)]
    pub deskripsi: String,
}

/// Partial product update
///
/// A non-empty `url_fotos` replaces all photos of the product.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProductRequest {
    #[validate(length(max = 255, message = "nama_produk must be at most 255 characters"))]
    pub nama_produk: Option<String>,

    #[validate(range(min = 0.0, message = "harga must not be negative"))]
    pub harga: Option<f64>,

    #[validate(range(min = 0, message = "stok must not be negative"))]
    pub stok: Option<i32>,

    pub id_category: Option<i64>,

    #[validate(custom(function = "validate_photo_urls", message = "url_fotos entries must be at most 512 characters"))]
    pub url_fotos: Vec<String>,

    pub deskripsi: Option<String>,
}

impl UpdateProductRequest {
    fn into_changes(self) -> ProductChanges {
        ProductChanges {
            category_id: self.id_category,
            name: self.nama_produk,
            price: self.harga,
            stock: self.stok,
            description: self.deskripsi,
            photo_urls: self.url_fotos,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub nama_produk: String,
    pub slug: String,
    pub harga: f64,
    pub stok: i32,
    pub id_category: i64,
    pub toko_id: i64,
    pub url_fotos: Vec<String>,
    pub deskripsi: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductView> for ProductResponse {
    fn from(view: ProductView) -> Self {
        let harga = view.product.price();
        let product = view.product;
        Self {
            id: product.id,
            nama_produk: product.name,
            slug: product.slug,
            harga,
            stok: product.stock,
            id_category: product.category_id,
            toko_id: product.store_id,
            url_fotos: view.photo_urls,
            deskripsi: product.description,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// One entry of a product's snapshot history
#[derive(Debug, Serialize)]
pub struct ProductHistoryResponse {
    pub id: i64,
    pub produk_id: i64,
    pub toko_id: i64,
    pub id_category: i64,
    pub nama_produk: String,
    pub harga: f64,
    pub deskripsi: String,
    pub alasan: SnapshotReason,
    pub created_at: DateTime<Utc>,
}

impl From<ProductSnapshot> for ProductHistoryResponse {
    fn from(snapshot: ProductSnapshot) -> Self {
        Self {
            id: snapshot.id,
            produk_id: snapshot.product_id,
            toko_id: snapshot.store_id,
            id_category: snapshot.category_id,
            nama_produk: snapshot.name,
            harga: snapshot.consumer_price.parse().unwrap_or(0.0),
            deskripsi: snapshot.description,
            alasan: snapshot.reason,
            created_at: snapshot.created_at,
        }
    }
}

/// Create a product in the caller's store
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: Caller has no store, or the category does not exist
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateProductRequest>,
) -> ApiResult<ApiResponse<ProductResponse>> {
    let view = services::products::create_product(
        &state.db,
        auth.user_id,
        NewProduct {
            category_id: req.id_category,
            name: req.nama_produk,
            price: req.harga,
            stock: req.stok,
            description: req.deskripsi,
            photo_urls: req.url_fotos,
        },
    )
    .await?;

    Ok(ApiResponse::created(POST_OK, view.into()))
}

pub async fn list_products(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PageParams(pagination): PageParams,
) -> ApiResult<ApiResponse<Page<ProductResponse>>> {
    let page = services::products::list_products(&state.db, auth.user_id, pagination).await?;
    Ok(ApiResponse::ok(GET_OK, page.map(ProductResponse::from)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<ProductResponse>> {
    let view = services::products::get_product(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(GET_OK, view.into()))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<UpdateProductRequest>,
) -> ApiResult<ApiResponse<ProductResponse>> {
    let view = services::products::update_product(&state.db, auth.user_id, id, req.into_changes()).await?;
    Ok(ApiResponse::ok(PUT_OK, view.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Option<()>>> {
    services::products::delete_product(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(DELETE_OK, None))
}

/// Snapshot history of an owned product, oldest first
///
/// Answers for deleted products too.
///
/// # Errors
///
/// - `404 Not Found`: No history for this product in the caller's stores
pub async fn product_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Vec<ProductHistoryResponse>>> {
    let history = services::products::product_history(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(
        GET_OK,
        history.into_iter().map(ProductHistoryResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_zero_price_and_no_photos() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "nama_produk": "Kopi",
            "harga": 0,
            "stok": 3,
            "id_category": 1,
            "url_fotos": []
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let field_errors = errors.field_errors();
        assert!(field_errors.contains_key("harga"));
        assert!(field_errors.contains_key("url_fotos"));
        assert!(!field_errors.contains_key("stok"));
    }

    #[test]
    fn test_update_request_maps_to_changes() {
        let req: UpdateProductRequest =
            serde_json::from_str(r#"{"harga": 15000, "url_fotos": ["/uploads/a.png"]}"#).unwrap();
        assert!(req.validate().is_ok());

        let changes = req.into_changes();
        assert_eq!(changes.price, Some(15000.0));
        assert!(changes.name.is_none());
        assert_eq!(changes.photo_urls, vec!["/uploads/a.png".to_string()]);
    }

    #[test]
    fn test_photo_urls_are_length_checked_per_entry() {
        let long_url = format!("/uploads/{}", "a".repeat(MAX_PHOTO_URL_LEN));
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "nama_produk": "Kopi",
            "harga": 12000,
            "stok": 3,
            "id_category": 1,
            "url_fotos": ["/uploads/a.png", long_url]
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("url_fotos"));

        let update: UpdateProductRequest =
            serde_json::from_value(serde_json::json!({ "url_fotos": [long_url] })).unwrap();
        assert!(update.validate().is_err());

        let update: UpdateProductRequest =
            serde_json::from_value(serde_json::json!({ "nama_produk": "k".repeat(256) })).unwrap();
        assert!(update.validate().unwrap_err().field_errors().contains_key("nama_produk"));
    }
}
