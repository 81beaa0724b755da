/// Order (`trx`) endpoints
///
/// # Endpoints
///
/// - `POST /trx` - Place an order
/// - `GET /trx` - Caller's orders, newest first
/// - `GET /trx/:id` - One order with its lines
/// - `PUT /trx/:id` - Status change (`pending` to `completed` or `cancelled`)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiPath, PageParams, ValidJson},
    response::{ApiResponse, GET_OK, POST_OK, PUT_OK},
};
use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use okefin_shared::{
    auth::middleware::AuthContext,
    models::{order::OrderStatus, order_line::OrderLineDetail},
    pagination::Page,
    services::{
        self,
        orders::{OrderItem, OrderView, PlaceOrder},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One line of an order request
///
/// Per-line checks (`jumlah > 0`, `harga > 0`) run together with the total
/// check when the order is placed.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderDetailRequest {
    pub produk_id: i64,
    pub jumlah: i32,
    pub harga: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(range(min = 1, message = "alamat_id is required"))]
    pub alamat_id: i64,

    #[validate(range(exclusive_min = 0.0, message = "total_harga must be greater than 0"))]
    pub total_harga: f64,

    #[validate(length(min = 1, message = "details must not be empty"))]
    pub details: Vec<OrderDetailRequest>,
}

impl CreateOrderRequest {
    fn into_place_order(self) -> PlaceOrder {
        PlaceOrder {
            address_id: self.alamat_id,
            total_price: self.total_harga,
            items: self
                .details
                .into_iter()
                .map(|d| OrderItem {
                    product_id: d.produk_id,
                    quantity: d.jumlah,
                    unit_price: d.harga,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub id: i64,
    pub produk_id: i64,
    pub jumlah: i32,
    pub harga: f64,
    pub subtotal: f64,
}

impl From<OrderLineDetail> for OrderDetailResponse {
    fn from(line: OrderLineDetail) -> Self {
        Self {
            id: line.id,
            produk_id: line.product_id,
            jumlah: line.quantity,
            harga: line.unit_price(),
            subtotal: line.line_total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub kode_invoice: String,
    pub alamat_id: i64,
    pub user_id: i64,
    pub total_harga: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub details: Vec<OrderDetailResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        let order = view.order;
        Self {
            id: order.id,
            kode_invoice: order.invoice_code,
            alamat_id: order.address_id,
            user_id: order.user_id,
            total_harga: order.total_price,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
            details: view.lines.into_iter().map(OrderDetailResponse::from).collect(),
        }
    }
}

/// Place an order
///
/// Stock is reserved atomically: either every line is decremented or the
/// whole order is rolled back.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, total mismatch, or insufficient stock
/// - `404 Not Found`: Address or product not found
pub async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateOrderRequest>,
) -> ApiResult<ApiResponse<OrderResponse>> {
    let view = services::orders::place_order(&state.db, auth.user_id, req.into_place_order()).await?;
    Ok(ApiResponse::created(POST_OK, view.into()))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PageParams(pagination): PageParams,
) -> ApiResult<ApiResponse<Page<OrderResponse>>> {
    let page = services::orders::list_orders(&state.db, auth.user_id, pagination).await?;
    Ok(ApiResponse::ok(GET_OK, page.map(OrderResponse::from)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<OrderResponse>> {
    let view = services::orders::get_order(&state.db, auth.user_id, id).await?;
    Ok(ApiResponse::ok(GET_OK, view.into()))
}

/// Change the status of a pending order
///
/// # Errors
///
/// - `400 Bad Request`: Unknown status, or the order is already completed or cancelled
/// - `404 Not Found`: No such order for the caller
pub async fn update_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<i64>,
    ValidJson(req): ValidJson<UpdateOrderRequest>,
) -> ApiResult<ApiResponse<OrderResponse>> {
    let status: OrderStatus = req.status.trim().parse().map_err(ApiError::BadRequest)?;

    let view = services::orders::update_status(&state.db, auth.user_id, id, status).await?;
    Ok(ApiResponse::ok(PUT_OK, view.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_maps_lines() {
        let req: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "alamat_id": 4,
            "total_harga": 35000,
            "details": [
                {"produk_id": 1, "jumlah": 2, "harga": 15000},
                {"produk_id": 2, "jumlah": 1, "harga": 5000}
            ]
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let order = req.into_place_order();
        assert_eq!(order.address_id, 4);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].line_total(), 30000.0);
    }

    #[test]
    fn test_create_request_requires_details() {
        let req: CreateOrderRequest =
            serde_json::from_str(r#"{"alamat_id": 4, "total_harga": 1000, "details": []}"#).unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("details"));
    }

    #[test]
    fn test_detail_response_derives_unit_price() {
        let line = OrderLineDetail {
            id: 9,
            order_id: 3,
            product_id: 1,
            product_name: "Kopi".to_string(),
            store_id: 2,
            quantity: 2,
            line_total: 30000.0,
        };

        let json = serde_json::to_value(OrderDetailResponse::from(line)).unwrap();
        assert_eq!(json["harga"], 15000.0);
        assert_eq!(json["subtotal"], 30000.0);
        assert_eq!(json["produk_id"], 1);
    }
}
