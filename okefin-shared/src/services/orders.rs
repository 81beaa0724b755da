/// Order (`trx`) placement and status updates
///
/// # Placement
///
/// 1. The claimed total must equal `Σ unit_price × quantity` exactly.
/// 2. In one transaction: check the address belongs to the buyer, insert
///    the pending order, then per line lock the product row, check stock,
///    snapshot the product, insert the line, and decrement stock with a
///    guard (`stock >= quantity`).
/// 3. Any failure rolls the whole order back.
///
/// Products from any store can be ordered. Line totals use the submitted
/// unit price; the snapshot records the product's own price at that moment.
use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    error::{conflict_on_violation, ServiceError, ServiceResult},
    models::{
        address::Address,
        order::{invoice_code, Order, OrderStatus},
        order_line::{CreateOrderLine, OrderLine, OrderLineDetail},
        product::Product,
        product_snapshot::{ProductSnapshot, SnapshotReason},
    },
    pagination::{Page, Pagination},
};

/// One requested line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub address_id: i64,
    pub total_price: f64,
    pub items: Vec<OrderItem>,
}

/// An order with its lines
#[derive(Debug, Clone)]
pub struct OrderView {
    pub order: Order,
    pub lines: Vec<OrderLineDetail>,
}

/// Checks the lines and that they add up to `claimed_total`
///
/// The comparison is exact; there is no tolerance for rounding.
pub fn verify_total(items: &[OrderItem], claimed_total: f64) -> ServiceResult<()> {
    if items.is_empty() {
        return Err(ServiceError::InvalidInput("details must not be empty".to_string()));
    }

    for item in items {
        if item.quantity <= 0 {
            return Err(ServiceError::InvalidInput(format!(
                "jumlah for produk {} must be greater than 0",
                item.product_id
            )));
        }
        if item.unit_price.is_nan() || item.unit_price <= 0.0 {
            return Err(ServiceError::InvalidInput(format!(
                "harga for produk {} must be greater than 0",
                item.product_id
            )));
        }
    }

    let computed: f64 = items.iter().map(OrderItem::line_total).sum();
    if computed != claimed_total {
        return Err(ServiceError::InvalidInput(
            "total_harga does not match sum of detail harga".to_string(),
        ));
    }

    Ok(())
}

fn insufficient_stock(product_id: i64) -> ServiceError {
    ServiceError::InvalidInput(format!("insufficient stock for produk {}", product_id))
}

/// Places an order for the caller
///
/// # Errors
///
/// - `InvalidInput` on a total mismatch, a non-positive line, or
///   insufficient stock
/// - `NotFound` if the address is not the caller's or a product is missing
pub async fn place_order(pool: &PgPool, user_id: i64, input: PlaceOrder) -> ServiceResult<OrderView> {
    verify_total(&input.items, input.total_price)?;

    let mut tx = pool.begin().await?;

    Address::find_owned(&mut *tx, input.address_id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Alamat"))?;

    let order = Order::create(
        &mut *tx,
        user_id,
        input.address_id,
        input.total_price,
        &invoice_code(Utc::now()),
    )
    .await
    .map_err(|e| conflict_on_violation(e, "Invoice code collision, retry the order"))?;

    for item in &input.items {
        let product = Product::lock_for_update(&mut *tx, item.product_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Produk {} not found", item.product_id)))?;

        if product.stock < item.quantity {
            return Err(insufficient_stock(product.id));
        }

        let snapshot = ProductSnapshot::capture(&mut *tx, &product, SnapshotReason::Ordered).await?;

        OrderLine::create(
            &mut *tx,
            CreateOrderLine {
                order_id: order.id,
                snapshot_id: snapshot.id,
                store_id: product.store_id,
                quantity: item.quantity,
                line_total: item.line_total(),
            },
        )
        .await?;

        if !Product::decrement_stock(&mut *tx, product.id, item.quantity).await? {
            return Err(insufficient_stock(product.id));
        }
    }

    let lines = OrderLine::details_for_orders(&mut *tx, &[order.id]).await?;

    tx.commit().await?;

    tracing::info!(
        user_id,
        order_id = order.id,
        invoice = %order.invoice_code,
        lines = lines.len(),
        "Order placed"
    );

    Ok(OrderView { order, lines })
}

async fn attach_lines(pool: &PgPool, orders: Vec<Order>) -> ServiceResult<Vec<OrderView>> {
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut by_order: HashMap<i64, Vec<OrderLineDetail>> = HashMap::new();
    for line in OrderLine::details_for_orders(pool, &ids).await? {
        by_order.entry(line.order_id).or_default().push(line);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let lines = by_order.remove(&order.id).unwrap_or_default();
            OrderView { order, lines }
        })
        .collect())
}

pub async fn list_orders(pool: &PgPool, user_id: i64, pagination: Pagination) -> ServiceResult<Page<OrderView>> {
    let orders = Order::list_by_user(pool, user_id, pagination.limit, pagination.offset()).await?;
    let total = Order::count_by_user(pool, user_id).await?;
    let items = attach_lines(pool, orders).await?;

    Ok(Page::new(items, &pagination, total))
}

pub async fn get_order(pool: &PgPool, user_id: i64, id: i64) -> ServiceResult<OrderView> {
    let order = Order::find_owned(pool, id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Trx"))?;
    let lines = OrderLine::details_for_orders(pool, &[order.id]).await?;

    Ok(OrderView { order, lines })
}

/// Moves an order along its status lifecycle
///
/// # Errors
///
/// `InvalidInput` if the order is already completed or cancelled.
pub async fn update_status(
    pool: &PgPool,
    user_id: i64,
    id: i64,
    status: OrderStatus,
) -> ServiceResult<OrderView> {
    let order = Order::find_owned(pool, id, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Trx"))?;

    if order.status.is_terminal() {
        return Err(ServiceError::InvalidInput(format!(
            "cannot change status of a {} order to {}",
            order.status.as_str(),
            status.as_str()
        )));
    }

    let order = if order.status == status {
        order
    } else {
        let updated = Order::set_status(pool, id, status)
            .await?
            .ok_or_else(|| ServiceError::not_found("Trx"))?;
        tracing::info!(user_id, order_id = id, status = status.as_str(), "Order status changed");
        updated
    };

    let lines = OrderLine::details_for_orders(pool, &[order.id]).await?;
    Ok(OrderView { order, lines })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: i32, unit_price: f64) -> OrderItem {
        OrderItem {
            product_id,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_verify_total_accepts_exact_sum() {
        let items = [item(1, 2, 15000.0), item(2, 1, 5000.0)];
        assert!(verify_total(&items, 35000.0).is_ok());
    }

    #[test]
    fn test_verify_total_rejects_mismatch() {
        let items = [item(1, 2, 15000.0)];
        let err = verify_total(&items, 29999.0).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn test_verify_total_has_no_tolerance() {
        let items = [item(1, 1, 0.1), item(2, 1, 0.2)];
        // 0.1 + 0.2 != 0.3 in binary floating point
        assert!(verify_total(&items, 0.3).is_err());
        assert!(verify_total(&items, 0.1 + 0.2).is_ok());
    }

    #[test]
    fn test_verify_total_rejects_bad_lines() {
        assert!(verify_total(&[], 0.0).is_err());
        assert!(verify_total(&[item(1, 0, 10.0)], 0.0).is_err());
        assert!(verify_total(&[item(1, -1, 10.0)], -10.0).is_err());
        assert!(verify_total(&[item(1, 1, 0.0)], 0.0).is_err());
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item(1, 3, 2500.0).line_total(), 7500.0);
    }
}
