/// Database models for Okefin
///
/// Each model owns the SQL for its table. Functions are generic over
/// `sqlx::PgExecutor`, so they run against the pool or inside a transaction.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `address`: Shipping addresses (`alamat`)
/// - `store`: Stores (`toko`)
/// - `category`: Flat product categories
/// - `product`: Products (`produk`), slug and price helpers
/// - `product_photo`: Product photo URLs
/// - `product_snapshot`: Immutable product copies referenced by order lines
/// - `order`: Orders (`trx`), status lifecycle, invoice codes
/// - `order_line`: Order line items

pub mod address;
pub mod category;
pub mod order;
pub mod order_line;
pub mod product;
pub mod product_photo;
pub mod product_snapshot;
pub mod store;
pub mod user;
