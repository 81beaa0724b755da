/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Welcome text and health check
/// - `auth`: Registration and login
/// - `users`: Profiles (`/user`)
/// - `addresses`: Shipping addresses (`/alamat`)
/// - `stores`: Stores (`/toko`)
/// - `categories`: Categories (`/category`, admin only)
/// - `products`: Products (`/produk`)
/// - `orders`: Orders (`/trx`)
/// - `upload`: Multipart file upload

pub mod addresses;
pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod stores;
pub mod upload;
pub mod users;
