//! # Okefin Shared Library
//!
//! This crate contains the domain of the Okefin marketplace backend: data
//! models, business rules, and authentication primitives used by the API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their SQL
//! - `services`: Business rules, ownership checks, and transactions
//! - `auth`: Password hashing, JWT tokens, bearer authentication
//! - `db`: Connection pool and migrations
//! - `pagination`: Page/limit normalization and page metadata
//! - `region`: Province/city name lookup against the external region service
//! - `error`: Service-level error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod region;
pub mod services;

/// Current version of the Okefin shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
