/// Middleware modules for the API server
///
/// - `auth`: Bearer JWT authentication and the admin gate

pub mod auth;
