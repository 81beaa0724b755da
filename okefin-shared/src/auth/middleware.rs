/// Bearer token authentication and the admin gate
///
/// The request-level state machine is:
///
/// ```text
/// no Authorization header        -> MissingCredentials  (401)
/// header without "Bearer " form  -> InvalidFormat       (401)
/// bad signature / expired / iss  -> InvalidToken        (401)
/// valid                          -> AuthContext injected, request proceeds
/// ```
///
/// The admin gate runs after authentication and re-reads the user row:
/// a failed lookup is `DatabaseError` (500), a vanished user is
/// `UnknownUser` (401), and a non-admin is `NotAdmin` (403).
///
/// Both functions take their dependencies (secret, pool) as arguments, so
/// the HTTP layer wires them in from application state.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use okefin_shared::auth::jwt::{create_token, Claims};
/// use okefin_shared::auth::middleware::authenticate_bearer;
///
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = create_token(&Claims::new(5, "a@x.com".to_string()), secret).unwrap();
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::AUTHORIZATION,
///     HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
/// );
///
/// let auth = authenticate_bearer(&headers, secret).unwrap();
/// assert_eq!(auth.user_id, 5);
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// Authentication context added to request extensions
///
/// Handlers extract it using Axum's `Extension` extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Email carried in the token
    pub email: String,
}

/// Error type for authentication and the admin gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token is valid but the user no longer exists
    #[error("User not found")]
    UnknownUser,

    /// User is not an administrator
    #[error("Admin access required")]
    NotAdmin,

    /// Database error during the admin lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Authenticates the `Authorization: Bearer <token>` header
///
/// # Errors
///
/// Returns `MissingCredentials`, `InvalidFormat`, or `InvalidToken` as
/// described in the module docs.
pub fn authenticate_bearer(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Checks that the authenticated user is an administrator
pub async fn require_admin(pool: &PgPool, auth: &AuthContext) -> Result<User, AuthError> {
    let user = User::find_by_id(pool, auth.user_id)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    if !user.is_admin {
        tracing::debug!(user_id = user.id, "Rejected non-admin user");
        return Err(AuthError::NotAdmin);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_token_yields_context() {
        let token = create_token(&Claims::new(3, "c@x.com".to_string()), SECRET).unwrap();
        let auth = authenticate_bearer(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();

        assert_eq!(
            auth,
            AuthContext {
                user_id: 3,
                email: "c@x.com".to_string()
            }
        );
    }

    #[test]
    fn test_missing_header() {
        let result = authenticate_bearer(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_malformed_bearer() {
        let token = create_token(&Claims::new(3, "c@x.com".to_string()), SECRET).unwrap();

        let result = authenticate_bearer(&headers_with(&format!("Token {}", token)), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));

        let result = authenticate_bearer(&headers_with("Bearer "), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::with_expiration(3, "c@x.com".to_string(), Duration::minutes(-5));
        let token = create_token(&claims, SECRET).unwrap();

        let result = authenticate_bearer(&headers_with(&format!("Bearer {}", token)), SECRET);
        match result {
            Err(AuthError::InvalidToken(msg)) => assert_eq!(msg, "Token expired"),
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_signature() {
        let token = create_token(&Claims::new(3, "c@x.com".to_string()), "x".repeat(40).as_str()).unwrap();
        let result = authenticate_bearer(&headers_with(&format!("Bearer {}", token)), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
