/// Authentication utilities
///
/// This module provides the authentication primitives for Okefin:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer token authentication and the admin gate
///
/// # Example
///
/// ```no_run
/// use okefin_shared::auth::password::{hash_password, verify_password};
/// use okefin_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("rahasia1")?;
/// assert!(verify_password("rahasia1", &hash)?);
///
/// let claims = Claims::new(42, "ana@example.com".to_string());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
