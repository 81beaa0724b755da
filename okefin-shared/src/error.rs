/// Service-level error type
///
/// Every operation in [`crate::services`] returns `Result<T, ServiceError>`.
/// Variants carry a machine-readable kind so the HTTP layer can map them to
/// status codes by dispatching on the variant instead of inspecting messages.
use crate::auth::{jwt::JwtError, password::PasswordError};

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed a business rule (bad total, insufficient stock, bad date)
    #[error("{0}")]
    InvalidInput(String),

    /// Resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness or reference conflict
    #[error("{0}")]
    Conflict(String),

    /// Credentials rejected
    #[error("{0}")]
    Unauthorized(String),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failure
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token creation failure
    #[error(transparent)]
    Token(#[from] JwtError),

    /// Upload storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ServiceError {
    pub fn not_found(what: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", what))
    }
}

/// Returns true if the error is a PostgreSQL unique-constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Returns true if the error is a PostgreSQL foreign-key violation
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}

/// Maps constraint violations to `Conflict(message)`, anything else to `Database`
pub fn conflict_on_violation(err: sqlx::Error, message: &str) -> ServiceError {
    if is_unique_violation(&err) || is_foreign_key_violation(&err) {
        ServiceError::Conflict(message.to_string())
    } else {
        ServiceError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_format_messages() {
        assert_eq!(ServiceError::not_found("Alamat").to_string(), "Alamat not found");
        assert_eq!(ServiceError::Conflict("in use".into()).to_string(), "in use");
    }

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));

        let mapped = conflict_on_violation(sqlx::Error::RowNotFound, "in use");
        assert!(matches!(mapped, ServiceError::Database(_)));
    }

    #[test]
    fn test_io_error_converts_to_storage() {
        let err: ServiceError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, ServiceError::Storage(_)));
    }
}
