/// Business rules on top of the models
///
/// Services are free async functions taking the pool (and, where names are
/// resolved, a [`crate::region::RegionLookup`]). They own the ownership
/// checks and the transaction boundaries; models only run SQL.
///
/// # Modules
///
/// - `auth`: Registration and login
/// - `users`: Profiles and user listing
/// - `addresses`: Shipping addresses (`alamat`)
/// - `stores`: Stores (`toko`)
/// - `categories`: Product categories
/// - `products`: Products, photos, snapshots
/// - `orders`: Order placement and status updates
/// - `uploads`: File storage for uploaded images

pub mod addresses;
pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod stores;
pub mod uploads;
pub mod users;

use chrono::NaiveDate;

use crate::{
    error::{ServiceError, ServiceResult},
    models::user::User,
    region::{resolve_region, RegionLookup, ResolvedRegion},
};

/// A user with province and city names resolved
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub region: ResolvedRegion,
}

impl Profile {
    pub async fn resolve(user: User, region: &dyn RegionLookup) -> Self {
        let resolved = resolve_region(region, &user.province_id, &user.city_id).await;
        Self {
            user,
            region: resolved,
        }
    }
}

/// Parses a `YYYY-MM-DD` birth date; an empty string means "not given"
pub fn parse_birth_date(raw: &str) -> ServiceResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ServiceError::InvalidInput("tanggal_lahir must use the YYYY-MM-DD format".to_string()))
}

/// Treats blank strings as "no change" in partial updates
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(
            parse_birth_date("2000-01-31").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 31)
        );
        assert_eq!(parse_birth_date("").unwrap(), None);
        assert_eq!(parse_birth_date("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_birth_date_rejects_other_formats() {
        for raw in ["31/01/2000", "2000-13-01", "yesterday"] {
            let err = parse_birth_date(raw).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)), "{raw}");
        }
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
