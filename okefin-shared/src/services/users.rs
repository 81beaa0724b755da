/// User profiles
use sqlx::PgPool;

use crate::{
    error::{conflict_on_violation, ServiceError, ServiceResult},
    models::user::{UpdateUser, User},
    pagination::{Page, Pagination},
    region::RegionLookup,
};

use super::{non_empty, parse_birth_date, Profile};

/// Profile changes; `None` and blank values keep the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub about: Option<String>,
    pub occupation: Option<String>,
    pub email: Option<String>,
    pub province_id: Option<String>,
    pub city_id: Option<String>,
}

pub async fn get_profile(pool: &PgPool, region: &dyn RegionLookup, user_id: i64) -> ServiceResult<Profile> {
    let user = User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))?;

    Ok(Profile::resolve(user, region).await)
}

/// Applies a partial profile update
///
/// # Errors
///
/// - `Conflict` if the new email belongs to another user
/// - `InvalidInput` if the birth date is malformed
pub async fn update_profile(
    pool: &PgPool,
    region: &dyn RegionLookup,
    user_id: i64,
    changes: ProfileChanges,
) -> ServiceResult<Profile> {
    let birth_date = match non_empty(changes.birth_date) {
        Some(raw) => parse_birth_date(&raw)?,
        None => None,
    };

    let email = non_empty(changes.email);
    if let Some(email) = &email {
        if let Some(other) = User::find_by_email(pool, email).await? {
            if other.id != user_id {
                return Err(ServiceError::Conflict("Email already registered".to_string()));
            }
        }
    }

    let update = UpdateUser {
        name: non_empty(changes.name),
        birth_date,
        gender: non_empty(changes.gender),
        about: non_empty(changes.about),
        occupation: non_empty(changes.occupation),
        email,
        province_id: non_empty(changes.province_id),
        city_id: non_empty(changes.city_id),
    };

    let user = if update.is_empty() {
        User::find_by_id(pool, user_id).await?
    } else {
        User::update(pool, user_id, update)
            .await
            .map_err(|e| conflict_on_violation(e, "Email already registered"))?
    }
    .ok_or_else(|| ServiceError::not_found("User"))?;

    tracing::debug!(user_id, "Profile updated");

    Ok(Profile::resolve(user, region).await)
}

/// Lists users, each with province and city names resolved
pub async fn list_users(
    pool: &PgPool,
    region: &dyn RegionLookup,
    pagination: Pagination,
) -> ServiceResult<Page<Profile>> {
    let users = User::list(pool, pagination.limit, pagination.offset()).await?;
    let total = User::count(pool).await?;

    let mut profiles = Vec::with_capacity(users.len());
    for user in users {
        profiles.push(Profile::resolve(user, region).await);
    }

    Ok(Page::new(profiles, &pagination, total))
}

pub async fn get_user(pool: &PgPool, region: &dyn RegionLookup, id: i64) -> ServiceResult<Profile> {
    get_profile(pool, region, id).await
}
