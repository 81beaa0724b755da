/// Registration and login
///
/// Registration creates the user and a default store named `Toko <name>` in
/// one transaction, so a rejected registration never leaves a store behind.
/// Login is by phone number and issues a 24-hour JWT.

use sqlx::PgPool;

use crate::{
    auth::{jwt, password},
    error::{conflict_on_violation, ServiceError, ServiceResult},
    models::{
        store::{CreateStore, Store},
        user::{CreateUser, User},
    },
    region::RegionLookup,
};

use super::{parse_birth_date, Profile};

/// Message returned for every rejected login
pub const INVALID_CREDENTIALS: &str = "No Telp atau kata sandi salah";

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub password: String,
    pub phone: String,
    /// `YYYY-MM-DD`, or empty
    pub birth_date: String,
    pub occupation: String,
    pub email: String,
    pub province_id: String,
    pub city_id: String,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub profile: Profile,
    pub token: String,
}

/// Name of the store created alongside a new user
pub fn default_store_name(user_name: &str) -> String {
    format!("Toko {}", user_name)
}

/// Registers a user and their default store
///
/// # Errors
///
/// - `Conflict` if the email or phone number is already registered
/// - `InvalidInput` if the birth date is malformed
pub async fn register(
    pool: &PgPool,
    region: &dyn RegionLookup,
    input: Registration,
) -> ServiceResult<Profile> {
    let birth_date = parse_birth_date(&input.birth_date)?;
    let password_hash = password::hash_password(&input.password)?;

    let mut tx = pool.begin().await?;

    if User::find_by_email(&mut *tx, &input.email).await?.is_some() {
        return Err(ServiceError::Conflict("Email already registered".to_string()));
    }
    if User::find_by_phone(&mut *tx, &input.phone).await?.is_some() {
        return Err(ServiceError::Conflict("No Telp already registered".to_string()));
    }

    let store_name = default_store_name(&input.name);
    let user = User::create(
        &mut *tx,
        CreateUser {
            name: input.name,
            password_hash,
            phone: input.phone,
            birth_date,
            occupation: input.occupation,
            email: input.email,
            province_id: input.province_id,
            city_id: input.city_id,
        },
    )
    .await
    // Lost a race with a concurrent registration
    .map_err(|e| conflict_on_violation(e, "Email or No Telp already registered"))?;

    Store::create(
        &mut *tx,
        user.id,
        CreateStore {
            name: store_name,
            photo_url: String::new(),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok(Profile::resolve(user, region).await)
}

/// Authenticates by phone number and password
///
/// Unknown phone numbers and wrong passwords fail identically.
pub async fn login(
    pool: &PgPool,
    region: &dyn RegionLookup,
    jwt_secret: &str,
    phone: &str,
    plain_password: &str,
) -> ServiceResult<LoginOutcome> {
    let user = User::find_by_phone(pool, phone)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(plain_password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Rejected login with wrong password");
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let claims = jwt::Claims::new(user.id, user.email.clone());
    let token = jwt::create_token(&claims, jwt_secret)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(LoginOutcome {
        profile: Profile::resolve(user, region).await,
        token,
    })
}
