/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a new user and their default store
/// - `POST /auth/login` - Login by phone number and get a 24h token

use crate::{
    app::AppState,
    error::ApiResult,
    extract::ValidJson,
    response::{ApiResponse, POST_OK},
    routes::users::{format_birth_date, UserResponse},
};
use axum::extract::State;
use okefin_shared::{
    region::{City, Province},
    services::{self, auth::Registration},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    // "Toko " + nama must still fit the 255-character store name
    #[validate(length(min = 1, max = 250, message = "nama must be 1 to 250 characters"))]
    pub nama: String,

    #[validate(length(min = 6, max = 128, message = "kata_sandi must be 6 to 128 characters"))]
    pub kata_sandi: String,

    #[validate(length(min = 1, max = 255, message = "no_telp must be 1 to 255 characters"))]
    pub no_telp: String,

    /// `YYYY-MM-DD`
    #[validate(length(min = 1, message = "tanggal_lahir is required"))]
    pub tanggal_lahir: String,

    #[validate(length(min = 1, max = 255, message = "pekerjaan must be 1 to 255 characters"))]
    pub pekerjaan: String,

    #[validate(
        email(message = "email is invalid"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "id_provinsi must be 1 to 255 characters"))]
    pub id_provinsi: String,

    #[validate(length(min = 1, max = 255, message = "id_kota must be 1 to 255 characters"))]
    pub id_kota: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "no_telp must be 1 to 255 characters"))]
    pub no_telp: String,

    #[validate(length(min = 1, message = "kata_sandi is required"))]
    pub kata_sandi: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub nama: String,
    pub no_telp: String,
    #[serde(rename = "tanggal_Lahir")]
    pub tanggal_lahir: String,
    pub tentang: String,
    pub pekerjaan: String,
    pub email: String,
    pub id_provinsi: Option<Province>,
    pub id_kota: Option<City>,

    /// Bearer token (24h)
    pub token: String,
}

/// Register a new user
///
/// Creates the user and a store named `Toko <nama>` atomically.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "nama": "Ana",
///   "kata_sandi": "secret1",
///   "no_telp": "0811",
///   "tanggal_lahir": "2000-01-01",
///   "pekerjaan": "eng",
///   "email": "a@x.com",
///   "id_provinsi": "11",
///   "id_kota": "1101"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or malformed birth date
/// - `409 Conflict`: Email or phone number already registered
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let profile = services::auth::register(
        &state.db,
        state.region.as_ref(),
        Registration {
            name: req.nama,
            password: req.kata_sandi,
            phone: req.no_telp,
            birth_date: req.tanggal_lahir,
            occupation: req.pekerjaan,
            email: req.email,
            province_id: req.id_provinsi,
            city_id: req.id_kota,
        },
    )
    .await?;

    Ok(ApiResponse::ok(POST_OK, profile.into()))
}

/// Login endpoint
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields
/// - `401 Unauthorized`: Unknown phone number or wrong password
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let outcome = services::auth::login(
        &state.db,
        state.region.as_ref(),
        state.jwt_secret(),
        &req.no_telp,
        &req.kata_sandi,
    )
    .await?;

    let user = outcome.profile.user;
    Ok(ApiResponse::ok(
        POST_OK,
        LoginResponse {
            nama: user.name,
            no_telp: user.phone,
            tanggal_lahir: format_birth_date(user.birth_date),
            tentang: user.about,
            pekerjaan: user.occupation,
            email: user.email,
            id_provinsi: outcome.profile.region.province,
            id_kota: outcome.profile.region.city,
            token: outcome.token,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "nama": "Ana",
            "kata_sandi": "12345",
            "no_telp": "0811",
            "tanggal_lahir": "2000-01-01",
            "pekerjaan": "eng",
            "email": "a@x.com",
            "id_provinsi": "11",
            "id_kota": "1101"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields: Vec<_> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        assert_eq!(fields, vec!["kata_sandi".to_string()]);
    }

    #[test]
    fn test_login_response_uses_capitalized_birth_date_key() {
        let response = LoginResponse {
            nama: "Ana".to_string(),
            no_telp: "0811".to_string(),
            tanggal_lahir: "2000-01-01".to_string(),
            tentang: String::new(),
            pekerjaan: "eng".to_string(),
            email: "a@x.com".to_string(),
            id_provinsi: None,
            id_kota: None,
            token: "t".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["tanggal_Lahir"], "2000-01-01");
        assert!(json.get("tanggal_lahir").is_none());
    }
}
