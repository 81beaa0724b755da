/// User profile endpoints
///
/// # Endpoints
///
/// - `GET /user/my` - Own profile with province and city names
/// - `PUT /user/my` - Partial profile update
/// - `GET /user` - Paginated user list
/// - `GET /user/:id` - User by id

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiPath, PageParams, ValidJson},
    response::{ApiResponse, GET_OK, PUT_OK},
};
use axum::{extract::State, Extension};
use chrono::NaiveDate;
use okefin_shared::{
    auth::middleware::AuthContext,
    pagination::Page,
    region::{City, Province},
    services::{self, users::ProfileChanges, Profile},
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail};

/// User as returned to clients
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub nama: String,
    pub no_telp: String,
    /// `YYYY-MM-DD`, or empty when unknown
    pub tanggal_lahir: String,
    pub jenis_kelamin: String,
    pub tentang: String,
    pub pekerjaan: String,
    pub email: String,
    pub id_provinsi: Option<Province>,
    pub id_kota: Option<City>,
    pub is_admin: bool,
}

pub(crate) fn format_birth_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

impl From<Profile> for UserResponse {
    fn from(profile: Profile) -> Self {
        let user = profile.user;
        Self {
            id: user.id,
            nama: user.name,
            no_telp: user.phone,
            tanggal_lahir: format_birth_date(user.birth_date),
            jenis_kelamin: user.gender,
            tentang: user.about,
            pekerjaan: user.occupation,
            email: user.email,
            id_provinsi: profile.region.province,
            id_kota: profile.region.city,
            is_admin: user.is_admin,
        }
    }
}

/// Profile update; omitted or empty fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255, message = "nama must be at most 255 characters"))]
    pub nama: String,

    pub tanggal_lahir: String,

    #[validate(length(max = 255, message = "jenis_kelamin must be at most 255 characters"))]
    pub jenis_kelamin: String,

    pub tentang: String,

    #[validate(length(max = 255, message = "pekerjaan must be at most 255 characters"))]
    pub pekerjaan: String,

    #[validate(length(max = 255, message = "email must be at most 255 characters"))]
    pub email: String,

    #[validate(length(max = 255, message = "id_provinsi must be at most 255 characters"))]
    pub id_provinsi: String,

    #[validate(length(max = 255, message = "id_kota must be at most 255 characters"))]
    pub id_kota: String,
}

impl UpdateProfileRequest {
    fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            name: Some(self.nama),
            birth_date: Some(self.tanggal_lahir),
            gender: Some(self.jenis_kelamin),
            about: Some(self.tentang),
            occupation: Some(self.pekerjaan),
            email: Some(self.email),
            province_id: Some(self.id_provinsi),
            city_id: Some(self.id_kota),
        }
    }
}

pub async fn get_my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let profile = services::users::get_profile(&state.db, state.region.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(GET_OK, profile.into()))
}

/// Partial profile update
///
/// # Errors
///
/// - `400 Bad Request`: Invalid email or birth date format
/// - `409 Conflict`: Email belongs to another user
pub async fn update_my_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> ApiResult<ApiResponse<UserResponse>> {
    if !req.email.trim().is_empty() && !req.email.validate_email() {
        return Err(ApiError::BadRequest("email is invalid".to_string()));
    }

    let profile = services::users::update_profile(
        &state.db,
        state.region.as_ref(),
        auth.user_id,
        req.into_changes(),
    )
    .await?;

    Ok(ApiResponse::ok(PUT_OK, profile.into()))
}

pub async fn list_users(
    State(state): State<AppState>,
    PageParams(pagination): PageParams,
) -> ApiResult<ApiResponse<Page<UserResponse>>> {
    let page = services::users::list_users(&state.db, state.region.as_ref(), pagination).await?;
    Ok(ApiResponse::ok(GET_OK, page.map(UserResponse::from)))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ApiResponse<UserResponse>> {
    let profile = services::users::get_user(&state.db, state.region.as_ref(), id).await?;
    Ok(ApiResponse::ok(GET_OK, profile.into()))
}
