/// File upload endpoint
///
/// `POST /upload` takes a multipart body with a `file` field and stores it
/// under the configured upload directory, which is served back at
/// `/uploads/<name>`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{ApiResponse, POST_OK},
};
use axum::extract::{multipart::MultipartRejection, Multipart, State};
use okefin_shared::services;
use serde::Serialize;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Relative URL of the stored file
    pub url: String,
}

/// Upload a single file
///
/// # Errors
///
/// - `400 Bad Request`: Not a multipart body, no `file` field, or the body
///   exceeds the upload limit
/// - `500 Internal Server Error`: The file could not be written
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ApiResponse<UploadResponse>> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        let url = services::uploads::store_upload(&state.config.upload.dir, &original_name, &bytes).await?;
        return Ok(ApiResponse::created(POST_OK, UploadResponse { url }));
    }

    Err(ApiError::BadRequest("file is required".to_string()))
}
