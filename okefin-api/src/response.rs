/// Success envelope
///
/// ```json
/// { "status": true, "message": "Succeed to GET data", "errors": null, "data": { ... } }
/// ```
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const GET_OK: &str = "Succeed to GET data";
pub const POST_OK: &str = "Succeed to POST data";
pub const PUT_OK: &str = "Succeed to PUT data";
pub const DELETE_OK: &str = "Succeed to DELETE data";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    code: StatusCode,

    pub status: bool,
    pub message: String,
    pub errors: Option<Vec<String>>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, data)
    }

    /// 201 Created
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    fn with_status(code: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            code,
            status: true,
            message: message.into(),
            errors: None,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_created_envelope() {
        let response = ApiResponse::created("Succeed to POST data", 7).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({
            "status": true,
            "message": "Succeed to POST data",
            "errors": null,
            "data": 7
        }));
    }
}
