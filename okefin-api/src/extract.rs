/// Request extractors that reject with [`ApiError`]
///
/// Axum's own `Json`, `Path`, and `Query` reject with plain-text bodies.
/// These wrappers run them and convert the rejection, so malformed requests
/// get the JSON error envelope like every other failure.
///
/// - [`ValidJson`]: JSON body, then `validator` checks
/// - [`ApiPath`]: path parameters
/// - [`PageParams`]: `page` and `limit` query parameters, normalized
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use okefin_shared::pagination::Pagination;
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed validation
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug, Deserialize)]
struct RawPageQuery {
    page: Option<String>,
    limit: Option<String>,
}

/// Pagination from the query string
///
/// Bad values never reject; they fall back to the defaults.
pub struct PageParams(pub Pagination);

#[async_trait]
impl<S> FromRequestParts<S> for PageParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pagination = match Query::<RawPageQuery>::from_request_parts(parts, state).await {
            Ok(Query(raw)) => Pagination::from_raw(raw.page.as_deref(), raw.limit.as_deref()),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Unparseable query string, using default pagination");
                Pagination::default()
            }
        };
        Ok(Self(pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn page_params(uri: &str) -> Pagination {
        let request = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();
        PageParams::from_request_parts(&mut parts, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn test_page_params_defaults_and_clamping() {
        assert_eq!(page_params("/alamat").await, Pagination::new(1, 10));
        assert_eq!(page_params("/alamat?page=0&limit=-5").await, Pagination::new(1, 10));
        assert_eq!(page_params("/alamat?page=3&limit=500").await, Pagination { page: 3, limit: 100 });
        assert_eq!(page_params("/alamat?page=two&limit=x").await, Pagination::new(1, 10));
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Body1 {
        #[validate(length(min = 1, message = "nama is required"))]
        nama: String,
    }

    async fn valid_json(body: &str) -> Result<ValidJson<Body1>, ApiError> {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        ValidJson::<Body1>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_valid_json() {
        assert_eq!(valid_json(r#"{"nama":"Ana"}"#).await.unwrap().0.nama, "Ana");
        assert!(matches!(valid_json(r#"{"nama":""}"#).await, Err(ApiError::ValidationError(_))));
        assert!(matches!(valid_json("{not json").await, Err(ApiError::BadRequest(_))));
        assert!(matches!(valid_json(r#"{"other":1}"#).await, Err(ApiError::BadRequest(_))));
    }
}
