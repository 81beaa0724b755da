/// Authentication middleware layers
///
/// Both layers are attached with `axum::middleware::from_fn_with_state`,
/// so the secret and the pool come from [`AppState`] rather than globals.
///
/// ```text
/// request ─> jwt_auth_layer ─> admin_only_layer ─> handler
///              │ 401              │ 401 / 403 / 500
/// ```
///
/// `admin_only_layer` sits on an inner router so that `jwt_auth_layer`,
/// applied to the outer router, always runs first.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use okefin_shared::auth::middleware::{authenticate_bearer, require_admin, AuthContext};

use crate::{app::AppState, error::ApiError};

/// Validates the bearer token and inserts [`AuthContext`] into request extensions
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate_bearer(req.headers(), state.jwt_secret())?;

    tracing::debug!(user_id = auth.user_id, "Authenticated request");
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Lets only administrators through; must run after [`jwt_auth_layer`]
pub async fn admin_only_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    require_admin(&state.db, &auth).await?;

    Ok(next.run(req).await)
}
