//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Role;
use crate::errors::AppError;

/// Authenticated caller extracted from a validated token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    /// `None` when the token names a role this service does not know
    pub role: Option<Role>,
}

/// JWT authentication middleware.
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let id = claims.sub.parse::<i32>().map_err(|_| {
        tracing::debug!(sub = %claims.sub, "Token subject is not an identity id");
        AppError::Unauthorized
    })?;

    let current_user = CurrentUser {
        id,
        role: Role::parse(&claims.role),
        username: claims.name,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
