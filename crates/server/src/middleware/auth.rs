//! Authentication extractor for merchant-facing routes.
//!
//! The OAuth dance with the commerce platform is owned by the embedding
//! host; by the time a request reaches `/app/*` the host has verified the
//! merchant session and attached the shared bearer token. This extractor
//! checks that token. The public lookup endpoint and the snippet asset are
//! deliberately unauthenticated and never use it.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires the configured admin bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     _auth: RequireAdminToken,
///     State(state): State<AppState>,
/// ) -> Result<impl IntoResponse> { ... }
/// ```
#[derive(Debug)]
pub struct RequireAdminToken;

impl FromRequestParts<AppState> for RequireAdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        if token != state.config().admin_token.expose_secret() {
            return Err(AppError::Unauthorized);
        }

        Ok(Self)
    }
}
