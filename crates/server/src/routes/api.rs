//! Public selection lookup endpoint.
//!
//! Called from arbitrary storefront pages with no session, so it is
//! unauthenticated and CORS-open by design. It exposes nothing beyond the
//! requested identifier set for a domain - an accepted information
//! exposure, since anyone who knows a domain can learn which of its pages
//! are under test but not titles or any broader shop data.
//!
//! Responses are `Cache-Control: no-store`: intermediaries never cache, and
//! the only staleness a storefront can observe is the server's own 60-second
//! in-process cache (invalidated on save).

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, header},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::instrument;

use pagetest_core::{SelectionType, ShopDomain};

use crate::db::ShopRepository;
use crate::error::{AppError, Result};
use crate::services::SelectionSyncService;
use crate::state::AppState;

/// Query parameters for the lookup endpoint.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    /// Shop domain to look up.
    pub domain: Option<String>,
    /// Which list to return: `pages` or `products`.
    #[serde(rename = "type")]
    pub selection_type: Option<String>,
}

/// Validate lookup parameters.
///
/// Both are required: a missing or malformed domain and any `type` outside
/// `pages`/`products` are client errors, never server errors.
fn validate_params(params: &LookupParams) -> Result<(ShopDomain, SelectionType)> {
    let raw_domain = params.domain.as_deref().unwrap_or("");
    if raw_domain.trim().is_empty() {
        return Err(AppError::BadRequest("Missing shop domain".to_owned()));
    }
    let domain = ShopDomain::parse(raw_domain)
        .map_err(|_| AppError::BadRequest("Invalid shop domain".to_owned()))?;

    let selection_type = params
        .selection_type
        .as_deref()
        .unwrap_or("")
        .parse::<SelectionType>()
        .map_err(|_| AppError::BadRequest("Invalid data type".to_owned()))?;

    Ok((domain, selection_type))
}

/// Look up the selected identifiers of one type for a domain.
///
/// A domain with no record answers with an empty list, not an error - the
/// storefront must never be blocked by a missing record. Only the requested
/// field is returned.
///
/// # Errors
///
/// Returns 400 for a missing/invalid `domain` or `type`.
#[instrument(skip(state))]
pub async fn selections(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<impl IntoResponse> {
    let (domain, selection_type) = validate_params(&params)?;

    let fetch_state = state.clone();
    let fetch_domain = domain.clone();
    let items = state
        .lookup_cache()
        .try_get_with((domain, selection_type), async move {
            let service = SelectionSyncService::new(ShopRepository::new(fetch_state.pool()));
            service
                .selections_for(&fetch_domain, selection_type)
                .await
                .map(|set| set.to_strings())
        })
        .await
        .map_err(|e| AppError::Internal(format!("selection lookup failed: {e}")))?;

    let mut body = serde_json::Map::new();
    body.insert(selection_type.field_name().to_owned(), Value::from(items));

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(Value::Object(body)),
    ))
}

/// Create the public API router with permissive CORS.
pub fn router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/selections", get(selections))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(domain: Option<&str>, selection_type: Option<&str>) -> LookupParams {
        LookupParams {
            domain: domain.map(ToOwned::to_owned),
            selection_type: selection_type.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn test_validate_params_ok() {
        let (domain, selection_type) =
            validate_params(&params(Some("shop-a.myshopify.com"), Some("pages")))
                .expect("valid params");
        assert_eq!(domain.as_str(), "shop-a.myshopify.com");
        assert_eq!(selection_type, SelectionType::Pages);
    }

    #[test]
    fn test_validate_params_missing_domain() {
        assert!(matches!(
            validate_params(&params(None, Some("pages"))),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_params(&params(Some("  "), Some("pages"))),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_params_invalid_type() {
        assert!(matches!(
            validate_params(&params(Some("shop-a.myshopify.com"), None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_params(&params(Some("shop-a.myshopify.com"), Some("collections"))),
            Err(AppError::BadRequest(_))
        ));
    }
}
