//! Merchant-facing app routes.
//!
//! Everything under `/app` requires the host-verified bearer token (see
//! [`crate::middleware::auth`]). These routes back the embedded settings UI:
//! loading the catalog, reading the current selection, saving a new one, and
//! the uninstall cleanup hook.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pagetest_core::{CatalogItem, SelectionSubmission, ShopDomain, ShopSelection};

use crate::db::ShopRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminToken;
use crate::services::{SaveResult, SelectionSyncService};
use crate::state::AppState;

/// An identifier list as it arrives on the wire.
///
/// The embedded UI posts JSON arrays; older form-encoded clients send
/// comma-joined strings. Both normalize to the same list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    /// A structured list.
    List(Vec<String>),
    /// A comma-joined string.
    Joined(String),
}

impl Default for StringList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl StringList {
    /// Flatten to a plain list of raw identifier strings.
    ///
    /// Empty segments survive here; submission normalization filters them.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Joined(joined) => joined.split(',').map(|s| s.trim().to_owned()).collect(),
        }
    }
}

/// Body of a save request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSelectionsRequest {
    /// Shop domain the selection belongs to.
    pub domain: String,
    /// Raw page identifiers.
    #[serde(default)]
    pub selected_pages: StringList,
    /// Raw product identifiers.
    #[serde(default)]
    pub selected_products: StringList,
}

/// Query parameter carrying a shop domain.
#[derive(Debug, Deserialize)]
pub struct DomainParam {
    /// Shop domain.
    pub domain: String,
}

/// Response body for the catalog endpoint.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// The shop the catalog belongs to.
    pub shop: ShopDomain,
    /// All content pages.
    pub pages: Vec<CatalogItem>,
    /// All products.
    pub products: Vec<CatalogItem>,
}

fn parse_domain(raw: &str) -> Result<ShopDomain> {
    ShopDomain::parse(raw).map_err(|_| AppError::BadRequest("Invalid shop domain".to_owned()))
}

/// Save (replace) the selection for a shop.
///
/// Always answers 200 with a `{success, message}` body; persistence
/// failures are logged server-side and reported generically.
#[instrument(skip(state, request), fields(domain = %request.domain))]
pub async fn save_selections(
    _auth: RequireAdminToken,
    State(state): State<AppState>,
    Json(request): Json<SaveSelectionsRequest>,
) -> Json<SaveResult> {
    let raw_domain = request.domain.clone();
    let submission = SelectionSubmission {
        domain: request.domain,
        pages: request.selected_pages.into_vec(),
        products: request.selected_products.into_vec(),
    };

    let service = SelectionSyncService::new(ShopRepository::new(state.pool()));
    let result = service.save(submission).await;

    if result.success
        && let Ok(domain) = ShopDomain::parse(&raw_domain)
    {
        state.invalidate_lookups(&domain).await;
    }

    Json(result)
}

/// Read the full selection record for a shop.
///
/// Unlike the public lookup, administrative callers get a true 404 for a
/// domain that was never installed, so "never installed" and "installed,
/// nothing selected" are distinguishable.
///
/// # Errors
///
/// Returns 400 for an invalid domain, 404 if no record exists.
#[instrument(skip(state))]
pub async fn get_selections(
    _auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(params): Query<DomainParam>,
) -> Result<Json<ShopSelection>> {
    let domain = parse_domain(&params.domain)?;

    let service = SelectionSyncService::new(ShopRepository::new(state.pool()));
    let record = service.record(&domain).await?;

    record
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Shop not found".to_owned()))
}

/// Load the shop's full catalog of pages and products for the settings UI.
///
/// This is also the "first authenticated access" touchpoint: an empty
/// selection record is created for the domain if none exists yet.
///
/// # Errors
///
/// Returns 400 for an invalid domain, 502 if the Admin API fails.
#[instrument(skip(state))]
pub async fn catalog(
    _auth: RequireAdminToken,
    State(state): State<AppState>,
    Query(params): Query<DomainParam>,
) -> Result<Json<CatalogResponse>> {
    let domain = parse_domain(&params.domain)?;

    let service = SelectionSyncService::new(ShopRepository::new(state.pool()));
    service.install(&domain).await?;

    let catalog = state.admin().fetch_catalog(&domain).await?;

    Ok(Json(CatalogResponse {
        shop: domain,
        pages: catalog.pages,
        products: catalog.products,
    }))
}

/// Body of an uninstall notification.
#[derive(Debug, Deserialize)]
pub struct UninstallRequest {
    /// Shop domain that uninstalled the app.
    pub domain: String,
}

/// Best-effort cleanup after an uninstall.
///
/// Always answers 200: cleanup is allowed to fail (orphaned records read as
/// empty selections), and the platform retries webhook delivery on non-2xx,
/// which a permanently failing delete would turn into a retry storm.
#[instrument(skip(state, request), fields(domain = %request.domain))]
pub async fn uninstalled(
    _auth: RequireAdminToken,
    State(state): State<AppState>,
    Json(request): Json<UninstallRequest>,
) -> StatusCode {
    match ShopDomain::parse(&request.domain) {
        Ok(domain) => {
            let service = SelectionSyncService::new(ShopRepository::new(state.pool()));
            service.uninstall(&domain).await;
            state.invalidate_lookups(&domain).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring uninstall for invalid domain");
        }
    }

    StatusCode::OK
}

/// Create the merchant app router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog))
        .route("/selections", get(get_selections).post(save_selections))
        .route("/uninstalled", post(uninstalled))
}
