//! Storefront snippet asset route.
//!
//! Serves the browser-side loader that the platform's script tag points at.
//! The asset is compiled in and only needs the server's public URL patched
//! into it, so it is cacheable for an hour - unlike selection lookups, a
//! stale loader is harmless (the decision logic it runs is unchanged).

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::instrument;

use crate::state::AppState;

/// The decision snippet, with the app URL left as a placeholder.
const SNIPPET_SOURCE: &str = include_str!("../../assets/snippet.js");

/// Placeholder token replaced with the configured base URL.
const APP_URL_PLACEHOLDER: &str = "__PAGETEST_APP_URL__";

/// Serve the decision snippet with the app URL substituted.
#[instrument(skip(state))]
pub async fn serve(State(state): State<AppState>) -> impl IntoResponse {
    let body = SNIPPET_SOURCE.replace(APP_URL_PLACEHOLDER, &state.config().base_url);

    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    )
}

/// Create the snippet router (CORS-open, like the public API).
pub fn router() -> Router<AppState> {
    let cors = CorsLayer::new().allow_origin(Any);

    Router::new().route("/snippet.js", get(serve).layer(cors))
}
