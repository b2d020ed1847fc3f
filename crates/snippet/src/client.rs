//! Lookup API client.
//!
//! Talks to the server's public `/api/selections` endpoint. Every failure
//! mode (network, non-2xx, malformed body) degrades to an empty selection:
//! the page a visitor is on must render normally whether or not we can
//! reach the server.

use std::time::Duration;

use pagetest_core::{SelectionSet, SelectionType, ShopDomain};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// How long a lookup may take before we give up and treat the page as not
/// under test.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from building or using the lookup client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured API base URL could not be parsed.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration for one storefront installation of the snippet.
#[derive(Debug, Clone)]
pub struct SnippetConfig {
    /// Base URL of the lookup server (e.g. `https://app.pagetest.ai`).
    pub api_base_url: String,
    /// The shop this storefront belongs to.
    pub shop_domain: ShopDomain,
    /// URL of the testing script to inject on selected pages.
    pub script_url: String,
    /// Opaque team identifier handed to the testing script, if any.
    pub team_hash: Option<String>,
}

/// Client for the public selection lookup endpoint.
#[derive(Debug, Clone)]
pub struct LookupClient {
    client: reqwest::Client,
    endpoint: Url,
    shop_domain: ShopDomain,
}

impl LookupClient {
    /// Create a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the base URL is malformed or the HTTP
    /// client cannot be built.
    pub fn new(config: &SnippetConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.api_base_url)?;
        let endpoint = base.join("/api/selections")?;
        let client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint,
            shop_domain: config.shop_domain.clone(),
        })
    }

    /// Fetch the selection of one type for this shop.
    ///
    /// Infallible by design: any error is logged and collapses to an empty
    /// selection, which downstream reads as "nothing under test".
    pub async fn fetch(&self, selection_type: SelectionType) -> SelectionSet {
        match self.try_fetch(selection_type).await {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(error = %e, "Selection lookup failed, treating page as not selected");
                SelectionSet::default()
            }
        }
    }

    async fn try_fetch(&self, selection_type: SelectionType) -> Result<SelectionSet, reqwest::Error> {
        let body: Value = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("domain", self.shop_domain.as_str()),
                ("type", selection_type.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_selection(&body, selection_type))
    }
}

/// Pull the requested list out of a lookup response body.
///
/// Tolerant of shape drift: a missing field or non-string entries read as
/// empty, never as an error.
fn parse_selection(body: &Value, selection_type: SelectionType) -> SelectionSet {
    let raw: Vec<String> = body
        .get(selection_type.field_name())
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    SelectionSet::from_raw(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pagetest_core::ItemId;
    use serde_json::json;

    fn config(base: &str) -> SnippetConfig {
        SnippetConfig {
            api_base_url: base.to_owned(),
            shop_domain: ShopDomain::parse("shop-a.myshopify.com").unwrap(),
            script_url: "https://cdn.pagetest.ai/test.js".to_owned(),
            team_hash: None,
        }
    }

    #[test]
    fn test_new_rejects_malformed_base_url() {
        assert!(LookupClient::new(&config("not a url")).is_err());
    }

    #[test]
    fn test_parse_selection_reads_requested_field() {
        let body = json!({ "selectedPages": ["1", "2"] });
        let set = parse_selection(&body, SelectionType::Pages);
        assert!(set.contains(&ItemId::canonicalize("1").unwrap()));
        assert!(set.contains(&ItemId::canonicalize("2").unwrap()));
    }

    #[test]
    fn test_parse_selection_missing_field_is_empty() {
        let body = json!({ "selectedProducts": ["101"] });
        assert!(parse_selection(&body, SelectionType::Pages).is_empty());
    }

    #[test]
    fn test_parse_selection_ignores_non_strings() {
        let body = json!({ "selectedPages": ["1", 2, null] });
        let set = parse_selection(&body, SelectionType::Pages);
        assert_eq!(set.to_strings(), ["1"]);
    }

    #[tokio::test]
    async fn test_fetch_fails_open_when_unreachable() {
        // Nothing listens on this port; the lookup must degrade to empty
        let client = LookupClient::new(&config("http://127.0.0.1:1")).unwrap();
        let set = client.fetch(SelectionType::Pages).await;
        assert!(set.is_empty());
    }
}
