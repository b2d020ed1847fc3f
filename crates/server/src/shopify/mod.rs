//! Shopify Admin API client for catalog queries.
//!
//! PageTest only ever asks the Admin API one thing: the full list of pages
//! and products (`{id, title}`) for a shop, so the merchant UI can render
//! checkboxes. Queries are plain GraphQL-over-JSON via `reqwest`; cursor
//! pagination is followed to exhaustion so callers always receive a fully
//! materialized list, with a safety cap against runaway catalogs.
//!
//! OAuth and per-shop token management belong to the embedding host; this
//! client is handed a ready access token via configuration.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use pagetest_core::{CatalogItem, ItemId, ShopDomain};

use crate::config::ShopifyAdminConfig;

/// Items fetched per pagination request (Admin API maximum).
const PAGE_SIZE: u32 = 250;

/// Safety cap to prevent runaway pagination on enormous catalogs.
const MAX_CATALOG_ITEMS: usize = 5000;

/// Error type for Admin API operations.
#[derive(Debug, thiserror::Error)]
pub enum ShopifyError {
    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the Admin API.
    #[error("admin api returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// GraphQL-level errors in an otherwise successful response.
    #[error("graphql errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Response body did not match the expected shape.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// The merchant's full catalog of pages and products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// All content pages.
    pub pages: Vec<CatalogItem>,
    /// All products.
    pub products: Vec<CatalogItem>,
}

/// Client for the Shopify Admin API.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    api_version: String,
    access_token: SecretString,
}

impl AdminClient {
    /// Create a new Admin API client.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                api_version: config.api_version.clone(),
                access_token: config.admin_token.clone(),
            }),
        }
    }

    fn endpoint(&self, shop: &ShopDomain) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            shop, self.inner.api_version
        )
    }

    /// Fetch the complete catalog for a shop.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on transport failure, non-success status, or
    /// an unexpected response shape.
    #[instrument(skip(self), fields(shop = %shop))]
    pub async fn fetch_catalog(&self, shop: &ShopDomain) -> Result<Catalog, ShopifyError> {
        let pages = self.fetch_connection(shop, "pages").await?;
        let products = self.fetch_connection(shop, "products").await?;
        tracing::info!(
            pages = pages.len(),
            products = products.len(),
            "Fetched catalog"
        );
        Ok(Catalog { pages, products })
    }

    /// Fetch all nodes of one connection (`pages` or `products`), following
    /// cursor pagination until exhausted or the safety cap is hit.
    async fn fetch_connection(
        &self,
        shop: &ShopDomain,
        field: &'static str,
    ) -> Result<Vec<CatalogItem>, ShopifyError> {
        let query = format!(
            "query Catalog($first: Int!, $after: String) {{
                {field}(first: $first, after: $after) {{
                    edges {{ node {{ id title }} }}
                    pageInfo {{ hasNextPage endCursor }}
                }}
            }}"
        );

        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data = self
                .execute(shop, &query, json!({ "first": PAGE_SIZE, "after": cursor }))
                .await?;
            let connection = parse_connection(&data, field)?;

            for node in connection.edges {
                if let Some(id) = ItemId::canonicalize(&node.node.id) {
                    items.push(CatalogItem {
                        id,
                        title: node.node.title,
                    });
                }
            }

            if items.len() >= MAX_CATALOG_ITEMS {
                tracing::warn!(
                    field,
                    count = items.len(),
                    "Catalog pagination hit safety cap, stopping"
                );
                break;
            }

            if !connection.page_info.has_next_page {
                break;
            }
            cursor = connection.page_info.end_cursor;
            if cursor.is_none() {
                // Defect in the upstream response; stop rather than loop
                break;
            }
        }

        Ok(items)
    }

    /// Execute one GraphQL request and return the `data` object.
    async fn execute(
        &self,
        shop: &ShopDomain,
        query: &str,
        variables: Value,
    ) -> Result<Value, ShopifyError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(shop))
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShopifyError::Status {
                status: status.as_u16(),
            });
        }

        let body: GraphQlResponse = response.json().await?;

        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            return Err(ShopifyError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        body.data
            .ok_or_else(|| ShopifyError::Shape("response missing data".to_owned()))
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Connection {
    edges: Vec<Edge>,
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Node,
}

#[derive(Debug, Deserialize)]
struct Node {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

/// Pull one named connection out of a GraphQL `data` object.
fn parse_connection(data: &Value, field: &str) -> Result<Connection, ShopifyError> {
    let value = data
        .get(field)
        .ok_or_else(|| ShopifyError::Shape(format!("response missing '{field}'")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| ShopifyError::Shape(format!("invalid '{field}' connection: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connection() {
        let data = json!({
            "pages": {
                "edges": [
                    { "node": { "id": "gid://shopify/Page/1", "title": "About" } },
                    { "node": { "id": "gid://shopify/Page/2", "title": "FAQ" } }
                ],
                "pageInfo": { "hasNextPage": true, "endCursor": "abc" }
            }
        });

        let connection = parse_connection(&data, "pages").unwrap();
        assert_eq!(connection.edges.len(), 2);
        assert!(connection.page_info.has_next_page);
        assert_eq!(connection.page_info.end_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_connection_missing_field() {
        let data = json!({ "pages": {} });
        assert!(matches!(
            parse_connection(&data, "products"),
            Err(ShopifyError::Shape(_))
        ));
    }

    #[test]
    fn test_parse_connection_null_cursor_on_last_page() {
        let data = json!({
            "products": {
                "edges": [],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            }
        });

        let connection = parse_connection(&data, "products").unwrap();
        assert!(!connection.page_info.has_next_page);
        assert!(connection.page_info.end_cursor.is_none());
    }

    #[test]
    fn test_endpoint_format() {
        let client = AdminClient::new(&ShopifyAdminConfig {
            api_version: "2026-01".to_owned(),
            admin_token: SecretString::from("shpat_abc"),
        });
        let shop = ShopDomain::parse("shop-a.myshopify.com").unwrap();
        assert_eq!(
            client.endpoint(&shop),
            "https://shop-a.myshopify.com/admin/api/2026-01/graphql.json"
        );
    }
}
