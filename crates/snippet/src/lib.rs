//! Storefront decision logic.
//!
//! This crate is the native twin of the browser snippet the server ships at
//! `/snippet.js`: classify the page a visitor is on, look up the shop's
//! selection, and activate the testing script when - and only when - the
//! page is under test. Keeping the logic here lets the decision rules be
//! tested without a browser and reused by headless storefront renderers.
//!
//! The pure decision ([`decide`]) is separated from the effectful run loop
//! ([`Snippet::run`]) so membership semantics are testable without I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod page;

pub use client::{ClientError, LookupClient, SnippetConfig};
pub use page::{PageContext, PageKind, PageMeta};

use pagetest_core::SelectionSet;

/// The outcome of evaluating one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The page is not a product or content page; nothing to check.
    NotApplicable,
    /// The page kind is checkable but no resource identifier is known.
    NoIdentifier,
    /// The page has an identifier but it is not in the selection.
    NotSelected,
    /// The page is under test; the testing script should load.
    Activated,
}

/// Sink for the activation side effect.
///
/// The browser snippet appends a `<script>` tag; a headless renderer adds
/// the tag to its rendered document; tests record the call.
pub trait ScriptSink {
    /// Load the testing script. Called at most once per page view.
    fn inject_script(&mut self, script_url: &str);

    /// Expose the team identifier to the injected script, if configured.
    fn set_team_hash(&mut self, team_hash: &str);
}

/// Decide whether a page view activates the testing script.
///
/// Pure membership check: exact identifier equality against the selection,
/// never substring matching.
#[must_use]
pub fn decide(context: &PageContext, selection: &SelectionSet) -> Decision {
    if context.classify().selection_type().is_none() {
        return Decision::NotApplicable;
    }

    let Some(id) = context.resolve_item_id() else {
        return Decision::NoIdentifier;
    };

    if selection.contains(&id) {
        Decision::Activated
    } else {
        Decision::NotSelected
    }
}

/// The full snippet: lookup client plus activation state.
pub struct Snippet {
    config: SnippetConfig,
    client: LookupClient,
    activated: bool,
}

impl Snippet {
    /// Create a snippet for one storefront installation.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the lookup client cannot be built from the
    /// configuration.
    pub fn new(config: SnippetConfig) -> Result<Self, ClientError> {
        let client = LookupClient::new(&config)?;
        Ok(Self {
            config,
            client,
            activated: false,
        })
    }

    /// Evaluate a page view, activating the script through `sink` if the
    /// page is under test.
    ///
    /// Activation happens at most once per snippet instance; later calls
    /// still return [`Decision::Activated`] for selected pages but do not
    /// inject again. Lookup failures fail open as an empty selection.
    pub async fn run<S: ScriptSink>(&mut self, context: &PageContext, sink: &mut S) -> Decision {
        let Some(selection_type) = context.classify().selection_type() else {
            return Decision::NotApplicable;
        };

        let selection = self.client.fetch(selection_type).await;
        let decision = decide(context, &selection);

        if decision == Decision::Activated && !self.activated {
            if let Some(team_hash) = &self.config.team_hash {
                sink.set_team_hash(team_hash);
            }
            sink.inject_script(&self.config.script_url);
            self.activated = true;
        }

        decision
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_ctx(resource_id: Option<&str>) -> PageContext {
        PageContext {
            path: "/products/blue-shirt".to_owned(),
            meta: PageMeta {
                page_type: Some("product".to_owned()),
                resource_id: resource_id.map(ToOwned::to_owned),
            },
        }
    }

    #[test]
    fn test_decide_activates_on_exact_match() {
        let selection = SelectionSet::from_raw(["101", "102"]);
        assert_eq!(
            decide(&product_ctx(Some("101")), &selection),
            Decision::Activated
        );
    }

    #[test]
    fn test_decide_matches_gid_against_bare_selection() {
        let selection = SelectionSet::from_raw(["101"]);
        assert_eq!(
            decide(&product_ctx(Some("gid://shopify/Product/101")), &selection),
            Decision::Activated
        );
    }

    #[test]
    fn test_decide_rejects_near_miss_identifiers() {
        let selection = SelectionSet::from_raw(["101"]);
        assert_eq!(
            decide(&product_ctx(Some("10")), &selection),
            Decision::NotSelected
        );
        assert_eq!(
            decide(&product_ctx(Some("1011")), &selection),
            Decision::NotSelected
        );
    }

    #[test]
    fn test_decide_empty_selection_never_activates() {
        assert_eq!(
            decide(&product_ctx(Some("101")), &SelectionSet::new()),
            Decision::NotSelected
        );
    }

    #[test]
    fn test_decide_no_identifier() {
        let selection = SelectionSet::from_raw(["101"]);
        assert_eq!(decide(&product_ctx(None), &selection), Decision::NoIdentifier);
    }

    #[test]
    fn test_decide_not_applicable_for_other_pages() {
        let context = PageContext {
            path: "/cart".to_owned(),
            meta: PageMeta::default(),
        };
        assert_eq!(
            decide(&context, &SelectionSet::from_raw(["101"])),
            Decision::NotApplicable
        );
    }

    #[derive(Default)]
    struct RecordingSink {
        injected: Vec<String>,
        team_hash: Option<String>,
    }

    impl ScriptSink for RecordingSink {
        fn inject_script(&mut self, script_url: &str) {
            self.injected.push(script_url.to_owned());
        }

        fn set_team_hash(&mut self, team_hash: &str) {
            self.team_hash = Some(team_hash.to_owned());
        }
    }

    #[tokio::test]
    async fn test_run_fails_open_when_server_unreachable() {
        // Nothing listens on port 1; the lookup degrades to an empty
        // selection and the script must not load
        let config = SnippetConfig {
            api_base_url: "http://127.0.0.1:1".to_owned(),
            shop_domain: pagetest_core::ShopDomain::parse("shop-a.myshopify.com").unwrap(),
            script_url: "https://cdn.pagetest.ai/test.js".to_owned(),
            team_hash: Some("team-123".to_owned()),
        };
        let mut snippet = Snippet::new(config).unwrap();
        let mut sink = RecordingSink::default();

        let decision = snippet.run(&product_ctx(Some("101")), &mut sink).await;

        assert_eq!(decision, Decision::NotSelected);
        assert!(sink.injected.is_empty());
        assert!(sink.team_hash.is_none());
    }

    #[tokio::test]
    async fn test_run_skips_lookup_for_other_pages() {
        // No server exists, but non-checkable pages never need one
        let config = SnippetConfig {
            api_base_url: "http://127.0.0.1:1".to_owned(),
            shop_domain: pagetest_core::ShopDomain::parse("shop-a.myshopify.com").unwrap(),
            script_url: "https://cdn.pagetest.ai/test.js".to_owned(),
            team_hash: None,
        };
        let mut snippet = Snippet::new(config).unwrap();
        let mut sink = RecordingSink::default();

        let context = PageContext {
            path: "/cart".to_owned(),
            meta: PageMeta::default(),
        };
        let decision = snippet.run(&context, &mut sink).await;

        assert_eq!(decision, Decision::NotApplicable);
        assert!(sink.injected.is_empty());
    }
}
