//! One-hop social graph expansion from relation listing pages.

use crate::urls::Endpoints;
use forgemail_core::{Handle, Relation, RelationPage};
use forgemail_gateway::Fetch;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches one page of an account's relation listing and yields the
/// peer handles found on it.
///
/// Expansion is strictly one hop: this type is invoked once per run for
/// the seed account and never recurses into the returned peers' own
/// listings. A full listing page holds at most about 50 peers, which
/// naturally bounds the task fan-out per run.
pub struct GraphExpander {
    fetcher: Arc<dyn Fetch>,
    endpoints: Endpoints,
}

impl GraphExpander {
    /// Create an expander over the given fetcher.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetch>, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    /// Fetch the requested listing page and parse peer handles out of
    /// it. The seed account itself is always excluded. A failed fetch
    /// (including a rate limit) yields an empty page.
    pub async fn expand(&self, seed: &Handle, relation: Relation, page: u32) -> RelationPage {
        let url = self.endpoints.relation(seed, relation, page);

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(err) => {
                warn!(account = %seed, %relation, %err, "relation listing fetch failed");
                return RelationPage {
                    handles: Vec::new(),
                    page,
                };
            }
        };

        let handles = parse_avatar_labels(&String::from_utf8_lossy(&body), seed);
        debug!(account = %seed, %relation, page, peers = handles.len(), "parsed relation listing");

        RelationPage { handles, page }
    }
}

/// Peer handles appear as avatar labels of the form `@handle` in the
/// listing markup. Preserves page order and drops repeats and the seed.
fn parse_avatar_labels(html: &str, seed: &Handle) -> Vec<Handle> {
    let selector =
        Selector::parse(r#"img[alt^="@"]"#).expect("avatar selector is hardcoded and valid");
    let document = Html::parse_document(html);

    let mut handles = Vec::new();
    let mut seen = HashSet::new();

    for element in document.select(&selector) {
        let Some(alt) = element.value().attr("alt") else {
            continue;
        };
        let Some(name) = alt.strip_prefix('@') else {
            continue;
        };
        if name == seed.as_str() {
            continue;
        }
        let Ok(handle) = Handle::new(name) else {
            continue;
        };
        if seen.insert(handle.clone()) {
            handles.push(handle);
        }
    }

    handles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> Handle {
        Handle::new(name).expect("valid handle")
    }

    const LISTING: &str = r#"
        <html><body>
            <img alt="@alice" src="/avatars/1" />
            <img alt="@bob" src="/avatars/2" />
            <img alt="decorative banner" src="/banner.png" />
            <img alt="@octocat" src="/avatars/3" />
            <img alt="@alice" src="/avatars/1" />
        </body></html>
    "#;

    #[test]
    fn test_parse_avatar_labels_in_page_order() {
        let peers = parse_avatar_labels(LISTING, &handle("octocat"));
        let peers: Vec<&str> = peers.iter().map(Handle::as_str).collect();
        assert_eq!(peers, vec!["alice", "bob"]);
    }

    #[test]
    fn test_seed_is_excluded() {
        let peers = parse_avatar_labels(LISTING, &handle("alice"));
        let peers: Vec<&str> = peers.iter().map(Handle::as_str).collect();
        assert_eq!(peers, vec!["bob", "octocat"]);
    }

    #[test]
    fn test_no_avatars_is_a_clean_empty_result() {
        let peers = parse_avatar_labels("<html><body>nothing here</body></html>", &handle("x"));
        assert!(peers.is_empty());
    }
}
