mod common;

use common::{endpoints, handle, StubFetch};
use forgemail_core::{Discovery, Email, Relation};
use forgemail_gateway::RateLimitState;
use forgemail_scanner::{
    AddressRegistry, ExtractionChain, GraphExpander, Orchestrator, RunMode,
};
use std::sync::Arc;
use tokio::sync::mpsc;

const NOREPLY: &str = "@users.noreply.github.com";

const FOLLOWERS_PAGE: &str = r#"
    <html><body>
        <img alt="@alice" src="/avatars/1" />
        <img alt="@bob" src="/avatars/2" />
        <img alt="@octocat" src="/avatars/3" />
    </body></html>
"#;

fn email(address: &str) -> Email {
    Email::new(address).expect("valid test address")
}

struct Harness {
    orchestrator: Orchestrator,
    events: mpsc::UnboundedReceiver<Discovery>,
}

fn harness(stub: Arc<StubFetch>, rate_limit: Arc<RateLimitState>, mode: RunMode) -> Harness {
    let eps = endpoints();
    let chain = Arc::new(ExtractionChain::new(
        stub.clone(),
        rate_limit,
        eps.clone(),
    ));
    let registry = Arc::new(AddressRegistry::new(NOREPLY));
    let expander = GraphExpander::new(stub, eps);

    let (sender, events) = mpsc::unbounded_channel();
    Harness {
        orchestrator: Orchestrator::new(chain, registry, expander, mode, sender),
        events,
    }
}

async fn drain(mut events: mpsc::UnboundedReceiver<Discovery>) -> Vec<Discovery> {
    let mut seen = Vec::new();
    while let Some(discovery) = events.recv().await {
        seen.push(discovery);
    }
    seen
}

#[tokio::test]
async fn seed_only_run_scans_one_account() {
    let eps = endpoints();
    let seed = handle("octocat");
    let rate_limit = Arc::new(RateLimitState::new());

    let stub = Arc::new(
        StubFetch::new(rate_limit.clone()).on(eps.metadata(&seed), r#"{"email":"a@b.com"}"#),
    );
    let Harness {
        orchestrator,
        events,
    } = harness(stub, rate_limit, RunMode::Addresses);

    let summary = orchestrator.run(seed, None, 1).await;
    assert_eq!(summary.accounts_scanned, 1);
    assert_eq!(summary.addresses, vec![email("a@b.com")]);

    drop(orchestrator);
    let discoveries = drain(events).await;
    assert_eq!(discoveries, vec![Discovery::Address(email("a@b.com"))]);
}

#[tokio::test]
async fn follower_expansion_scans_seed_and_each_peer() {
    let eps = endpoints();
    let seed = handle("octocat");
    let rate_limit = Arc::new(RateLimitState::new());

    let stub = Arc::new(
        StubFetch::new(rate_limit.clone())
            .on(eps.relation(&seed, Relation::Followers, 1), FOLLOWERS_PAGE)
            .on(eps.metadata(&seed), r#"{"email":"seed@example.com"}"#)
            .on(
                eps.metadata(&handle("alice")),
                r#"{"email":"alice@example.com"}"#,
            )
            .on(
                eps.metadata(&handle("bob")),
                r#"{"email":"bob@example.com"}"#,
            ),
    );
    let Harness {
        orchestrator,
        events,
    } = harness(stub, rate_limit, RunMode::Addresses);

    let summary = orchestrator.run(seed, Some(Relation::Followers), 1).await;

    // Seed plus two peers; the seed's own avatar on the listing page is
    // not scheduled twice
    assert_eq!(summary.accounts_scanned, 3);
    assert_eq!(
        summary.addresses,
        vec![
            email("alice@example.com"),
            email("bob@example.com"),
            email("seed@example.com"),
        ]
    );

    drop(orchestrator);
    assert_eq!(drain(events).await.len(), 3);
}

#[tokio::test]
async fn duplicate_addresses_across_accounts_emitted_once() {
    let eps = endpoints();
    let seed = handle("octocat");
    let rate_limit = Arc::new(RateLimitState::new());

    let stub = Arc::new(
        StubFetch::new(rate_limit.clone())
            .on(eps.relation(&seed, Relation::Following, 1), FOLLOWERS_PAGE)
            .on(eps.metadata(&seed), r#"{"email":"shared@example.com"}"#)
            .on(
                eps.metadata(&handle("alice")),
                r#"{"email":"shared@example.com"}"#,
            )
            .on(
                eps.metadata(&handle("bob")),
                r#"{"email":"shared@example.com"}"#,
            ),
    );
    let Harness {
        orchestrator,
        events,
    } = harness(stub, rate_limit, RunMode::Addresses);

    let summary = orchestrator.run(seed, Some(Relation::Following), 1).await;
    assert_eq!(summary.accounts_scanned, 3);
    assert_eq!(summary.addresses, vec![email("shared@example.com")]);

    drop(orchestrator);
    assert_eq!(drain(events).await.len(), 1);
}

#[tokio::test]
async fn handles_only_mode_bypasses_the_chain() {
    let eps = endpoints();
    let seed = handle("octocat");
    let rate_limit = Arc::new(RateLimitState::new());

    let stub = Arc::new(
        StubFetch::new(rate_limit.clone())
            .on(eps.relation(&seed, Relation::Followers, 1), FOLLOWERS_PAGE),
    );
    let Harness {
        orchestrator,
        events,
    } = harness(stub.clone(), rate_limit, RunMode::HandlesOnly);

    let summary = orchestrator.run(seed.clone(), Some(Relation::Followers), 1).await;
    assert_eq!(summary.accounts_scanned, 3);
    assert!(summary.addresses.is_empty());

    drop(orchestrator);
    let mut peers: Vec<String> = drain(events)
        .await
        .into_iter()
        .map(|discovery| discovery.to_string())
        .collect();
    peers.sort();
    assert_eq!(peers, vec!["alice", "bob", "octocat"]);

    // Only the listing page was fetched; no extraction endpoints
    assert_eq!(stub.calls(), vec![eps.relation(&seed, Relation::Followers, 1)]);
}

#[tokio::test]
async fn placeholder_addresses_never_reach_the_output() {
    let eps = endpoints();
    let seed = handle("octocat");
    let rate_limit = Arc::new(RateLimitState::new());

    let stub = Arc::new(StubFetch::new(rate_limit.clone()).on(
        eps.metadata(&seed),
        r#"{"email":"12345+octocat@users.noreply.github.com"}"#,
    ));
    let Harness {
        orchestrator,
        events,
    } = harness(stub, rate_limit, RunMode::Addresses);

    let summary = orchestrator.run(seed, None, 1).await;
    assert_eq!(summary.accounts_scanned, 1);
    assert!(summary.addresses.is_empty());

    drop(orchestrator);
    assert!(drain(events).await.is_empty());
}

#[tokio::test]
async fn failed_listing_fetch_still_scans_the_seed() {
    let eps = endpoints();
    let seed = handle("octocat");
    let rate_limit = Arc::new(RateLimitState::new());

    // No listing response registered: expansion yields an empty page
    let stub = Arc::new(
        StubFetch::new(rate_limit.clone()).on(eps.metadata(&seed), r#"{"email":"a@b.com"}"#),
    );
    let Harness {
        orchestrator,
        events: _events,
    } = harness(stub, rate_limit, RunMode::Addresses);

    let summary = orchestrator.run(seed, Some(Relation::Followers), 1).await;
    assert_eq!(summary.accounts_scanned, 1);
    assert_eq!(summary.addresses, vec![email("a@b.com")]);
}

#[tokio::test]
async fn second_listing_page_is_requested_with_its_page_parameter() {
    let eps = endpoints();
    let seed = handle("octocat");
    let rate_limit = Arc::new(RateLimitState::new());

    let stub = Arc::new(
        StubFetch::new(rate_limit.clone())
            .on(eps.relation(&seed, Relation::Followers, 2), FOLLOWERS_PAGE)
            .on(eps.metadata(&seed), r#"{}"#)
            .on(eps.profile(&seed), "<html></html>")
            .on(eps.repositories(&seed), "[]")
            .on(eps.metadata(&handle("alice")), r#"{"email":"alice@example.com"}"#)
            .on(eps.metadata(&handle("bob")), r#"{"email":"bob@example.com"}"#),
    );
    let Harness {
        orchestrator,
        events: _events,
    } = harness(stub.clone(), rate_limit, RunMode::Addresses);

    let summary = orchestrator.run(seed.clone(), Some(Relation::Followers), 2).await;
    assert_eq!(summary.accounts_scanned, 3);
    assert!(stub.was_called("https://github.com/octocat/followers?page=2"));
}
