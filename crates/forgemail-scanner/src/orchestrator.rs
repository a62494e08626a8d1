//! Run orchestration: task scheduling, draining, and result streaming.
//!
//! The orchestrator schedules one retrieval task for the seed account,
//! optionally one per peer from a single relation-listing page, and then
//! waits for the outstanding set to drain to zero. Tasks run as spawned
//! tokio tasks; the only throttle on network concurrency is the
//! gateway's token pool. Discoveries are streamed to the output channel
//! the moment the registry accepts them.

use crate::chain::ExtractionChain;
use crate::graph::GraphExpander;
use crate::registry::AddressRegistry;
use forgemail_core::{Discovery, Email, Handle, Relation};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// What each retrieval task yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Run the extraction chain and stream accepted addresses
    Addresses,
    /// Bypass the chain and stream the account handles themselves
    HandlesOnly,
}

/// Final state of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of retrieval tasks that ran to completion
    pub accounts_scanned: usize,
    /// The registry's final address set, sorted
    pub addresses: Vec<Email>,
}

/// Coordinates a whole run to a clean termination point.
pub struct Orchestrator {
    chain: Arc<ExtractionChain>,
    registry: Arc<AddressRegistry>,
    expander: GraphExpander,
    mode: RunMode,
    events: UnboundedSender<Discovery>,
}

impl Orchestrator {
    /// Wire up an orchestrator. Discoveries are streamed over `events`
    /// as they are accepted; the channel closes when the orchestrator is
    /// dropped.
    #[must_use]
    pub fn new(
        chain: Arc<ExtractionChain>,
        registry: Arc<AddressRegistry>,
        expander: GraphExpander,
        mode: RunMode,
        events: UnboundedSender<Discovery>,
    ) -> Self {
        Self {
            chain,
            registry,
            expander,
            mode,
            events,
        }
    }

    /// Run retrieval for the seed account and, when requested, for every
    /// peer on one page of its relation listing. Returns once every
    /// scheduled task has finished.
    ///
    /// A rate-limit trip part-way through degrades later strategies but
    /// never cancels a task: in-flight and not-yet-started tasks all run
    /// to completion.
    pub async fn run(
        &self,
        seed: Handle,
        expansion: Option<Relation>,
        page: u32,
    ) -> RunSummary {
        let mut outstanding = FuturesUnordered::new();
        outstanding.push(self.spawn_retrieval(seed.clone()));

        if let Some(relation) = expansion {
            let listing = self.expander.expand(&seed, relation, page).await;
            info!(
                account = %seed,
                %relation,
                page = listing.page,
                peers = listing.handles.len(),
                "expanding one hop"
            );
            for peer in listing.handles {
                outstanding.push(self.spawn_retrieval(peer));
            }
        }

        let mut accounts_scanned = 0;
        while let Some(finished) = outstanding.next().await {
            accounts_scanned += 1;
            if let Err(err) = finished {
                warn!(%err, "retrieval task aborted");
            }
        }

        RunSummary {
            accounts_scanned,
            addresses: self.registry.snapshot(),
        }
    }

    fn spawn_retrieval(&self, account: Handle) -> JoinHandle<()> {
        let chain = self.chain.clone();
        let registry = self.registry.clone();
        let events = self.events.clone();
        let mode = self.mode;

        tokio::spawn(async move {
            match mode {
                RunMode::HandlesOnly => {
                    // The caller wants graph membership, not contact data
                    let _ = events.send(Discovery::Peer(account));
                }
                RunMode::Addresses => {
                    for address in chain.retrieve(&account).await {
                        if registry.try_insert(&address) {
                            let _ = events.send(Discovery::Address(address));
                        }
                    }
                }
            }
        })
    }
}
