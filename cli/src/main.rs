//! forgemail - discover public contact addresses for a code-hosting
//! account.
//!
//! Given an account handle, forgemail runs an ordered chain of
//! extraction strategies against the platform's public surfaces and
//! prints every distinct address it finds, one per line. With
//! `--followers` or `--following` it also scans one page of the
//! account's social graph; with `--only-handles` it prints the graph
//! membership instead of contact data.
//!
//! Diagnostics go to stderr via `tracing`; stdout carries only
//! discoveries.

use anyhow::Context;
use clap::Parser;
use forgemail_core::{AppConfig, Handle, Relation};
use forgemail_gateway::{Fetch, HttpGateway, RateLimitState};
use forgemail_scanner::{
    AddressRegistry, Endpoints, ExtractionChain, GraphExpander, Orchestrator, RunMode,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "forgemail",
    version,
    about = "Discover public contact email addresses for a code-hosting account"
)]
struct Args {
    /// Account handle to scan
    handle: String,

    /// Print the URLs that are being requested
    #[arg(long)]
    debug: bool,

    /// Also scan each account following the handle (one listing page)
    #[arg(long)]
    followers: bool,

    /// Also scan each account the handle follows (one listing page)
    #[arg(long, conflicts_with = "followers")]
    following: bool,

    /// Print peer handles instead of email addresses
    #[arg(long)]
    only_handles: bool,

    /// Relation listing page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Maximum simultaneous fetches
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Path to an explicit config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "forgemail_cli=debug,forgemail_core=debug,forgemail_gateway=debug,forgemail_scanner=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load_with_env().context("loading config")?,
    };
    if let Some(max_concurrent) = args.max_concurrent {
        config.network.max_concurrent = max_concurrent;
    }

    let seed = Handle::new(&args.handle)?;
    let expansion = if args.following {
        Some(Relation::Following)
    } else if args.followers {
        Some(Relation::Followers)
    } else {
        None
    };
    let mode = if args.only_handles {
        RunMode::HandlesOnly
    } else {
        RunMode::Addresses
    };

    let rate_limit = Arc::new(RateLimitState::new());
    let gateway: Arc<dyn Fetch> = Arc::new(
        HttpGateway::new(&config.network, rate_limit.clone())
            .context("building HTTP gateway")?,
    );
    let endpoints = Endpoints::new(&config.platform);

    let chain = Arc::new(ExtractionChain::new(
        gateway.clone(),
        rate_limit,
        endpoints.clone(),
    ));
    let registry = Arc::new(AddressRegistry::new(&config.platform.noreply_suffix));
    let expander = GraphExpander::new(gateway, endpoints);

    let (events, mut discoveries) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(chain, registry, expander, mode, events);

    // Stream each discovery the moment it is accepted
    let printer = tokio::spawn(async move {
        while let Some(discovery) = discoveries.recv().await {
            println!("{discovery}");
        }
    });

    let summary = orchestrator.run(seed, expansion, args.page).await;

    // Close the channel so the printer drains and exits
    drop(orchestrator);
    printer.await.context("flushing output")?;

    info!(
        accounts = summary.accounts_scanned,
        addresses = summary.addresses.len(),
        "run complete"
    );

    Ok(())
}
