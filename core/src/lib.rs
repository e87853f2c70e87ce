//! # Subwatch Core
//!
//! The discovery pipeline, organised around the traits it depends on:
//!
//! * **[`sources`]**: [`SubdomainSource`](sources::SubdomainSource) and the crt.sh / Chaos adapters.
//! * **[`store`]**: [`StateStore`](store::StateStore), persisted per-domain state.
//! * **[`guard`]**: the wall-clock budget of a batch.
//! * **[`notifier`]**: fire-and-forget operator messages.
//! * **[`discovery`]**: the orchestrator tying them together.
//!
//! High-level modules depend on the traits only; [`build_service`] wires the concrete
//! adapters from a [`Config`].

pub mod discovery;
pub mod guard;
pub mod notifier;
pub mod sources;
pub mod store;

use anyhow::Context;
use subwatch_common::config::Config;
use tracing::{info, warn};

use discovery::{DiscoveryOptions, DiscoveryService};
use notifier::{DisabledNotifier, Notifier, TelegramNotifier};
use sources::{ChaosSource, CrtShSource, SubdomainSource};
use store::FileStateStore;

/// Builds the production service: both HTTP sources, the file store and, when
/// credentials are present, the Telegram notifier.
pub fn build_service(cfg: &Config) -> anyhow::Result<DiscoveryService> {
    let client = sources::http_client().context("building HTTP client")?;

    let sources: Vec<Box<dyn SubdomainSource>> = vec![
        Box::new(CrtShSource::new(
            client.clone(),
            &cfg.endpoints.crtsh,
            cfg.fetch_timeout,
        )),
        Box::new(ChaosSource::new(
            client.clone(),
            &cfg.endpoints.chaos,
            cfg.chaos_key.clone(),
            cfg.fetch_timeout,
        )),
    ];

    if cfg.chaos_key.is_none() {
        warn!("CHAOS_KEY not set, passive DNS source disabled");
    }

    let store = FileStateStore::open(&cfg.state_dir).context("opening state store")?;
    info!("State directory: {}", store.dir().display());

    let notifier: Box<dyn Notifier> = match &cfg.telegram {
        Some(credentials) => Box::new(TelegramNotifier::new(
            client,
            &cfg.endpoints.telegram,
            credentials.clone(),
            cfg.notify_timeout,
        )),
        None => {
            warn!("Telegram credentials not set, notifications disabled");
            Box::new(DisabledNotifier)
        }
    };

    Ok(DiscoveryService::new(
        sources,
        Box::new(store),
        notifier,
        DiscoveryOptions::from(cfg),
    ))
}
