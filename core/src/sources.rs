//! # Source Adapters
//!
//! Every external discovery provider sits behind [`SubdomainSource`]. A source reports
//! either the hostnames it found or a [`SourceError`] saying why it could not; the
//! orchestrator only ever sees the union produced by [`collect`], where a failed
//! source contributes nothing.
//!
//! Sources must not retry and must bound each request with a timeout: the runtime
//! guard cannot interrupt a call already in flight.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use subwatch_common::domain::{Domain, SubdomainSet};
use subwatch_protocols::PayloadError;
use thiserror::Error;
use tracing::{debug, warn};

mod chaos;
mod crtsh;

pub use chaos::ChaosSource;
pub use crtsh::CrtShSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("no credential configured")]
    MissingCredential,
    #[error("disabled for the rest of this run")]
    Disabled,
}

impl SourceError {
    /// Failures that say nothing about the provider's health for this domain.
    fn is_quiet(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::Disabled)
    }
}

pub type SourceOutcome = Result<SubdomainSet, SourceError>;

/// A provider of candidate subdomains for a domain.
#[async_trait]
pub trait SubdomainSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Queries the provider once. No retries.
    async fn fetch(&self, domain: &Domain) -> SourceOutcome;
}

/// Queries every source for `domain` concurrently and unions what they found.
///
/// Failures are logged and contribute the empty set.
pub async fn collect(sources: &[Box<dyn SubdomainSource>], domain: &Domain) -> SubdomainSet {
    let fetches = sources
        .iter()
        .map(|source| async move { (source.name(), source.fetch(domain).await) });

    let mut scan = SubdomainSet::new();
    for (name, outcome) in join_all(fetches).await {
        match outcome {
            Ok(found) => {
                debug!("{name} reported {} names for {domain}", found.len());
                scan.extend(found);
            }
            Err(e) if e.is_quiet() => debug!("{name} skipped for {domain}: {e}"),
            Err(e) => warn!("{name} failed for {domain}: {e}"),
        }
    }
    scan
}

/// HTTP client shared by every source and the notifier.
///
/// No client-wide timeout: each request carries its own.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("subwatch/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .build()
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
