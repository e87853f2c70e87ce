//! Passive-DNS adapter backed by the Chaos API.
//!
//! Without a key the adapter never touches the network. A key the API rejects
//! disables the adapter for the remainder of the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use subwatch_common::domain::Domain;
use subwatch_protocols::chaos;
use tracing::warn;

use super::{SourceError, SourceOutcome, SubdomainSource, endpoint};

pub struct ChaosSource {
    client: Client,
    base_url: String,
    key: Option<String>,
    timeout: Duration,
    rejected: AtomicBool,
}

impl ChaosSource {
    pub fn new(client: Client, base_url: impl Into<String>, key: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            key: key.filter(|k| !k.trim().is_empty()),
            timeout,
            rejected: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SubdomainSource for ChaosSource {
    fn name(&self) -> &'static str {
        "chaos"
    }

    async fn fetch(&self, domain: &Domain) -> SourceOutcome {
        let Some(key) = self.key.as_deref() else {
            return Err(SourceError::MissingCredential);
        };
        if self.rejected.load(Ordering::Relaxed) {
            return Err(SourceError::Disabled);
        }

        let response = self
            .client
            .get(endpoint(&self.base_url, &chaos::subdomains_path(domain)))
            .header(AUTHORIZATION, chaos::bearer(key))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!("chaos rejected the configured key ({status}), skipping it for this run");
            self.rejected.store(true, Ordering::Relaxed);
            return Err(SourceError::Status(status));
        }
        if status != StatusCode::OK {
            return Err(SourceError::Status(status));
        }

        let body: String = response.text().await?;
        Ok(chaos::parse_labels(&body, domain)?)
    }
}
