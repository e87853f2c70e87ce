//! Certificate-transparency adapter backed by crt.sh.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use subwatch_common::domain::Domain;
use subwatch_protocols::crtsh;

use super::{SourceError, SourceOutcome, SubdomainSource, endpoint};

pub struct CrtShSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl CrtShSource {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SubdomainSource for CrtShSource {
    fn name(&self) -> &'static str {
        "crt.sh"
    }

    async fn fetch(&self, domain: &Domain) -> SourceOutcome {
        let response = self
            .client
            .get(endpoint(&self.base_url, crtsh::SEARCH_PATH))
            .query(&crtsh::search_query(domain))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let body: String = response.text().await?;
        Ok(crtsh::parse_names(&body)?)
    }
}
