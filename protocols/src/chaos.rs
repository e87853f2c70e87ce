//! Passive-DNS lookups against the ProjectDiscovery Chaos API.
//!
//! The API answers with short-form labels (`api`, `www.dev`) that still need the
//! parent domain appended.

use serde::Deserialize;
use subwatch_common::domain::{Domain, SubdomainSet};

use crate::PayloadError;

#[derive(Debug, Deserialize)]
struct SubdomainsResponse {
    #[serde(default)]
    subdomains: Vec<String>,
}

/// Path of the subdomain listing for `domain`, relative to the API base URL.
pub fn subdomains_path(domain: &Domain) -> String {
    format!("/dns/{domain}/subdomains")
}

pub fn bearer(key: &str) -> String {
    format!("Bearer {key}")
}

/// Parses a listing and qualifies every label under `domain`.
pub fn parse_labels(body: &str, domain: &Domain) -> Result<SubdomainSet, PayloadError> {
    let response: SubdomainsResponse = serde_json::from_str(body)?;

    let names: SubdomainSet = response
        .subdomains
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .map(|label| domain.qualify(label))
        .collect();

    Ok(names)
}
