//! # Domain Model
//!
//! A [`Domain`] is a monitored root hostname, a subdomain is any fully-qualified
//! hostname observed under it, and a [`SubdomainSet`] is a snapshot of those
//! hostnames at one point in time.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Ordered set of hostnames. Iteration order is the persisted order.
pub type SubdomainSet = BTreeSet<String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain name is empty")]
    Empty,
    #[error("'{0}' cannot be used as a domain name")]
    Invalid(String),
}

/// A target root hostname, e.g. `example.com`.
///
/// The name doubles as the file stem of the domain's state artifact, so anything
/// that would escape the state directory is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Turns a short-form label (`api`) into a hostname under this domain (`api.example.com`).
    pub fn qualify(&self, label: &str) -> String {
        format!("{label}.{}", self.0)
    }
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        if name.is_empty() {
            return Err(DomainError::Empty);
        }

        let escapes = name == "." || name == ".." || name.contains(['/', '\\']);
        if escapes || name.chars().any(char::is_whitespace) {
            return Err(DomainError::Invalid(name.to_string()));
        }

        Ok(Self(name.to_string()))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Entries of `scan` that are absent from `old`.
pub fn diff(scan: &SubdomainSet, old: &SubdomainSet) -> SubdomainSet {
    scan.difference(old).cloned().collect()
}

/// `old ∪ scan`. Entries a source stopped reporting are kept.
pub fn merge(mut old: SubdomainSet, scan: &SubdomainSet) -> SubdomainSet {
    old.extend(scan.iter().cloned());
    old
}
