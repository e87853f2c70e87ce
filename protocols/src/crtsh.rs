//! Certificate-transparency search results as served by crt.sh.
//!
//! The endpoint returns a JSON array of certificate objects. The interesting field
//! is `name_value`: the certificate's subject alternative names, newline-delimited.

use serde_json::Value;
use subwatch_common::domain::{Domain, SubdomainSet};

use crate::PayloadError;

pub const SEARCH_PATH: &str = "/";
const NAME_FIELD: &str = "name_value";
const WILDCARD: char = '*';

/// Query parameters matching every certificate issued under `domain`.
///
/// The `%` is the server-side wildcard; the HTTP client percent-encodes it.
pub fn search_query(domain: &Domain) -> [(&'static str, String); 2] {
    [
        ("q", format!("%.{domain}")),
        ("output", "json".to_string()),
    ]
}

/// Extracts candidate hostnames from a search response body.
///
/// Array elements that are not objects, or lack a string `name_value`, are
/// skipped. Entries containing a wildcard marker are excluded.
pub fn parse_names(body: &str) -> Result<SubdomainSet, PayloadError> {
    let value: Value = serde_json::from_str(body)?;
    let entries = value.as_array().ok_or(PayloadError::Shape {
        expected: "array of certificates",
    })?;

    let names: SubdomainSet = entries
        .iter()
        .filter_map(|entry| entry.get(NAME_FIELD)?.as_str())
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.contains(WILDCARD))
        .map(str::to_string)
        .collect();

    Ok(names)
}
