//! Wire formats spoken by subwatch.
//!
//! Everything here is pure: bodies in, [`SubdomainSet`](subwatch_common::domain::SubdomainSet)s
//! or rendered messages out. Networking lives in `subwatch-core`.

pub mod chaos;
pub mod crtsh;
pub mod message;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("response is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response shape: expected {expected}")]
    Shape { expected: &'static str },
}
