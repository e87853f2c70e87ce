//! # Target List
//!
//! The list of domains to monitor is a plain text file with one domain per line.
//! Blank lines and lines starting with `#` are skipped. Duplicates are kept and
//! simply get scanned twice.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{Domain, DomainError};

pub const DEFAULT_TARGETS_FILE: &str = "targets.txt";

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("failed to read target list {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {source}")]
    Invalid {
        line: usize,
        #[source]
        source: DomainError,
    },
}

/// Parses the contents of a target list.
pub fn parse_targets(text: &str) -> Result<Vec<Domain>, TargetError> {
    let mut domains = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let domain = line
            .parse::<Domain>()
            .map_err(|source| TargetError::Invalid { line: idx + 1, source })?;
        domains.push(domain);
    }

    Ok(domains)
}

/// Reads and parses the target list at `path`.
pub fn load_targets(path: &Path) -> Result<Vec<Domain>, TargetError> {
    let text = std::fs::read_to_string(path).map_err(|source| TargetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_targets(&text)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
