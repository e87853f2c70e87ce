//! # State Store
//!
//! Persists the known [`SubdomainSet`] of each domain between runs.
//!
//! [`StateStore::save`] is the only mutator and always receives the full set, never a
//! delta. The orchestrator only ever hands it a superset of what it last loaded,
//! which keeps the stored state monotonic.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use subwatch_common::domain::{Domain, SubdomainSet};
use tempfile::NamedTempFile;
use thiserror::Error;

const ARTIFACT_EXTENSION: &str = "txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create state directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read state of {domain} from {path}")]
    Read {
        domain: Domain,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write state of {domain} to {path}")]
    Write {
        domain: Domain,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait StateStore: Send + Sync {
    /// Whether a baseline has been recorded for `domain`.
    fn exists(&self, domain: &Domain) -> Result<bool, StoreError>;

    /// The recorded set, or the empty set when there is none.
    fn load(&self, domain: &Domain) -> Result<SubdomainSet, StoreError>;

    /// Replaces the recorded set of `domain` with `subdomains`.
    fn save(&self, domain: &Domain, subdomains: &SubdomainSet) -> Result<(), StoreError>;
}

/// One plain-text artifact per domain: `<dir>/<domain>.txt`, one hostname per line,
/// sorted.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Opens the store, creating `dir` when needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self, domain: &Domain) -> PathBuf {
        self.dir.join(format!("{domain}.{ARTIFACT_EXTENSION}"))
    }

    /// Writes to a temporary sibling first, then renames it over the artifact.
    fn write_atomically(&self, path: &Path, subdomains: &SubdomainSet) -> io::Result<()> {
        let mut content = String::new();
        for name in subdomains {
            content.push_str(name);
            content.push('\n');
        }

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn exists(&self, domain: &Domain) -> Result<bool, StoreError> {
        let path = self.artifact_path(domain);
        path.try_exists().map_err(|source| StoreError::Read {
            domain: domain.clone(),
            path,
            source,
        })
    }

    fn load(&self, domain: &Domain) -> Result<SubdomainSet, StoreError> {
        let path = self.artifact_path(domain);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SubdomainSet::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    domain: domain.clone(),
                    path,
                    source,
                });
            }
        };

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn save(&self, domain: &Domain, subdomains: &SubdomainSet) -> Result<(), StoreError> {
        let path = self.artifact_path(domain);
        self.write_atomically(&path, subdomains)
            .map_err(|source| StoreError::Write {
                domain: domain.clone(),
                path,
                source,
            })
    }
}

/// Keeps state in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: Mutex<HashMap<Domain, SubdomainSet>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a baseline for `domain`.
    pub fn with_state(self, domain: &Domain, subdomains: SubdomainSet) -> Self {
        self.lock().insert(domain.clone(), subdomains);
        self
    }

    /// The recorded set of `domain`, `None` when no baseline exists.
    pub fn snapshot(&self, domain: &Domain) -> Option<SubdomainSet> {
        self.lock().get(domain).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Domain, SubdomainSet>> {
        // Every write is a single insert.
        self.states.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStore for MemoryStateStore {
    fn exists(&self, domain: &Domain) -> Result<bool, StoreError> {
        Ok(self.lock().contains_key(domain))
    }

    fn load(&self, domain: &Domain) -> Result<SubdomainSet, StoreError> {
        Ok(self.snapshot(domain).unwrap_or_default())
    }

    fn save(&self, domain: &Domain, subdomains: &SubdomainSet) -> Result<(), StoreError> {
        self.lock().insert(domain.clone(), subdomains.clone());
        Ok(())
    }
}
