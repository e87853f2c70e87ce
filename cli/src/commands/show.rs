use std::path::Path;

use tracing::warn;

use subwatch_common::domain::Domain;
use subwatch_core::store::{FileStateStore, StateStore};

/// Prints the recorded subdomains of `domain`, one per line, on stdout.
pub fn show(domain: &Domain, state_dir: &Path) -> anyhow::Result<()> {
    let store = FileStateStore::open(state_dir)?;

    if !store.exists(domain)? {
        warn!("No baseline recorded for {domain} yet");
        return Ok(());
    }

    for name in store.load(domain)? {
        println!("{name}");
    }
    Ok(())
}
