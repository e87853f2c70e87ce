use std::path::Path;

use anyhow::Context;

use subwatch_common::{success, targets};

/// Prints the parsed target list on stdout.
pub fn targets(path: &Path) -> anyhow::Result<()> {
    let domains = targets::load_targets(path).context("loading targets")?;

    for domain in &domains {
        println!("{domain}");
    }

    let unit: &str = if domains.len() == 1 { "target" } else { "targets" };
    success!("{} {unit} parsed from {}", domains.len(), path.display());
    Ok(())
}
