use anyhow::Context;
use colored::*;
use tracing::warn;

use subwatch_common::{config::Config, success, targets};
use subwatch_core::discovery::{BatchReport, DomainOutcome};

use crate::terminal::{colors, print};

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let domains = targets::load_targets(&cfg.targets_path).context("loading targets")?;
    if domains.is_empty() {
        warn!("{} lists no domains", cfg.targets_path.display());
    }

    let service = subwatch_core::build_service(cfg)?;

    print::header("scanning");
    let report = service
        .run_batch(&domains)
        .await
        .context("batch stopped on a state store failure")?;

    print::header("batch summary");
    print_new_findings(&report);
    print_summary(&report, domains.len());
    Ok(())
}

fn print_new_findings(report: &BatchReport) {
    let mut idx: usize = 0;
    for (domain, outcome) in &report.outcomes {
        let DomainOutcome::NewFound { new } = outcome else {
            continue;
        };
        print::tree_head(idx, domain.as_str());
        print::as_tree_one_level(new.iter().map(String::as_str).collect());
        idx += 1;
    }
}

fn print_summary(report: &BatchReport, total: usize) {
    print::aligned_line("Scanned", format!("{}/{}", report.scanned(), total));
    print::aligned_line("Baselines", report.baselined().to_string());
    print::aligned_line("New", report.new_total().to_string().color(colors::ACCENT));
    print::aligned_line("Elapsed", format!("{:.1}s", report.elapsed.as_secs_f64()));

    print::fat_separator();
    if report.aborted {
        warn!(
            "Runtime ceiling reached, {} domains left for the next run",
            total - report.scanned()
        );
    } else if report.any_new {
        success!("Batch complete: {} new subdomains", report.new_total());
    } else {
        success!("Batch complete: nothing new");
    }
}
