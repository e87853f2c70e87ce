//! # Discovery Service
//!
//! Implements the core "watch for new subdomains" use case.
//!
//! For each target, in order and one at a time, the service:
//! 1. checks the [`RuntimeGuard`] and stops the whole batch once the ceiling is passed,
//! 2. queries every [`SubdomainSource`] and unions the results,
//! 3. either records a **baseline** (first observation, no alert) or **diffs** the
//!    result against the stored state, alerting on anything new,
//! 4. persists `old ∪ scan` and waits the inter-domain delay.
//!
//! When no domain produced anything new, a single "nothing new" notice closes the batch.

use std::sync::Arc;
use std::time::Duration;

use subwatch_common::config::Config;
use subwatch_common::domain::{Domain, SubdomainSet, diff, merge};
use subwatch_common::success;
use subwatch_protocols::message;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::guard::{Clock, GuardStatus, RuntimeGuard, SystemClock};
use crate::notifier::Notifier;
use crate::sources::{self, SubdomainSource};
use crate::store::{StateStore, StoreError};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// State I/O failures end the batch; nothing after the failing domain is written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub target_delay: Duration,
    pub max_runtime: Duration,
    pub notify_after_abort: bool,
}

impl From<&Config> for DiscoveryOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            target_delay: cfg.target_delay,
            max_runtime: cfg.max_runtime,
            notify_after_abort: cfg.notify_after_abort,
        }
    }
}

/// What happened to one domain in one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainOutcome {
    /// First observation. The scan was stored as-is and nobody was alerted.
    Baseline { recorded: usize },
    /// Nothing new compared to the stored state.
    Unchanged,
    /// `new` was reported to the operator and merged into the stored state.
    NewFound { new: SubdomainSet },
}

/// Context of one pass over the target list.
pub struct BatchRun {
    guard: RuntimeGuard,
    any_new: bool,
    aborted: bool,
    outcomes: Vec<(Domain, DomainOutcome)>,
}

impl BatchRun {
    pub fn new(guard: RuntimeGuard) -> Self {
        Self {
            guard,
            any_new: false,
            aborted: false,
            outcomes: Vec::new(),
        }
    }

    pub fn guard(&self) -> &RuntimeGuard {
        &self.guard
    }

    /// Whether any domain produced a non-empty diff so far.
    pub fn any_new(&self) -> bool {
        self.any_new
    }

    fn record(&mut self, domain: &Domain, outcome: &DomainOutcome) {
        if matches!(outcome, DomainOutcome::NewFound { .. }) {
            self.any_new = true;
        }
        self.outcomes.push((domain.clone(), outcome.clone()));
    }
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<(Domain, DomainOutcome)>,
    pub any_new: bool,
    /// The runtime ceiling stopped the batch before every domain was scanned.
    pub aborted: bool,
    /// The "nothing new" notice was sent.
    pub summary_sent: bool,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn scanned(&self) -> usize {
        self.outcomes.len()
    }

    pub fn baselined(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, DomainOutcome::Baseline { .. }))
            .count()
    }

    /// Total number of new subdomains across the batch.
    pub fn new_total(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, o)| match o {
                DomainOutcome::NewFound { new } => new.len(),
                _ => 0,
            })
            .sum()
    }
}

pub struct DiscoveryService {
    sources: Vec<Box<dyn SubdomainSource>>,
    store: Box<dyn StateStore>,
    notifier: Box<dyn Notifier>,
    clock: Arc<dyn Clock>,
    options: DiscoveryOptions,
}

impl DiscoveryService {
    pub fn new(
        sources: Vec<Box<dyn SubdomainSource>>,
        store: Box<dyn StateStore>,
        notifier: Box<dyn Notifier>,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            sources,
            store,
            notifier,
            clock: Arc::new(SystemClock),
            options,
        }
    }

    /// Replaces the wall clock the runtime guard reads.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Starts a batch: the runtime budget counts from here.
    pub fn begin(&self) -> BatchRun {
        BatchRun::new(RuntimeGuard::start(self.clock.clone(), self.options.max_runtime))
    }

    /// Scans every domain in order until the list ends or the runtime ceiling is passed.
    pub async fn run_batch(&self, domains: &[Domain]) -> Result<BatchReport, DiscoveryError> {
        let mut run = self.begin();

        for (idx, domain) in domains.iter().enumerate() {
            if let GuardStatus::Exceeded { elapsed } = run.guard.check() {
                warn!(
                    "Max runtime reached after {}s, leaving {} domains for the next run",
                    elapsed.as_secs(),
                    domains.len() - idx
                );
                run.aborted = true;
                break;
            }

            info!("Scanning {domain} ({}/{})", idx + 1, domains.len());
            self.process_domain(&mut run, domain).await?;

            tokio::time::sleep(self.options.target_delay).await;
        }

        Ok(self.finish(run).await)
    }

    /// Fetches, classifies and persists a single domain.
    pub async fn process_domain(
        &self,
        run: &mut BatchRun,
        domain: &Domain,
    ) -> Result<DomainOutcome, DiscoveryError> {
        let has_baseline = self.store.exists(domain)?;
        let old = if has_baseline {
            self.store.load(domain)?
        } else {
            SubdomainSet::new()
        };

        let scan = sources::collect(&self.sources, domain).await;
        debug!("{} names collected for {domain}", scan.len());

        let outcome = if has_baseline {
            self.apply_diff(domain, old, &scan).await?
        } else {
            self.store.save(domain, &scan)?;
            info!("Baseline recorded for {domain}: {} subdomains", scan.len());
            DomainOutcome::Baseline {
                recorded: scan.len(),
            }
        };

        run.record(domain, &outcome);
        Ok(outcome)
    }

    async fn apply_diff(
        &self,
        domain: &Domain,
        old: SubdomainSet,
        scan: &SubdomainSet,
    ) -> Result<DomainOutcome, DiscoveryError> {
        let new = diff(scan, &old);

        if !new.is_empty() {
            success!("{} new subdomains for {domain}", new.len());
            self.notifier
                .notify(&message::new_subdomains(domain, &new))
                .await;
        }

        self.store.save(domain, &merge(old, scan))?;

        Ok(if new.is_empty() {
            DomainOutcome::Unchanged
        } else {
            DomainOutcome::NewFound { new }
        })
    }

    /// Closes the batch, sending the "nothing new" notice when it is due.
    pub async fn finish(&self, run: BatchRun) -> BatchReport {
        let summary_due = !run.any_new && (!run.aborted || self.options.notify_after_abort);
        if summary_due {
            self.notifier.notify(message::NOTHING_NEW).await;
        }

        BatchReport {
            elapsed: run.guard.elapsed(),
            outcomes: run.outcomes,
            any_new: run.any_new,
            aborted: run.aborted,
            summary_sent: summary_due,
        }
    }
}
