use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use subwatch_common::domain::{Domain, SubdomainSet};
use subwatch_core::discovery::{DiscoveryOptions, DiscoveryService};
use subwatch_core::guard::ManualClock;
use subwatch_core::notifier::Notifier;
use subwatch_core::sources::{SourceError, SourceOutcome, SubdomainSource};
use subwatch_core::store::{StateStore, StoreError};

pub fn set(items: &[&str]) -> SubdomainSet {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn domain(name: &str) -> Domain {
    name.parse().unwrap()
}

pub fn options() -> DiscoveryOptions {
    DiscoveryOptions {
        target_delay: Duration::ZERO,
        max_runtime: Duration::from_secs(3_600),
        notify_after_abort: false,
    }
}

/// Answers from a per-domain queue; an exhausted queue yields the empty set.
///
/// Optionally moves a [`ManualClock`] forward on every fetch to simulate slow domains.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    responses: Arc<Mutex<HashMap<Domain, VecDeque<SubdomainSet>>>>,
    fetched: Arc<Mutex<Vec<Domain>>>,
    tick: Option<(ManualClock, Duration)>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, domain: &Domain, subdomains: SubdomainSet) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(domain.clone())
            .or_default()
            .push_back(subdomains);
        self
    }

    pub fn ticking(mut self, clock: ManualClock, per_fetch: Duration) -> Self {
        self.tick = Some((clock, per_fetch));
        self
    }

    pub fn fetched(&self) -> Vec<Domain> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubdomainSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch(&self, domain: &Domain) -> SourceOutcome {
        self.fetched.lock().unwrap().push(domain.clone());
        if let Some((clock, per_fetch)) = &self.tick {
            clock.advance(*per_fetch);
        }

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(domain)
            .and_then(VecDeque::pop_front);
        Ok(next.unwrap_or_default())
    }
}

/// Always unreachable.
pub struct DownSource;

#[async_trait]
impl SubdomainSource for DownSource {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn fetch(&self, _domain: &Domain) -> SourceOutcome {
        Err(SourceError::MissingCredential)
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) {
        self.sent.lock().unwrap().push(text.to_string());
    }
}

/// Lets a test keep a handle on a store it hands to the service.
pub struct SharedStore<S>(pub Arc<S>);

impl<S: StateStore> StateStore for SharedStore<S> {
    fn exists(&self, domain: &Domain) -> Result<bool, StoreError> {
        self.0.exists(domain)
    }

    fn load(&self, domain: &Domain) -> Result<SubdomainSet, StoreError> {
        self.0.load(domain)
    }

    fn save(&self, domain: &Domain, subdomains: &SubdomainSet) -> Result<(), StoreError> {
        self.0.save(domain, subdomains)
    }
}

/// Wraps a store and fails every `save` for one domain.
pub struct FailingStore<S> {
    pub inner: Arc<S>,
    pub fail_on: Domain,
}

impl<S: StateStore> StateStore for FailingStore<S> {
    fn exists(&self, domain: &Domain) -> Result<bool, StoreError> {
        self.inner.exists(domain)
    }

    fn load(&self, domain: &Domain) -> Result<SubdomainSet, StoreError> {
        self.inner.load(domain)
    }

    fn save(&self, domain: &Domain, subdomains: &SubdomainSet) -> Result<(), StoreError> {
        if *domain == self.fail_on {
            return Err(StoreError::Write {
                domain: domain.clone(),
                path: format!("/readonly/{domain}.txt").into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.inner.save(domain, subdomains)
    }
}

pub fn service<S: StateStore + 'static>(
    source: &ScriptedSource,
    store: Arc<S>,
    notifier: &RecordingNotifier,
    options: DiscoveryOptions,
) -> DiscoveryService {
    DiscoveryService::new(
        vec![Box::new(source.clone())],
        Box::new(SharedStore(store)),
        Box::new(notifier.clone()),
        options,
    )
}
