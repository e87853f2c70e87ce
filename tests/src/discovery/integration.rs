use std::sync::Arc;

use subwatch_core::discovery::{DiscoveryError, DiscoveryService, DomainOutcome};
use subwatch_core::store::{FileStateStore, MemoryStateStore, StateStore};
use subwatch_protocols::message::NOTHING_NEW;

use crate::utils::{
    DownSource, FailingStore, RecordingNotifier, ScriptedSource, SharedStore, domain, options,
    service, set,
};

/// Two runs over `example.com`: a silent baseline, then an alert for the one new name.
#[tokio::test]
async fn baseline_then_diff_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStateStore::open(dir.path()).unwrap());
    let target = domain("example.com");
    let source = ScriptedSource::new();
    source
        .respond(&target, set(&["b.example.com", "a.example.com"]))
        .respond(&target, set(&["a.example.com", "c.example.com"]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, store.clone(), &notifier, options());

    let first = svc.run_batch(std::slice::from_ref(&target)).await.unwrap();

    assert_eq!(first.outcomes, vec![(target.clone(), DomainOutcome::Baseline { recorded: 2 })]);
    let artifact = dir.path().join("example.com.txt");
    assert_eq!(
        std::fs::read_to_string(&artifact).unwrap(),
        "a.example.com\nb.example.com\n"
    );
    // the batch summary is the only message: no per-domain alert on a baseline
    assert_eq!(notifier.sent(), vec![NOTHING_NEW.to_string()]);

    let second = svc.run_batch(std::slice::from_ref(&target)).await.unwrap();

    assert!(second.any_new);
    assert!(!second.summary_sent);
    assert_eq!(
        notifier.sent().last().unwrap(),
        "🚨 New Subdomains Found (example.com)\n\nc.example.com"
    );
    assert_eq!(notifier.sent().len(), 2);
    assert_eq!(
        std::fs::read_to_string(&artifact).unwrap(),
        "a.example.com\nb.example.com\nc.example.com\n"
    );
}

#[tokio::test]
async fn state_never_shrinks() {
    let store = Arc::new(MemoryStateStore::new());
    let target = domain("example.com");
    let scans = [
        set(&["a.example.com", "b.example.com"]),
        set(&["c.example.com"]),
        set(&[]),
        set(&["a.example.com", "d.example.com"]),
        set(&["b.example.com"]),
    ];
    let source = ScriptedSource::new();
    for scan in &scans {
        source.respond(&target, scan.clone());
    }
    let notifier = RecordingNotifier::default();
    let svc = service(&source, store.clone(), &notifier, options());

    let mut previous = set(&[]);
    let mut seen = set(&[]);
    for scan in &scans {
        let report = svc.run_batch(std::slice::from_ref(&target)).await.unwrap();
        let current = store.snapshot(&target).unwrap();

        assert!(current.is_superset(&previous), "state lost entries: {previous:?} -> {current:?}");

        if let (_, DomainOutcome::NewFound { new }) = &report.outcomes[0] {
            let expected: Vec<&String> = scan.difference(&seen).collect();
            assert_eq!(new.iter().collect::<Vec<_>>(), expected);
        }

        seen.extend(scan.iter().cloned());
        previous = current;
    }

    assert_eq!(previous, set(&["a.example.com", "b.example.com", "c.example.com", "d.example.com"]));
}

#[tokio::test]
async fn empty_first_scan_is_still_a_baseline() {
    let store = Arc::new(MemoryStateStore::new());
    let target = domain("example.com");
    let source = ScriptedSource::new();
    source.respond(&target, set(&[])).respond(&target, set(&["a.example.com"]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, store.clone(), &notifier, options());

    svc.run_batch(std::slice::from_ref(&target)).await.unwrap();
    assert_eq!(store.snapshot(&target), Some(set(&[])));

    let report = svc.run_batch(std::slice::from_ref(&target)).await.unwrap();
    assert_eq!(
        report.outcomes[0].1,
        DomainOutcome::NewFound {
            new: set(&["a.example.com"])
        }
    );
}

#[tokio::test]
async fn summary_only_when_no_domain_has_news() {
    let alpha = domain("alpha.com");
    let beta = domain("beta.com");
    let store = Arc::new(
        MemoryStateStore::new()
            .with_state(&alpha, set(&["www.alpha.com"]))
            .with_state(&beta, set(&["www.beta.com"])),
    );
    let source = ScriptedSource::new();
    source
        .respond(&alpha, set(&["www.alpha.com"]))
        .respond(&beta, set(&["www.beta.com", "api.beta.com"]))
        .respond(&alpha, set(&["www.alpha.com"]))
        .respond(&beta, set(&["api.beta.com"]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, store.clone(), &notifier, options());
    let targets = [alpha.clone(), beta.clone()];

    let with_news = svc.run_batch(&targets).await.unwrap();
    assert!(with_news.any_new);
    assert!(!with_news.summary_sent);
    assert_eq!(notifier.sent().len(), 1);
    assert!(notifier.sent()[0].starts_with("🚨 New Subdomains Found (beta.com)"));

    let quiet = svc.run_batch(&targets).await.unwrap();
    assert!(!quiet.any_new);
    assert!(quiet.summary_sent);
    assert_eq!(notifier.sent().last().unwrap(), NOTHING_NEW);
    assert_eq!(
        quiet.outcomes.iter().map(|(_, o)| o.clone()).collect::<Vec<_>>(),
        vec![DomainOutcome::Unchanged, DomainOutcome::Unchanged]
    );
}

#[tokio::test]
async fn failing_sources_contribute_nothing() {
    let target = domain("example.com");
    let store = Arc::new(MemoryStateStore::new().with_state(&target, set(&["a.example.com"])));
    let source = ScriptedSource::new();
    source.respond(&target, set(&["b.example.com"]));
    let notifier = RecordingNotifier::default();
    let svc = DiscoveryService::new(
        vec![Box::new(DownSource), Box::new(source.clone())],
        Box::new(SharedStore(store.clone())),
        Box::new(notifier.clone()),
        options(),
    );

    let report = svc.run_batch(std::slice::from_ref(&target)).await.unwrap();

    assert_eq!(report.new_total(), 1);
    assert_eq!(store.snapshot(&target), Some(set(&["a.example.com", "b.example.com"])));
}

#[tokio::test]
async fn duplicate_targets_are_scanned_twice() {
    let target = domain("example.com");
    let store = Arc::new(MemoryStateStore::new());
    let source = ScriptedSource::new();
    source
        .respond(&target, set(&["a.example.com"]))
        .respond(&target, set(&["b.example.com"]));
    let notifier = RecordingNotifier::default();
    let svc = service(&source, store.clone(), &notifier, options());

    let report = svc.run_batch(&[target.clone(), target.clone()]).await.unwrap();

    assert_eq!(source.fetched().len(), 2);
    assert_eq!(report.baselined(), 1);
    assert_eq!(report.new_total(), 1);
    assert_eq!(store.snapshot(&target), Some(set(&["a.example.com", "b.example.com"])));
}

#[tokio::test]
async fn store_failure_aborts_the_batch() {
    let first = domain("first.com");
    let broken = domain("broken.com");
    let last = domain("last.com");
    let inner = Arc::new(MemoryStateStore::new());
    let source = ScriptedSource::new();
    source
        .respond(&first, set(&["a.first.com"]))
        .respond(&broken, set(&["a.broken.com"]))
        .respond(&last, set(&["a.last.com"]));
    let notifier = RecordingNotifier::default();
    let svc = DiscoveryService::new(
        vec![Box::new(source.clone())],
        Box::new(FailingStore {
            inner: inner.clone(),
            fail_on: broken.clone(),
        }),
        Box::new(notifier.clone()),
        options(),
    );

    let result = svc.run_batch(&[first.clone(), broken.clone(), last.clone()]).await;

    assert!(matches!(result, Err(DiscoveryError::Store(_))));
    assert_eq!(source.fetched(), vec![first.clone(), broken.clone()]);
    assert!(inner.exists(&first).unwrap());
    assert!(!inner.exists(&broken).unwrap());
    assert!(!inner.exists(&last).unwrap());
    assert!(notifier.sent().is_empty());
}
