//! Integration tests for Schemascope
//!
//! These tests verify the full workflow from startup fallback loading
//! through refresh cycles against a stubbed schema source.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use schemascope::cache::SnapshotStore;
use schemascope::refresher::{RefreshHandle, Refresher, RefresherConfig, RefresherEvent};
use schemascope::schema::{ElementKind, SchemaElement, SchemaSnapshot, SnapshotSource};
use schemascope::sparql::SchemaSource;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::broadcast;

/// Configurable stub source: fixed elements, optional failure, optional delay
struct StubSource {
    class_uris: Vec<String>,
    predicate_uris: Vec<String>,
    fail: AtomicBool,
    delay: Duration,
    fetches: AtomicUsize,
}

impl StubSource {
    fn new(class_uris: &[&str], predicate_uris: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            class_uris: class_uris.iter().map(|s| s.to_string()).collect(),
            predicate_uris: predicate_uris.iter().map(|s| s.to_string()).collect(),
            fail: AtomicBool::new(false),
            delay: Duration::ZERO,
            fetches: AtomicUsize::new(0),
        })
    }

    fn slow(class_uris: &[&str], delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            class_uris: class_uris.iter().map(|s| s.to_string()).collect(),
            predicate_uris: Vec::new(),
            fail: AtomicBool::new(false),
            delay,
            fetches: AtomicUsize::new(0),
        })
    }

    fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

/// Local delegating wrapper so an `Arc`-shared `StubSource` can be handed to
/// the refresher while the test retains its own handle for inspection.
/// (A bare `impl SchemaSource for Arc<StubSource>` would violate the orphan
/// rule; the library trait is foreign and `Arc` is not a fundamental type.)
#[derive(Clone)]
struct SharedSource(Arc<StubSource>);

#[async_trait]
impl SchemaSource for SharedSource {
    async fn fetch_classes(&self, limit: usize) -> schemascope::Result<Vec<SchemaElement>> {
        self.0.fetch_classes(limit).await
    }

    async fn fetch_predicates(&self, limit: usize) -> schemascope::Result<Vec<SchemaElement>> {
        self.0.fetch_predicates(limit).await
    }
}

#[async_trait]
impl SchemaSource for StubSource {
    async fn fetch_classes(&self, _limit: usize) -> schemascope::Result<Vec<SchemaElement>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(schemascope::SchemascopeError::Fetch(
                "stubbed failure".to_string(),
            ));
        }
        Ok(self
            .class_uris
            .iter()
            .map(|u| SchemaElement::from_uri(u, ElementKind::Class))
            .collect())
    }

    async fn fetch_predicates(&self, _limit: usize) -> schemascope::Result<Vec<SchemaElement>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(schemascope::SchemascopeError::Fetch(
                "stubbed failure".to_string(),
            ));
        }
        Ok(self
            .predicate_uris
            .iter()
            .map(|u| SchemaElement::from_uri(u, ElementKind::Predicate))
            .collect())
    }
}

/// Wait for the next RefreshCompleted, skipping other events
async fn next_completed(events: &mut broadcast::Receiver<RefresherEvent>) -> (usize, usize) {
    loop {
        match events.recv().await.unwrap() {
            RefresherEvent::RefreshCompleted {
                classes,
                predicates,
            } => return (classes, predicates),
            _ => continue,
        }
    }
}

/// Wait for the next RefreshFailed, skipping other events
async fn next_failed(events: &mut broadcast::Receiver<RefresherEvent>) {
    loop {
        if let RefresherEvent::RefreshFailed { .. } = events.recv().await.unwrap() {
            return;
        }
    }
}

fn spawn_refresher(
    source: Arc<StubSource>,
    store: Arc<SnapshotStore>,
    interval: Duration,
) -> (
    RefreshHandle,
    broadcast::Receiver<RefresherEvent>,
    tokio::task::JoinHandle<schemascope::Result<()>>,
) {
    let refresher = Refresher::new(
        SharedSource(source),
        store,
        RefresherConfig::default().with_interval(interval),
    );
    let handle = refresher.handle();
    let events = refresher.subscribe();
    let task = tokio::spawn(refresher.run());
    (handle, events, task)
}

mod startup_tests {
    use super::*;

    #[test]
    fn test_bootstrap_prefers_persisted_snapshot() {
        let temp = TempDir::new().unwrap();
        let cache_file = temp.path().join("cache.json");

        let snapshot = SchemaSnapshot::from_elements(
            vec![SchemaElement::from_uri(
                "http://odissei.nl/schema#Persisted",
                ElementKind::Class,
            )],
            vec![],
            SnapshotSource::Live,
        );
        std::fs::write(&cache_file, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let store = SnapshotStore::new(&cache_file);
        store.bootstrap();

        let current = store.current();
        assert_eq!(current.classes[0].label, "Persisted");
        assert_eq!(current.source, SnapshotSource::Cached);
    }

    #[test]
    fn test_bootstrap_falls_back_to_bundled_data() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp.path().join("missing.json"));
        store.bootstrap();

        let current = store.current();
        assert!(!current.is_empty());
        assert_eq!(current.source, SnapshotSource::Cached);
    }

    #[test]
    fn test_bootstrap_with_nothing_yields_empty_snapshot() {
        let temp = TempDir::new().unwrap();
        let store = SnapshotStore::with_bundled(temp.path().join("missing.json"), None);
        store.bootstrap();

        let current = store.current();
        assert!(current.is_empty());
        assert_eq!(current.fetched_at, None);
    }
}

mod refresh_cycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_class_snapshot_published_live() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::new(temp.path().join("cache.json")));
        let source = StubSource::new(&["http://odissei.nl/schema#Person"], &[]);

        let (handle, mut events, task) =
            spawn_refresher(source, store.clone(), Duration::from_secs(3600));

        let (classes, predicates) = next_completed(&mut events).await;
        assert_eq!((classes, predicates), (1, 0));

        let snapshot = store.current();
        assert_eq!(snapshot.stats.total_classes, 1);
        assert_eq!(snapshot.stats.total_predicates, 0);
        assert_eq!(snapshot.source, SnapshotSource::Live);

        handle.shutdown().await;
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_persisted_timestamp_visible() {
        let temp = TempDir::new().unwrap();
        let cache_file = temp.path().join("cache.json");

        // Persisted snapshot from an earlier run, fetched at T0
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let persisted = SchemaSnapshot::from_elements_at(
            vec![SchemaElement::from_uri(
                "http://odissei.nl/schema#Person",
                ElementKind::Class,
            )],
            vec![],
            SnapshotSource::Live,
            Some(t0),
        );
        std::fs::write(&cache_file, serde_json::to_string(&persisted).unwrap()).unwrap();

        let store = Arc::new(SnapshotStore::new(&cache_file));
        store.bootstrap();

        let source = StubSource::new(&["http://odissei.nl/schema#New"], &[]);
        source.set_failing(true);

        let (handle, mut events, task) =
            spawn_refresher(source.clone(), store.clone(), Duration::from_secs(3600));

        next_failed(&mut events).await;

        let current = store.current();
        assert_eq!(current.fetched_at, Some(t0));
        assert_eq!(current.classes[0].label, "Person");

        handle.shutdown().await;
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_uris_collapse_in_published_snapshot() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::new(temp.path().join("cache.json")));
        let source = StubSource::new(
            &[
                "http://odissei.nl/schema#A",
                "http://odissei.nl/schema#A",
                "http://odissei.nl/schema#B",
            ],
            &["http://odissei.nl/schema#p", "http://odissei.nl/schema#p"],
        );

        let (handle, mut events, task) =
            spawn_refresher(source, store.clone(), Duration::from_secs(3600));

        let (classes, predicates) = next_completed(&mut events).await;
        assert_eq!((classes, predicates), (2, 1));

        handle.shutdown().await;
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_recovery_after_failure_advances_timestamp() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::new(temp.path().join("cache.json")));
        let source = StubSource::new(&["http://odissei.nl/schema#Person"], &[]);

        let (handle, mut events, task) =
            spawn_refresher(source.clone(), store.clone(), Duration::from_secs(3600));

        next_completed(&mut events).await;
        let first_at = store.current().fetched_at;

        source.set_failing(true);
        handle.refresh_now();
        next_failed(&mut events).await;
        assert_eq!(store.current().fetched_at, first_at);

        source.set_failing(false);
        handle.refresh_now();
        next_completed(&mut events).await;
        assert!(store.current().fetched_at > first_at);

        handle.shutdown().await;
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_fetched_at_monotonic_across_cycles() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::new(temp.path().join("cache.json")));
        let source = StubSource::new(&["http://odissei.nl/schema#Person"], &[]);

        let (handle, mut events, task) =
            spawn_refresher(source, store.clone(), Duration::from_millis(20));

        let mut last = None;
        for _ in 0..3 {
            next_completed(&mut events).await;
            let at = store.current().fetched_at;
            if let Some(prev) = last {
                assert!(at >= prev);
            }
            last = Some(at);
        }

        handle.shutdown().await;
        task.await.unwrap().unwrap();
    }
}

mod manual_refresh_tests {
    use super::*;

    #[tokio::test]
    async fn test_signals_during_fetch_coalesce_to_one_extra_cycle() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::new(temp.path().join("cache.json")));
        let source = StubSource::slow(
            &["http://odissei.nl/schema#Person"],
            Duration::from_millis(150),
        );

        let (handle, mut events, task) =
            spawn_refresher(source.clone(), store.clone(), Duration::from_secs(3600));

        // The startup cycle is fetching; pile on three manual signals
        loop {
            if let RefresherEvent::RefreshStarted = events.recv().await.unwrap() {
                break;
            }
        }
        let queued: Vec<bool> = (0..3).map(|_| handle.refresh_now()).collect();
        assert_eq!(queued, vec![true, false, false]);

        next_completed(&mut events).await;
        next_completed(&mut events).await;

        // Give a wrongly-queued third cycle a chance to show up
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(source.fetch_count(), 2);

        handle.shutdown().await;
        task.await.unwrap().unwrap();
    }
}

mod concurrency_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_always_see_consistent_snapshots() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SnapshotStore::new(temp.path().join("cache.json")));
        let source = StubSource::new(
            &[
                "http://odissei.nl/schema#A",
                "http://odissei.nl/schema#B",
                "http://odissei.nl/schema#C",
            ],
            &["http://odissei.nl/schema#p"],
        );

        let (handle, _events, task) =
            spawn_refresher(source, store.clone(), Duration::from_millis(5));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    for _ in 0..200 {
                        let snap = store.current();
                        // Fully formed or not at all: stats always agree
                        // with the element lists they were computed from.
                        assert_eq!(snap.stats.total_classes, snap.classes.len());
                        assert_eq!(snap.stats.total_predicates, snap.predicates.len());
                        tokio::time::sleep(Duration::from_millis(1)).await;
                    }
                })
            })
            .collect();

        for r in readers {
            r.await.unwrap();
        }

        handle.shutdown().await;
        task.await.unwrap().unwrap();
    }
}
