//! Integration test: event-driven entry lifecycle feeding the scheduler.
//!
//! Lifecycle events create and delete entries; the scheduled batch later
//! populates whatever the events left behind.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use fedtrust_core::events::{Federation, ForeignResource, IngestEvent, SharedResource};
use fedtrust_core::{EntryKey, TrustEntry, TrustEntryType};
use fedtrust_integration_tests::{RecordingPublisher, StubHistory, StubStats};
use fedtrust_node::{EventIngestor, UpdateScheduler};
use fedtrust_scoring::TrustCalculator;
use fedtrust_store::{MemoryStore, TrustStore, ViolationLog};

fn setup() -> (Arc<MemoryStore>, EventIngestor) {
    let store = Arc::new(MemoryStore::new());
    let ingestor = EventIngestor::new("own-platform".into(), store.clone(), store.clone());
    (store, ingestor)
}

#[tokio::test]
async fn test_shared_resource_gets_scored_by_the_next_batch() {
    let (store, ingestor) = setup();

    ingestor
        .handle(IngestEvent::ResourcesShared(vec![SharedResource {
            resource_id: "r-1".into(),
        }]))
        .await
        .unwrap();

    // Age the placeholder past the staleness window.
    let key = EntryKey::resource_trust(Some("own-platform"), "r-1");
    let mut entry = store.get(&key).await.unwrap().unwrap();
    entry.last_update = Utc::now() - Duration::minutes(120);
    store.save(&entry).await.unwrap();

    let publisher = Arc::new(RecordingPublisher::default());
    let calculator = Arc::new(TrustCalculator::new(
        Arc::new(StubStats::with_availability(0.93)),
        Arc::new(StubHistory::default()),
        store.clone(),
        store.clone(),
    ));
    let scheduler = UpdateScheduler::new(calculator, store.clone(), publisher.clone(), 60);

    let outcome = scheduler.run_batch(TrustEntryType::ResourceTrust).await;
    assert_eq!(outcome.published, 1);
    assert_eq!(
        store.get(&key).await.unwrap().unwrap().value,
        Some(93.0)
    );
}

#[tokio::test]
async fn test_violations_discount_the_next_computed_score() {
    let (store, ingestor) = setup();

    ingestor
        .handle(IngestEvent::ResourcesShared(vec![SharedResource {
            resource_id: "r-1".into(),
        }]))
        .await
        .unwrap();
    for _ in 0..12 {
        ingestor
            .handle(IngestEvent::SlaViolation {
                resource_id: "r-1".into(),
                constraint: "availability".into(),
            })
            .await
            .unwrap();
    }

    let key = EntryKey::resource_trust(Some("own-platform"), "r-1");
    let mut entry = store.get(&key).await.unwrap().unwrap();
    entry.last_update = Utc::now() - Duration::minutes(120);
    store.save(&entry).await.unwrap();

    let calculator = Arc::new(TrustCalculator::new(
        Arc::new(StubStats::with_availability(1.0)),
        Arc::new(StubHistory::default()),
        store.clone(),
        store.clone(),
    ));
    let scheduler = UpdateScheduler::new(
        calculator,
        store.clone(),
        Arc::new(RecordingPublisher::default()),
        60,
    );
    scheduler.run_batch(TrustEntryType::ResourceTrust).await;

    // 12 violations in the last 24h: factor 0.8 on a perfect availability.
    assert_eq!(store.get(&key).await.unwrap().unwrap().value, Some(80.0));
}

#[tokio::test]
async fn test_federation_and_foreign_resource_round_trip() {
    let (store, ingestor) = setup();

    ingestor
        .handle(IngestEvent::FederationUpdated(Federation {
            federation_id: "f-1".into(),
            members: vec!["partner-a".into(), "partner-b".into()],
        }))
        .await
        .unwrap();
    ingestor
        .handle(IngestEvent::ForeignResourcesShared(vec![ForeignResource {
            platform_id: "partner-a".into(),
            resource_id: "r-remote".into(),
            trust: Some(64.25),
        }]))
        .await
        .unwrap();

    assert_eq!(store.len(), 3);
    let foreign = store.find_resource_trust("r-remote").await.unwrap().unwrap();
    assert_eq!(foreign.value, Some(64.25));

    // Partner withdraws the resource; both reputation placeholders remain.
    let mut gone = HashSet::new();
    gone.insert("r-remote".to_string());
    ingestor
        .handle(IngestEvent::ForeignResourcesUnshared(gone))
        .await
        .unwrap();

    assert_eq!(store.len(), 2);
    assert!(store
        .exists(&EntryKey::platform_reputation("partner-a"))
        .await
        .unwrap());
    assert!(store
        .exists(&EntryKey::platform_reputation("partner-b"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_stored_values_always_in_range() {
    let (store, ingestor) = setup();

    ingestor
        .handle(IngestEvent::ForeignResourcesShared(vec![
            ForeignResource {
                platform_id: "p".into(),
                resource_id: "r-low".into(),
                trust: Some(-12.0),
            },
            ForeignResource {
                platform_id: "p".into(),
                resource_id: "r-high".into(),
                trust: Some(7000.0),
            },
            ForeignResource {
                platform_id: "p".into(),
                resource_id: "r-nan".into(),
                trust: Some(f64::NAN),
            },
        ]))
        .await
        .unwrap();

    for resource in ["r-low", "r-high", "r-nan"] {
        let entry = store.find_resource_trust(resource).await.unwrap().unwrap();
        match entry.value {
            Some(v) => assert!((0.0..=100.0).contains(&v), "{resource} out of range: {v}"),
            None => {}
        }
    }

    // Record something through the violation log too; counting never sees
    // out-of-range data because violations carry no score at all.
    ingestor
        .handle(IngestEvent::SlaViolation {
            resource_id: "r-low".into(),
            constraint: "latency".into(),
        })
        .await
        .unwrap();
    let since = Utc::now() - Duration::hours(1);
    assert_eq!(store.count_since("r-low", since).await.unwrap(), 1);
}

#[tokio::test]
async fn test_unshare_then_reshare_starts_from_a_clean_placeholder() {
    let (store, ingestor) = setup();
    let key = EntryKey::resource_trust(Some("own-platform"), "r-1");

    ingestor
        .handle(IngestEvent::ResourcesShared(vec![SharedResource {
            resource_id: "r-1".into(),
        }]))
        .await
        .unwrap();
    store
        .save(&store.get(&key).await.unwrap().unwrap().with_value(Some(77.0)))
        .await
        .unwrap();

    ingestor
        .handle(IngestEvent::ResourcesUnshared(vec!["r-1".into()]))
        .await
        .unwrap();
    ingestor
        .handle(IngestEvent::ResourcesShared(vec![SharedResource {
            resource_id: "r-1".into(),
        }]))
        .await
        .unwrap();

    let entry = store.get(&key).await.unwrap().unwrap();
    assert_eq!(entry.value, None);
}
