//! Integration test: the full recomputation pipeline across crates.
//!
//! Drives the scheduler's batch function over the in-memory store with
//! stub collaborators: placeholder → computed → published, then the
//! change-detection behaviour across repeated runs.

use std::sync::Arc;

use chrono::{Duration, Utc};

use fedtrust_core::{EntryKey, TrustEntry, TrustEntryType};
use fedtrust_integration_tests::{RecordingPublisher, StubHistory, StubStats};
use fedtrust_node::UpdateScheduler;
use fedtrust_scoring::TrustCalculator;
use fedtrust_store::{MemoryStore, TrustStore};

const WINDOW_MINUTES: i64 = 30;

struct Pipeline {
    store: Arc<MemoryStore>,
    stats: Arc<StubStats>,
    publisher: Arc<RecordingPublisher>,
    scheduler: UpdateScheduler,
}

fn pipeline(stats: StubStats, history: StubHistory) -> Pipeline {
    let store = Arc::new(MemoryStore::new());
    let stats = Arc::new(stats);
    let publisher = Arc::new(RecordingPublisher::default());
    let calculator = Arc::new(TrustCalculator::new(
        stats.clone(),
        Arc::new(history),
        store.clone(),
        store.clone(),
    ));
    let scheduler = UpdateScheduler::new(
        calculator,
        store.clone(),
        publisher.clone(),
        WINDOW_MINUTES,
    );
    Pipeline {
        store,
        stats,
        publisher,
        scheduler,
    }
}

/// Store an entry backdated far enough to be selected by the next batch.
async fn seed_stale(store: &MemoryStore, mut entry: TrustEntry) {
    entry.last_update = Utc::now() - Duration::minutes(WINDOW_MINUTES * 2);
    store.save(&entry).await.unwrap();
}

#[tokio::test]
async fn test_placeholder_to_computed_to_published() {
    let p = pipeline(StubStats::with_availability(0.8), StubHistory::default());
    let key = EntryKey::resource_trust(Some("own"), "r-1");
    seed_stale(&p.store, TrustEntry::placeholder(key.clone())).await;

    let outcome = p.scheduler.run_batch(TrustEntryType::ResourceTrust).await;
    assert_eq!(outcome.selected, 1);
    assert_eq!(outcome.published, 1);

    let updates = p.publisher.take();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].topic(), "resource_trust");
    assert_eq!(updates[0].entry.value, Some(80.0));

    // Freshly recomputed: the entry is no longer stale, so an immediate
    // second run selects nothing.
    let outcome = p.scheduler.run_batch(TrustEntryType::ResourceTrust).await;
    assert_eq!(outcome.selected, 0);
}

#[tokio::test]
async fn test_unchanged_recomputation_stays_quiet() {
    let p = pipeline(StubStats::with_availability(0.8), StubHistory::default());
    let key = EntryKey::resource_trust(Some("own"), "r-1");
    seed_stale(
        &p.store,
        TrustEntry::placeholder(key.clone()).with_value(Some(80.0)),
    )
    .await;

    let outcome = p.scheduler.run_batch(TrustEntryType::ResourceTrust).await;
    assert_eq!(outcome.selected, 1);
    assert_eq!(outcome.published, 0);
    assert_eq!(p.publisher.count(), 0);
}

#[tokio::test]
async fn test_signal_loss_publishes_disappearance_once() {
    let p = pipeline(StubStats::with_availability(0.8), StubHistory::default());
    let key = EntryKey::resource_trust(Some("own"), "r-1");
    seed_stale(
        &p.store,
        TrustEntry::placeholder(key.clone()).with_value(Some(80.0)),
    )
    .await;

    // Monitoring goes dark: the value disappears, which is a change.
    p.stats.set_availability(None);
    let outcome = p.scheduler.run_batch(TrustEntryType::ResourceTrust).await;
    assert_eq!(outcome.published, 1);
    assert_eq!(p.publisher.take()[0].entry.value, None);

    // Still dark on the next run: absent → absent is not a change.
    seed_stale(
        &p.store,
        p.store.get(&key).await.unwrap().unwrap().clone(),
    )
    .await;
    let outcome = p.scheduler.run_batch(TrustEntryType::ResourceTrust).await;
    assert_eq!(outcome.published, 0);
}

#[tokio::test]
async fn test_adaptive_trust_follows_resource_and_reputation() {
    let p = pipeline(StubStats::default(), StubHistory::default());

    // Underlying scores as the scheduler would have left them.
    p.store
        .save(
            &TrustEntry::placeholder(EntryKey::resource_trust(Some("partner"), "r-1"))
                .with_value(Some(10.0)),
        )
        .await
        .unwrap();
    p.store
        .save(
            &TrustEntry::placeholder(EntryKey::platform_reputation("partner"))
                .with_value(Some(70.1)),
        )
        .await
        .unwrap();

    let adaptive_key = EntryKey::adaptive_resource_trust(Some("partner"), "r-1");
    seed_stale(&p.store, TrustEntry::placeholder(adaptive_key.clone())).await;

    // First run: no previous value, so no blending. 10.0 * 0.95 = 9.5.
    let outcome = p
        .scheduler
        .run_batch(TrustEntryType::AdaptiveResourceTrust)
        .await;
    assert_eq!(outcome.published, 1);
    let first = p.store.get(&adaptive_key).await.unwrap().unwrap();
    assert_eq!(first.value, Some(9.5));

    // Second run blends with the previous value: (9.5 + 9.5) / 2 = 9.5,
    // unchanged, so nothing is published.
    seed_stale(&p.store, first).await;
    let outcome = p
        .scheduler
        .run_batch(TrustEntryType::AdaptiveResourceTrust)
        .await;
    assert_eq!(outcome.published, 0);
}

#[tokio::test]
async fn test_entries_without_underlying_scores_stay_absent() {
    let p = pipeline(StubStats::with_availability(0.5), StubHistory::default());

    // Adaptive entries whose underlying resource trust and reputation are
    // missing compute to absent rather than failing; the batch runs to
    // completion over all of them.
    seed_stale(
        &p.store,
        TrustEntry::placeholder(EntryKey::adaptive_resource_trust(Some("p"), "r-a")),
    )
    .await;
    seed_stale(
        &p.store,
        TrustEntry::placeholder(EntryKey::adaptive_resource_trust(Some("p"), "r-b")),
    )
    .await;

    let outcome = p
        .scheduler
        .run_batch(TrustEntryType::AdaptiveResourceTrust)
        .await;
    assert_eq!(outcome.selected, 2);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.published, 0);
}

#[tokio::test]
async fn test_job_types_are_independent() {
    let p = pipeline(StubStats::with_availability(0.9), StubHistory::default());

    seed_stale(
        &p.store,
        TrustEntry::placeholder(EntryKey::resource_trust(Some("own"), "r-1")),
    )
    .await;
    seed_stale(
        &p.store,
        TrustEntry::placeholder(EntryKey::platform_reputation("partner")),
    )
    .await;

    // The resource trust batch only touches resource trust entries.
    let outcome = p.scheduler.run_batch(TrustEntryType::ResourceTrust).await;
    assert_eq!(outcome.selected, 1);

    let reputation = p
        .store
        .get(&EntryKey::platform_reputation("partner"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reputation.value, None);
}
