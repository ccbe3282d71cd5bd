mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use floorwatch::application::scheduler::PollingScheduler;
use floorwatch::application::{AppContext, AppResult, PriceProvider, ScheduleSettings, WatchStore};
use floorwatch::domain::{Theme, TriggerPolicy};
use floorwatch::infrastructure::{
    fake_provider::FakePriceProvider, memory_store::InMemoryWatchStore,
    recording_notifier::RecordingNotifier,
};

use common::{harness_with, watch};

fn offsets(start: Instant, times: Vec<Instant>) -> Vec<u64> {
    times.into_iter().map(|t| (t - start).as_secs()).collect()
}

#[tokio::test(start_paused = true)]
async fn cycles_start_on_fixed_interval() {
    let h = harness_with(RecordingNotifier::new(), Duration::from_secs(2));
    h.store.add(watch("a", "one", 1.0)).await.unwrap();
    h.store.add(watch("b", "two", 1.0)).await.unwrap();
    h.provider.set_price("one", 5.0);
    h.provider.set_price("two", 5.0);

    let start = Instant::now();
    let (tx, rx) = tokio::sync::watch::channel(false);
    let scheduler = PollingScheduler::new(Arc::clone(&h.ctx));
    let task = tokio::spawn(async move { scheduler.run(rx).await });

    tokio::time::sleep(Duration::from_secs(65)).await;
    tx.send(true).unwrap();
    task.await.unwrap();

    // cycle length (2s of pacing) does not push later cycles back
    assert_eq!(
        offsets(start, h.provider.call_times()),
        vec![0, 2, 30, 32, 60, 62]
    );
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_wait_stops_promptly() {
    let h = harness_with(RecordingNotifier::new(), Duration::from_secs(2));
    h.store.add(watch("a", "one", 1.0)).await.unwrap();
    h.provider.set_price("one", 5.0);

    let start = Instant::now();
    let (tx, rx) = tokio::sync::watch::channel(false);
    let scheduler = PollingScheduler::new(Arc::clone(&h.ctx));
    let task = tokio::spawn(async move { scheduler.run(rx).await });

    tokio::time::sleep(Duration::from_secs(10)).await;
    tx.send(true).unwrap();
    task.await.unwrap();

    assert_eq!(h.provider.calls().len(), 1);
    assert_eq!((Instant::now() - start).as_secs(), 10);
}

#[tokio::test(start_paused = true)]
async fn shutdown_mid_cycle_finishes_current_watch_only() {
    let h = harness_with(RecordingNotifier::new(), Duration::from_secs(2));
    for (owner, collection) in [("a", "one"), ("b", "two"), ("c", "three")] {
        h.store.add(watch(owner, collection, 1.0)).await.unwrap();
        h.provider.set_price(collection, 5.0);
    }

    let (tx, mut rx) = tokio::sync::watch::channel(false);
    let scheduler = PollingScheduler::new(Arc::clone(&h.ctx));
    let task = tokio::spawn(async move { scheduler.run_cycle(&mut rx).await });

    // lands inside the pacing delay after the second lookup
    tokio::time::sleep(Duration::from_secs(3)).await;
    tx.send(true).unwrap();
    let report = task.await.unwrap().unwrap();

    assert!(report.interrupted);
    assert_eq!(report.checked, 2);
    assert_eq!(h.provider.calls(), vec!["one", "two"]);
    assert_eq!(h.store.len(), 3);
}

/// Each lookup takes 20s, so a two-watch cycle overruns a 30s interval.
struct SlowProvider {
    inner: FakePriceProvider,
}

#[async_trait]
impl PriceProvider for SlowProvider {
    async fn floor_price(&self, collection: &str) -> AppResult<f64> {
        let price = self.inner.floor_price(collection).await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        price
    }
}

#[tokio::test(start_paused = true)]
async fn overrunning_cycle_starts_next_immediately() {
    let store = InMemoryWatchStore::new();
    let fake = FakePriceProvider::new();
    for (owner, collection) in [("a", "one"), ("b", "two")] {
        store.add(watch(owner, collection, 1.0)).await.unwrap();
        fake.set_price(collection, 5.0);
    }
    let ctx = Arc::new(AppContext {
        store: Arc::new(store.clone()),
        provider: Arc::new(SlowProvider {
            inner: fake.clone(),
        }),
        notifier: Arc::new(RecordingNotifier::new()),
        policy: TriggerPolicy::default(),
        theme: Theme::default(),
        schedule: ScheduleSettings {
            poll_interval: Duration::from_secs(30),
            pacing_delay: Duration::ZERO,
        },
    });

    let start = Instant::now();
    let (tx, rx) = tokio::sync::watch::channel(false);
    let scheduler = PollingScheduler::new(ctx);
    let task = tokio::spawn(async move { scheduler.run(rx).await });

    tokio::time::sleep(Duration::from_secs(85)).await;
    tx.send(true).unwrap();
    task.await.unwrap();

    // cycles of 40s back to back, no catch-up burst
    assert_eq!(
        offsets(start, fake.call_times()),
        vec![0, 20, 40, 60, 80]
    );
}
