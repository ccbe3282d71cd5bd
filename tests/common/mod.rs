#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use floorwatch::application::{AppContext, ScheduleSettings};
use floorwatch::domain::{TargetPrice, Theme, TriggerPolicy, Watch};
use floorwatch::infrastructure::{
    fake_provider::FakePriceProvider, memory_store::InMemoryWatchStore,
    recording_notifier::RecordingNotifier,
};

pub struct Harness {
    pub ctx: Arc<AppContext>,
    pub store: InMemoryWatchStore,
    pub provider: FakePriceProvider,
    pub notifier: RecordingNotifier,
}

pub fn harness() -> Harness {
    harness_with(RecordingNotifier::new(), Duration::ZERO)
}

pub fn harness_with(notifier: RecordingNotifier, pacing_delay: Duration) -> Harness {
    let store = InMemoryWatchStore::new();
    let provider = FakePriceProvider::new();
    let ctx = Arc::new(AppContext {
        store: Arc::new(store.clone()),
        provider: Arc::new(provider.clone()),
        notifier: Arc::new(notifier.clone()),
        policy: TriggerPolicy::default(),
        theme: Theme::default(),
        schedule: ScheduleSettings {
            poll_interval: Duration::from_secs(30),
            pacing_delay,
        },
    });
    Harness {
        ctx,
        store,
        provider,
        notifier,
    }
}

pub fn watch(owner: &str, collection: &str, price: f64) -> Watch {
    Watch::new(owner, collection, TargetPrice::new(price).unwrap())
}
