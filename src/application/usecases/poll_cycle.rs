use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::application::scheduler::sleep_until_or_shutdown;
use crate::application::usecases::{Delivery, HandleTriggerUseCase};
use crate::application::{AppResult, PriceProvider, WatchStore};
use crate::domain::{Decision, TriggerPolicy};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub checked: usize,
    pub triggered: usize,
    pub provider_failures: usize,
    pub store_failures: usize,
    pub dispatch_failures: usize,
    /// Shutdown was requested before the snapshot was exhausted.
    pub interrupted: bool,
}

pub struct PollCycleUseCase<'a> {
    pub store: &'a dyn WatchStore,
    pub provider: &'a dyn PriceProvider,
    pub policy: TriggerPolicy,
    pub pacing_delay: Duration,
    pub handle_trigger: HandleTriggerUseCase<'a>,
}

impl<'a> PollCycleUseCase<'a> {
    /// One full pass with no way to interrupt it.
    pub async fn execute(&self) -> AppResult<CycleReport> {
        let (_tx, mut rx) = watch::channel(false);
        self.execute_with_shutdown(&mut rx).await
    }

    /// One pass over a snapshot. Shutdown is honored between watches only.
    pub async fn execute_with_shutdown(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> AppResult<CycleReport> {
        let watches = self.store.all().await?;
        let mut report = CycleReport::default();

        for (i, w) in watches.iter().enumerate() {
            let stop = if i == 0 {
                *shutdown.borrow()
            } else {
                sleep_until_or_shutdown(Instant::now() + self.pacing_delay, shutdown).await
            };
            if stop {
                report.interrupted = true;
                break;
            }

            report.checked += 1;
            let current_price = match self.provider.floor_price(&w.collection).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(
                        owner_id = %w.owner_id,
                        collection = %w.collection,
                        error = %e,
                        "price lookup failed, retrying next cycle"
                    );
                    report.provider_failures += 1;
                    continue;
                }
            };

            if self.policy.decide(current_price, w.target_price.value()) == Decision::NoTrigger {
                debug!(
                    owner_id = %w.owner_id,
                    collection = %w.collection,
                    current_price,
                    target_price = w.target_price.value(),
                    "not triggered"
                );
                continue;
            }

            match self.handle_trigger.execute(w, current_price).await {
                Ok(Delivery::Sent) => report.triggered += 1,
                Ok(Delivery::Failed) => {
                    report.triggered += 1;
                    report.dispatch_failures += 1;
                }
                Ok(Delivery::Superseded) => {}
                Err(e) => {
                    warn!(
                        owner_id = %w.owner_id,
                        error = %e,
                        "could not remove triggered watch, skipping"
                    );
                    report.store_failures += 1;
                }
            }
        }

        Ok(report)
    }
}
