use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::application::usecases::CycleReport;
use crate::application::{AppContext, AppResult};

/// Sleeps until `deadline`. Returns true as soon as shutdown is requested.
pub(crate) async fn sleep_until_or_shutdown(
    deadline: Instant,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    loop {
        if *shutdown.borrow_and_update() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => return false,
            changed = shutdown.changed() => {
                if changed.is_err() {
                    // sender dropped: nobody can ask us to stop any more
                    tokio::time::sleep_until(deadline).await;
                    return false;
                }
            }
        }
    }
}

/// Drives poll cycles on a fixed cadence until shutdown.
pub struct PollingScheduler {
    ctx: Arc<AppContext>,
}

impl PollingScheduler {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub async fn run_cycle(&self, shutdown: &mut watch::Receiver<bool>) -> AppResult<CycleReport> {
        self.ctx.poll_cycle().execute_with_shutdown(shutdown).await
    }

    /// Cycles start at `start + n * interval`. An overrunning cycle is
    /// followed immediately by the next one and the schedule is rebased.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.ctx.schedule.poll_interval;
        let mut deadline = Instant::now();

        info!(
            poll_interval_secs = interval.as_secs_f64(),
            pacing_delay_secs = self.ctx.schedule.pacing_delay.as_secs_f64(),
            "polling started"
        );

        loop {
            match self.run_cycle(&mut shutdown).await {
                Ok(report) => info!(
                    checked = report.checked,
                    triggered = report.triggered,
                    provider_failures = report.provider_failures,
                    store_failures = report.store_failures,
                    dispatch_failures = report.dispatch_failures,
                    "poll cycle finished"
                ),
                Err(e) => error!(error = %e, "poll cycle failed"),
            }

            if *shutdown.borrow() {
                break;
            }

            deadline += interval;
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    overrun_ms = (now - deadline).as_millis() as u64,
                    "poll cycle overran its interval"
                );
                deadline = now;
                continue;
            }

            if sleep_until_or_shutdown(deadline, &mut shutdown).await {
                break;
            }
        }

        info!("polling stopped");
    }
}
