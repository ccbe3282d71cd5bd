use std::sync::Arc;
use std::time::Duration;

use crate::application::usecases::{HandleTriggerUseCase, PollCycleUseCase, RegisterUseCase};
use crate::application::{Notifier, PriceProvider, WatchStore};
use crate::domain::{Theme, TriggerPolicy};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub poll_interval: Duration,
    pub pacing_delay: Duration,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            pacing_delay: Duration::from_secs(2),
        }
    }
}

/// Everything the scheduler and the command path share. Built once in `main`.
pub struct AppContext {
    pub store: Arc<dyn WatchStore>,
    pub provider: Arc<dyn PriceProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub policy: TriggerPolicy,
    pub theme: Theme,
    pub schedule: ScheduleSettings,
}

impl AppContext {
    pub fn register(&self) -> RegisterUseCase<'_> {
        RegisterUseCase {
            store: self.store.as_ref(),
            provider: self.provider.as_ref(),
            policy: self.policy,
        }
    }

    pub fn poll_cycle(&self) -> PollCycleUseCase<'_> {
        PollCycleUseCase {
            store: self.store.as_ref(),
            provider: self.provider.as_ref(),
            policy: self.policy,
            pacing_delay: self.schedule.pacing_delay,
            handle_trigger: HandleTriggerUseCase {
                store: self.store.as_ref(),
                notifier: self.notifier.as_ref(),
                theme: self.theme,
            },
        }
    }
}
