use tracing::{debug, info, warn};

use crate::application::{AppResult, Notifier, WatchStore};
use crate::domain::{Notification, Theme, Watch};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Watch removed, send failed. Not retried.
    Failed,
    /// The owner replaced or dropped this watch after the snapshot was taken.
    Superseded,
}

pub struct HandleTriggerUseCase<'a> {
    pub store: &'a dyn WatchStore,
    pub notifier: &'a dyn Notifier,
    pub theme: Theme,
}

impl<'a> HandleTriggerUseCase<'a> {
    /// Removes the watch, then attempts one send. A store error leaves the
    /// watch in place and skips the send.
    pub async fn execute(&self, watch: &Watch, current_price: f64) -> AppResult<Delivery> {
        if !self.store.remove_watch(watch).await? {
            debug!(owner_id = %watch.owner_id, "watch changed during cycle, skipping alert");
            return Ok(Delivery::Superseded);
        }

        let message = Notification::price_alert(&self.theme, watch, current_price);
        match self.notifier.send(&watch.owner_id, &message).await {
            Ok(()) => {
                info!(
                    owner_id = %watch.owner_id,
                    collection = %watch.collection,
                    current_price,
                    "alert sent"
                );
                Ok(Delivery::Sent)
            }
            Err(e) => {
                warn!(
                    owner_id = %watch.owner_id,
                    collection = %watch.collection,
                    error = %e,
                    "alert dispatch failed, watch already removed"
                );
                Ok(Delivery::Failed)
            }
        }
    }
}
