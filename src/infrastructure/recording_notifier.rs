use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::{AppError, AppResult, Notifier};
use crate::domain::Notification;

/// Keeps every send attempt in memory. Can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, Notification)>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, Notification)> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|v| v.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, owner_id: &str, message: &Notification) -> AppResult<()> {
        self.sent
            .lock()
            .map_err(|_| AppError::Dispatch("lock poisoned".into()))?
            .push((owner_id.to_string(), message.clone()));
        if self.fail {
            return Err(AppError::Dispatch("recipient unreachable".into()));
        }
        Ok(())
    }
}
