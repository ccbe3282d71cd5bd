use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::Notification;

pub struct MultiNotifier {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn send(&self, owner_id: &str, message: &Notification) -> AppResult<()> {
        // every channel gets a try; one failure does not stop the rest
        let mut last_err = None;

        for n in &self.notifiers {
            if let Err(e) = n.send(owner_id, message).await {
                last_err = Some(e);
            }
        }

        if let Some(e) = last_err {
            return Err(e);
        }

        Ok(())
    }
}
