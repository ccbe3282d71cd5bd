use async_trait::async_trait;

use crate::application::{AppResult, Notifier};
use crate::domain::Notification;

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, owner_id: &str, message: &Notification) -> AppResult<()> {
        println!(
            "NOTIFY: to={} color=0x{:06x}\n{}",
            owner_id,
            message.color.0,
            message.to_plain_text()
        );
        Ok(())
    }
}
