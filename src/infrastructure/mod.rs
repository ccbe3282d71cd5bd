pub mod console_notifier;
pub mod discord_notifier;
pub mod fake_provider;
pub mod json_store;
pub mod memory_store;
pub mod multi_notifier;
pub mod opensea_provider;
pub mod recording_notifier;
