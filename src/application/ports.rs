use async_trait::async_trait;

use crate::domain::{Notification, TargetPriceError, Watch};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("watch store is corrupt: {0}")]
    StorageCorrupt(String),
    #[error("storage error: {0}")]
    StorageIo(String),
    #[error("price provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("dispatch failed: {0}")]
    Dispatch(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<TargetPriceError> for AppError {
    fn from(e: TargetPriceError) -> Self {
        AppError::InvalidArgument(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Current floor price of a marketplace collection.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn floor_price(&self, collection: &str) -> AppResult<f64>;
}

/// Durable owner-id -> watch mapping. Implementations serialize all calls.
#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Insert or replace the owner's watch. Persisted before returning.
    async fn add(&self, watch: Watch) -> AppResult<()>;

    /// Delete the owner's watch. Absent owner is not an error.
    async fn remove(&self, owner_id: &str) -> AppResult<()>;

    /// Delete the owner's watch only if it still equals `watch`.
    /// Returns false when it was replaced or removed in the meantime.
    async fn remove_watch(&self, watch: &Watch) -> AppResult<bool>;

    /// Snapshot of every watch, ordered by owner id.
    async fn all(&self) -> AppResult<Vec<Watch>>;
}

/// Deliver a structured message to a user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, owner_id: &str, message: &Notification) -> AppResult<()>;
}
