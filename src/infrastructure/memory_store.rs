use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::{AppError, AppResult, WatchStore};
use crate::domain::Watch;

/// Non-persistent store with the same semantics as the file store.
#[derive(Clone, Default)]
pub struct InMemoryWatchStore {
    inner: Arc<Mutex<BTreeMap<String, Watch>>>,
}

impl InMemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_watches(watches: Vec<Watch>) -> Self {
        let map = watches
            .into_iter()
            .map(|w| (w.owner_id.clone(), w))
            .collect();
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, owner_id: &str) -> Option<Watch> {
        self.inner.lock().ok()?.get(owner_id).cloned()
    }
}

#[async_trait]
impl WatchStore for InMemoryWatchStore {
    async fn add(&self, watch: Watch) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::StorageIo("lock poisoned".into()))?;
        inner.insert(watch.owner_id.clone(), watch);
        Ok(())
    }

    async fn remove(&self, owner_id: &str) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::StorageIo("lock poisoned".into()))?;
        inner.remove(owner_id);
        Ok(())
    }

    async fn remove_watch(&self, watch: &Watch) -> AppResult<bool> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::StorageIo("lock poisoned".into()))?;
        if inner.get(&watch.owner_id) != Some(watch) {
            return Ok(false);
        }
        inner.remove(&watch.owner_id);
        Ok(true)
    }

    async fn all(&self) -> AppResult<Vec<Watch>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::StorageIo("lock poisoned".into()))?;
        Ok(inner.values().cloned().collect())
    }
}
