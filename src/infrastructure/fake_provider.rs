use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::application::{AppError, AppResult, PriceProvider};

/// Scripted prices for local runs and tests. Records every lookup.
#[derive(Clone, Default)]
pub struct FakePriceProvider {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    prices: HashMap<String, f64>,
    calls: Vec<(String, Instant)>,
}

impl FakePriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&self, collection: &str, price: f64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.prices.insert(collection.to_string(), price);
        }
    }

    /// Lookups for `collection` fail until a price is set again.
    pub fn fail(&self, collection: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.prices.remove(collection);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|i| i.calls.iter().map(|(c, _)| c.clone()).collect())
            .unwrap_or_default()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.inner
            .lock()
            .map(|i| i.calls.iter().map(|(_, t)| *t).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PriceProvider for FakePriceProvider {
    async fn floor_price(&self, collection: &str) -> AppResult<f64> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::ProviderUnavailable("lock poisoned".into()))?;
        inner.calls.push((collection.to_string(), Instant::now()));
        inner
            .prices
            .get(collection)
            .copied()
            .ok_or_else(|| AppError::ProviderUnavailable(format!("unknown collection {collection}")))
    }
}
