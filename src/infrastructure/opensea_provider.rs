use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::application::{AppError, AppResult, PriceProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.opensea.io";

/// Floor prices from the OpenSea collection stats endpoint.
pub struct OpenSeaPriceProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenSeaPriceProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn stats_url(&self, collection: &str) -> AppResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("opensea base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config("opensea base url cannot be a base".into()))?
            .pop_if_empty()
            .extend(["api", "v2", "collections", collection, "stats"]);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct StatsResp {
    total: TotalStats,
}

#[derive(Debug, Deserialize)]
struct TotalStats {
    floor_price: Option<f64>,
}

fn floor_price_of(collection: &str, body: StatsResp) -> AppResult<f64> {
    match body.total.floor_price {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(p),
        Some(p) => Err(AppError::ProviderUnavailable(format!(
            "{collection}: unusable floor price {p}"
        ))),
        // no listings, nothing to compare against
        None => Err(AppError::ProviderUnavailable(format!(
            "{collection}: no floor price"
        ))),
    }
}

#[async_trait]
impl PriceProvider for OpenSeaPriceProvider {
    async fn floor_price(&self, collection: &str) -> AppResult<f64> {
        let url = self.stats_url(collection)?;

        let mut req = self
            .client
            .get(url)
            .header(USER_AGENT, "floorwatch")
            .header(ACCEPT, "application/json");

        if let Some(key) = &self.api_key {
            req = req.header("X-API-KEY", key);
        }

        // 404 (unknown collection) and 429 (rate limit) both land here
        let resp = req
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::ProviderUnavailable(e.to_string()))?;

        let body: StatsResp = resp
            .json()
            .await
            .map_err(|e| AppError::ProviderUnavailable(e.to_string()))?;

        floor_price_of(collection, body)
    }
}
