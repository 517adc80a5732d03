use crate::cache::ResponseCache;
use crate::error::ApiError;
use async_trait::async_trait;
use configuration::{ApiConfig, NetworkDefaults};
use core_types::{Currency, NetworkInfo};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod cache;
pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{CoinData, CoinImage, CoinListEntry, MarketChart, MarketData, MarketEntry, SimplePrice};

/// The abstract interface for a public market-data provider.
/// The calculators depend on this trait so the live client can be swapped for a stub.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches the spot price of a coin in the given currency.
    async fn coin_price(&self, coin_id: &str, currency: Currency) -> Result<f64, ApiError>;

    /// Fetches a coin's profile and market figures.
    async fn coin_data(&self, coin_id: &str) -> Result<CoinData, ApiError>;

    /// Fetches every coin id the provider knows about.
    async fn coin_list(&self) -> Result<Vec<CoinListEntry>, ApiError>;

    /// Fetches one page of coins ordered by market cap, largest first.
    async fn market_data(&self, currency: Currency, per_page: u32, page: u32) -> Result<Vec<MarketEntry>, ApiError>;

    /// Fetches `days` days of price, market-cap and volume history.
    async fn historical_data(&self, coin_id: &str, currency: Currency, days: u32) -> Result<MarketChart, ApiError>;

    /// Assembles the network snapshot the mining calculator needs.
    async fn bitcoin_network_info(&self) -> Result<NetworkInfo, ApiError>;

    /// Forgets every cached response.
    async fn clear_cache(&self);
}

/// A `MarketDataClient` backed by the public CoinGecko v3 REST API.
///
/// Each instance owns its response cache; responses younger than the configured TTL
/// are served without a network round trip.
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
    network: NetworkDefaults,
}

impl CoinGeckoClient {
    pub fn new(api_config: &ApiConfig, network: &NetworkDefaults) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(api_config.request_timeout())
            .user_agent(concat!("cryptocalc/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: api_config.base_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(api_config.cache_ttl()),
            network: network.clone(),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// GETs `endpoint` relative to the base URL, going through the cache.
    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        if let Some(body) = self.cache.get(&url).await {
            tracing::debug!(%url, "Serving market data from cache.");
            return serde_json::from_value(body).map_err(|e| ApiError::Deserialization(e.to_string()));
        }

        tracing::info!(%url, "Fetching market data.");
        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(%url, error = ?e, "Market data request failed.");
            ApiError::Request(e)
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(%url, status = status.as_u16(), "Market data API returned an error.");
            return Err(ApiError::Status(status.as_u16(), text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        // Parse before caching so a response of the wrong shape is never replayed.
        let parsed = serde_json::from_value::<T>(body.clone())
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        self.cache.insert(url, body).await;

        Ok(parsed)
    }
}

#[async_trait]
impl MarketDataClient for CoinGeckoClient {
    async fn coin_price(&self, coin_id: &str, currency: Currency) -> Result<f64, ApiError> {
        validate_coin_id(coin_id)?;
        let endpoint = format!("/simple/price?ids={}&vs_currencies={}", coin_id, currency.code());
        let prices: SimplePrice = self.fetch(&endpoint).await?;

        prices
            .get(coin_id)
            .and_then(|by_currency| by_currency.get(currency.code()))
            .copied()
            .ok_or_else(|| ApiError::InvalidData(format!("no {} price for '{}'", currency.code(), coin_id)))
    }

    async fn coin_data(&self, coin_id: &str) -> Result<CoinData, ApiError> {
        validate_coin_id(coin_id)?;
        let endpoint = format!(
            "/coins/{}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false",
            coin_id
        );
        self.fetch(&endpoint).await
    }

    async fn coin_list(&self) -> Result<Vec<CoinListEntry>, ApiError> {
        self.fetch("/coins/list").await
    }

    async fn market_data(&self, currency: Currency, per_page: u32, page: u32) -> Result<Vec<MarketEntry>, ApiError> {
        if per_page == 0 || page == 0 {
            return Err(ApiError::InvalidRequest("per_page and page start at 1".to_string()));
        }
        let endpoint = format!(
            "/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page={}&sparkline=false",
            currency.code(),
            per_page,
            page
        );
        self.fetch(&endpoint).await
    }

    async fn historical_data(&self, coin_id: &str, currency: Currency, days: u32) -> Result<MarketChart, ApiError> {
        validate_coin_id(coin_id)?;
        let endpoint = format!(
            "/coins/{}/market_chart?vs_currency={}&days={}",
            coin_id,
            currency.code(),
            days
        );
        self.fetch(&endpoint).await
    }

    async fn bitcoin_network_info(&self) -> Result<NetworkInfo, ApiError> {
        let bitcoin = self.coin_data("bitcoin").await?;
        let market = bitcoin
            .market_data
            .ok_or_else(|| ApiError::InvalidData("bitcoin response has no market_data".to_string()))?;
        let price = market
            .price_in("usd")
            .ok_or_else(|| ApiError::InvalidData("bitcoin response has no USD price".to_string()))?;

        // The price API has no network statistics; those come from configuration.
        Ok(NetworkInfo {
            price,
            hashrate: self.network.hashrate_ths,
            block_reward: self.network.block_reward,
            block_time: self.network.block_time_secs,
            market_cap: market.market_cap.get("usd").copied(),
            total_volume: market.total_volume.get("usd").copied(),
            difficulty: Some(self.network.difficulty),
        })
    }

    async fn clear_cache(&self) {
        self.cache.clear().await;
        tracing::debug!("Market data cache cleared.");
    }
}

/// Coin ids are interpolated into URLs, so only CoinGecko's id alphabet is allowed.
fn validate_coin_id(coin_id: &str) -> Result<(), ApiError> {
    let valid = !coin_id.is_empty()
        && coin_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidRequest(format!("invalid coin id '{}'", coin_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coin_ids_are_restricted() {
        assert!(validate_coin_id("bitcoin").is_ok());
        assert!(validate_coin_id("wrapped-bitcoin").is_ok());
        assert!(validate_coin_id("").is_err());
        assert!(validate_coin_id("bitcoin&ids=eth").is_err());
        assert!(validate_coin_id("Bitcoin").is_err());
    }
}
