use serde::Deserialize;
use std::collections::HashMap;

// CoinGecko already uses snake_case keys, so no renaming is needed here.

/// The response from `GET /simple/price`: coin id -> currency code -> price.
pub type SimplePrice = HashMap<String, HashMap<String, f64>>;

/// The response from `GET /coins/{id}` (tickers, community and developer data disabled).
#[derive(Debug, Clone, Deserialize)]
pub struct CoinData {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<CoinImage>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinImage {
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub large: Option<String>,
}

/// Market figures of a coin, keyed by lowercase currency code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarketData {
    pub current_price: HashMap<String, f64>,
    pub market_cap: HashMap<String, f64>,
    pub total_volume: HashMap<String, f64>,
}

impl MarketData {
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        self.current_price.get(&currency.to_ascii_lowercase()).copied()
    }
}

/// A single entry of `GET /coins/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinListEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// A single row of `GET /coins/markets`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

/// The response from `GET /coins/{id}/market_chart`: `[unix_millis, value]` samples.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarketChart {
    pub prices: Vec<(f64, f64)>,
    pub market_caps: Vec<(f64, f64)>,
    pub total_volumes: Vec<(f64, f64)>,
}
