//! Exercises `CoinGeckoClient` against a local stand-in for the CoinGecko API.

use api_client::error::ApiError;
use api_client::{CoinGeckoClient, MarketDataClient};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use configuration::{ApiConfig, NetworkDefaults};
use core_types::Currency;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

async fn coin(Path(id): Path<String>, State(hits): State<Hits>) -> Response {
    hits.0.fetch_add(1, Ordering::SeqCst);
    match id.as_str() {
        "list" => Json(json!([
            { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin" },
            { "id": "ethereum", "symbol": "eth", "name": "Ethereum" }
        ]))
        .into_response(),
        "bitcoin" => Json(json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": { "thumb": null, "small": "https://img/btc-small.png", "large": null },
            "market_data": {
                "current_price": { "usd": 60000.0, "eur": 55000.0 },
                "market_cap": { "usd": 1.2e12 },
                "total_volume": { "usd": 3.0e10 }
            }
        }))
        .into_response(),
        "garbled" => Json(json!({ "unexpected": true })).into_response(),
        _ => (StatusCode::NOT_FOUND, "coin not found").into_response(),
    }
}

async fn simple_price(Query(params): Query<HashMap<String, String>>, State(hits): State<Hits>) -> Json<serde_json::Value> {
    hits.0.fetch_add(1, Ordering::SeqCst);
    let id = params.get("ids").cloned().unwrap_or_default();
    let currency = params.get("vs_currencies").cloned().unwrap_or_default();
    Json(json!({ id: { currency: 42000.5 } }))
}

async fn market_chart(Path(_id): Path<String>, State(hits): State<Hits>) -> Json<serde_json::Value> {
    hits.0.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "prices": [[1700000000000.0, 36000.0], [1700086400000.0, 36500.0]],
        "market_caps": [],
        "total_volumes": []
    }))
}

async fn spawn_server() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/coins/:id", get(coin))
        .route("/coins/:id/market_chart", get(market_chart))
        .route("/simple/price", get(simple_price))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

fn client(base_url: &str, cache_ttl_secs: u64) -> CoinGeckoClient {
    let api = ApiConfig {
        base_url: base_url.to_string(),
        cache_ttl_secs,
        request_timeout_secs: 5,
    };
    CoinGeckoClient::new(&api, &NetworkDefaults::default()).unwrap()
}

#[tokio::test]
async fn network_info_combines_price_and_configured_constants() {
    let (base_url, _hits) = spawn_server().await;
    let info = client(&base_url, 300).bitcoin_network_info().await.unwrap();

    assert_eq!(info.price, 60000.0);
    assert_eq!(info.hashrate, 350_000_000.0);
    assert_eq!(info.block_reward, 6.25);
    assert_eq!(info.block_time, 600.0);
    assert_eq!(info.market_cap, Some(1.2e12));
    assert_eq!(info.total_volume, Some(3.0e10));
    assert_eq!(info.difficulty, Some(70_000_000_000_000.0));
}

#[tokio::test]
async fn responses_are_cached_until_cleared() {
    let (base_url, hits) = spawn_server().await;
    let client = client(&base_url, 300);

    let first = client.coin_data("bitcoin").await.unwrap();
    let second = client.coin_data("bitcoin").await.unwrap();
    assert_eq!(first.name, second.name);
    assert_eq!(hits.count(), 1);
    assert_eq!(client.cache().len().await, 1);

    client.clear_cache().await;
    client.coin_data("bitcoin").await.unwrap();
    assert_eq!(hits.count(), 2);
}

#[tokio::test]
async fn zero_ttl_always_goes_to_the_network() {
    let (base_url, hits) = spawn_server().await;
    let client = client(&base_url, 0);

    client.coin_list().await.unwrap();
    client.coin_list().await.unwrap();
    assert_eq!(hits.count(), 2);
}

#[tokio::test]
async fn caches_are_per_client() {
    let (base_url, hits) = spawn_server().await;
    client(&base_url, 300).coin_list().await.unwrap();
    client(&base_url, 300).coin_list().await.unwrap();
    assert_eq!(hits.count(), 2);
}

#[tokio::test]
async fn simple_price_is_unwrapped() {
    let (base_url, _hits) = spawn_server().await;
    let price = client(&base_url, 300).coin_price("ethereum", Currency::Eur).await.unwrap();
    assert_eq!(price, 42000.5);
}

#[tokio::test]
async fn market_chart_samples_are_parsed() {
    let (base_url, _hits) = spawn_server().await;
    let chart = client(&base_url, 300)
        .historical_data("bitcoin", Currency::Usd, 30)
        .await
        .unwrap();
    assert_eq!(chart.prices.len(), 2);
    assert_eq!(chart.prices[1].1, 36500.0);
}

#[tokio::test]
async fn error_status_is_surfaced_and_not_cached() {
    let (base_url, hits) = spawn_server().await;
    let client = client(&base_url, 300);

    let err = client.coin_data("dogecoin").await.unwrap_err();
    assert!(matches!(err, ApiError::Status(404, body) if body == "coin not found"));
    assert!(client.cache().is_empty().await);

    client.coin_data("dogecoin").await.unwrap_err();
    assert_eq!(hits.count(), 2);
}

#[tokio::test]
async fn wrong_shape_is_a_deserialization_error() {
    let (base_url, _hits) = spawn_server().await;
    let client = client(&base_url, 300);
    let err = client.coin_data("garbled").await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)));
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn invalid_requests_never_reach_the_server() {
    let (base_url, hits) = spawn_server().await;
    let client = client(&base_url, 300);

    assert!(matches!(client.coin_data("../admin").await, Err(ApiError::InvalidRequest(_))));
    assert!(matches!(client.market_data(Currency::Usd, 0, 1).await, Err(ApiError::InvalidRequest(_))));
    assert_eq!(hits.count(), 0);
}
