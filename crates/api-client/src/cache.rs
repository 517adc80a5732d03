use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct CacheEntry {
    fetched_at: Instant,
    body: Value,
}

/// Raw JSON responses keyed by request URL, each valid for a fixed time-to-live.
///
/// Owned by a single client instance; two clients never share entries.
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// A zero `ttl` disables caching: every lookup misses.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the stored body if it is younger than the TTL. Stale entries are evicted.
    pub async fn get(&self, url: &str) -> Option<Value> {
        let mut entries = self.entries.lock().await;
        match entries.get(url) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(url);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, url: String, body: Value) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.lock().await.insert(
            url,
            CacheEntry {
                fetched_at: Instant::now(),
                body,
            },
        );
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
