use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::services::kv::KeyValueStore;

/// Cache TTLs, per endpoint. Meta aggregations and deck details are expensive
/// to rebuild (one upstream call per tournament), tournament listings are one
/// call and can go stale faster.
pub const META_TTL_SECS: u64 = 43_200;
pub const TOURNAMENTS_TTL_SECS: u64 = 21_600;
pub const DECK_TTL_SECS: u64 = 43_200;

/// Cache-aside wrapper over the key-value store. Read and write failures are
/// logged and swallowed; a broken cache degrades to fetching upstream.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn KeyValueStore>,
}

impl CacheService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!("Discarding unparseable cache entry {}: {}", key, err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::error!("Cache get error for {}: {}", key, err);
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("Cache serialize error for {}: {}", key, err);
                return;
            }
        };
        if let Err(err) = self.store.put(key, &raw, ttl_secs).await {
            tracing::error!("Cache set error for {}: {}", key, err);
        }
    }

    pub async fn delete(&self, key: &str) {
        if let Err(err) = self.store.delete(key).await {
            tracing::error!("Cache delete error for {}: {}", key, err);
        }
    }

    pub fn meta_key(game: &str, format: &str, days: i64, limit: usize) -> String {
        format!("{}:meta:top:{}:{}:{}", game, format, days, limit)
    }

    pub fn tournaments_key(game: &str, format: &str, days: i64, limit: usize) -> String {
        format!("{}:tournaments:recent:{}:{}:{}", game, format, days, limit)
    }

    pub fn deck_key(game: &str, deck_name: &str, format: &str, days: i64) -> String {
        format!("{}:deck:{}:{}:{}", game, deck_name, format, days)
    }
}
