use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Narrow key-value surface shared by the cache and the rate limiter.
/// A zero TTL means the entry never expires.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError>;
    async fn delete(&self, key: &str) -> Result<(), KvError>;
}

/// Seconds-resolution clock, injectable so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually advanced clock for tests.
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct RedisStore {
    client: Arc<redis::Client>,
}

impl RedisStore {
    pub fn new(client: Arc<redis::Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.client.get_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let mut conn = self.client.get_async_connection().await?;
        if ttl_secs > 0 {
            let _: () = conn.set_ex(key, value, ttl_secs as usize).await?;
        } else {
            let _: () = conn.set(key, value).await?;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.client.get_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

struct MemoryEntry {
    value: String,
    expires_at: Option<i64>,
}

/// In-process store backing the tests and any environment without a
/// reachable redis.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, MemoryEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| KvError::Unavailable("memory store lock poisoned".into()))?;
        let expired = matches!(
            entries.get(key),
            Some(MemoryEntry {
                expires_at: Some(at),
                ..
            }) if *at <= self.clock.now()
        );
        if expired {
            entries.remove(key);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| KvError::Unavailable("memory store lock poisoned".into()))?;
        let expires_at = (ttl_secs > 0).then(|| self.clock.now() + ttl_secs as i64);
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| KvError::Unavailable("memory store lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}
