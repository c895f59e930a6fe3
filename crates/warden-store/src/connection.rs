//! Backend selection and connection management.

use std::time::Duration;

use tracing::info;
use warden_core::error::WardenResult;
use warden_core::repository::KeyValueStore;

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::redis_store::RedisStore;

/// Configuration for the key-value backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis URL (e.g., `redis://127.0.0.1:6379/0`). `None` selects the
    /// in-process store.
    pub url: Option<String>,
    /// Upper bound on any single store round-trip.
    pub io_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            io_timeout: Duration::from_secs(60),
        }
    }
}

/// Runtime-selected key-value backend.
#[derive(Clone)]
pub enum Backend {
    Memory(MemoryStore),
    Redis(RedisStore),
}

impl Backend {
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        match &config.url {
            Some(url) => Ok(Backend::Redis(RedisStore::connect(url, config.io_timeout).await?)),
            None => {
                info!("No store URL configured, using in-memory store");
                Ok(Backend::Memory(MemoryStore::new()))
            }
        }
    }
}

impl KeyValueStore for Backend {
    async fn get(&self, key: &str) -> WardenResult<Option<String>> {
        match self {
            Backend::Memory(s) => s.get(key).await,
            Backend::Redis(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> WardenResult<()> {
        match self {
            Backend::Memory(s) => s.set(key, value).await,
            Backend::Redis(s) => s.set(key, value).await,
        }
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> WardenResult<()> {
        match self {
            Backend::Memory(s) => s.set_with_ttl(key, value, ttl).await,
            Backend::Redis(s) => s.set_with_ttl(key, value, ttl).await,
        }
    }

    async fn take(&self, key: &str) -> WardenResult<Option<String>> {
        match self {
            Backend::Memory(s) => s.take(key).await,
            Backend::Redis(s) => s.take(key).await,
        }
    }

    async fn delete_if_eq(&self, key: &str, expected: &str) -> WardenResult<bool> {
        match self {
            Backend::Memory(s) => s.delete_if_eq(key, expected).await,
            Backend::Redis(s) => s.delete_if_eq(key, expected).await,
        }
    }

    async fn delete(&self, key: &str) -> WardenResult<()> {
        match self {
            Backend::Memory(s) => s.delete(key).await,
            Backend::Redis(s) => s.delete(key).await,
        }
    }
}
