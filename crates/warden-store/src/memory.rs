//! In-process implementation of [`KeyValueStore`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use warden_core::error::WardenResult;
use warden_core::repository::KeyValueStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Shared in-memory key-value map. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn insert(&self, key: &str, value: String, expires_at: Option<Instant>) {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, e| e.is_live(now));
        entries.insert(key.to_string(), Entry { value, expires_at });
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> WardenResult<Option<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: String) -> WardenResult<()> {
        self.insert(key, value, None).await;
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> WardenResult<()> {
        self.insert(key, value, Some(Instant::now() + ttl)).await;
        Ok(())
    }

    async fn take(&self, key: &str) -> WardenResult<Option<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .await
            .remove(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value))
    }

    async fn delete_if_eq(&self, key: &str, expected: &str) -> WardenResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let matches = entries
            .get(key)
            .is_some_and(|e| e.is_live(now) && e.value == expected);
        if matches {
            entries.remove(key);
        }
        Ok(matches)
    }

    async fn delete(&self, key: &str) -> WardenResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryStore::new();
        store.set("k", "v".into()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v".into()).await.unwrap();
        assert_eq!(other.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn take_removes_value() {
        let store = MemoryStore::new();
        store.set("k", "v".into()).await.unwrap();
        assert_eq!(store.take("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.take("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_if_eq_requires_matching_value() {
        let store = MemoryStore::new();
        store.set("k", "v".into()).await.unwrap();

        assert!(!store.delete_if_eq("k", "other").await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        assert!(store.delete_if_eq("k", "v").await.unwrap());
        assert!(!store.delete_if_eq("k", "v").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_delete_if_eq_removes_once() {
        let store = MemoryStore::new();
        store.set("k", "v".into()).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.delete_if_eq("k", "v").await.unwrap() })
            })
            .collect();

        let mut removed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                removed += 1;
            }
        }
        assert_eq!(removed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ttl_entries_expire() {
        let store = MemoryStore::new();
        store
            .set_with_ttl("otp", "123456".into(), Duration::from_secs(120))
            .await
            .unwrap();
        store.set("ledger", "{}".into()).await.unwrap();

        tokio::time::advance(Duration::from_secs(119)).await;
        assert!(store.get("otp").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(store.get("otp").await.unwrap(), None);
        // Entries without a TTL persist.
        assert!(store.get("ledger").await.unwrap().is_some());
        assert_eq!(store.len().await, 1);
    }
}
