//! Store en memoria
//!
//! Implementación de `CacheOperations` sin dependencias externas. Se usa
//! cuando no hay `REDIS_URL` (desarrollo local) y en los tests. Respeta los
//! TTL con `tokio::time::Instant`, así que los tests pueden avanzar el reloj.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::CacheOperations;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    /// `None` si el TTL no cabe en el reloj: la clave no expira
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(value: &str, now: Instant, ttl_secs: u64) -> Self {
        Self {
            value: value.to_string(),
            expires_at: now.checked_add(Duration::from_secs(ttl_secs)),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de claves vivas
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|v| !v.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl CacheOperations for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(stored) if stored.is_expired(now) => {
                entries.remove(key);
                debug!("⏰ Clave expirada en memoria: {}", key);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let stored = StoredValue::new(value, Instant::now(), ttl_secs);
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), stored);
        debug!("💾 SET en memoria: {} (TTL: {}s)", key, ttl_secs);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if let Some(stored) = entries.get(key) {
            if !stored.is_expired(now) {
                return Ok(false);
            }
        }

        entries.insert(key.to_string(), StoredValue::new(value, now, ttl_secs));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        match entries.get(key) {
            Some(stored) if !stored.is_expired(now) && stored.value == expected => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>> {
        let now = Instant::now();
        let entries = self.entries.read().await;

        Ok(entries
            .get(key)
            .filter(|stored| !stored.is_expired(now))
            .and_then(|stored| stored.expires_at)
            .map(|expires_at| expires_at.duration_since(now).as_secs()))
    }

    async fn ping(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let store = MemoryStore::new();
        store.set("content:2026-10-16", "hello", 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(store.get("content:2026-10-16").await.unwrap(), Some("hello".to_string()));
        assert_eq!(store.ttl("content:2026-10-16").await.unwrap(), Some(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("content:2026-10-16").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_if_absent_only_writes_once_until_expiry() {
        let store = MemoryStore::new();

        assert!(store.set_if_absent("generating:2026-10-16", "1", 5).await.unwrap());
        assert!(!store.set_if_absent("generating:2026-10-16", "2", 5).await.unwrap());
        assert_eq!(store.get("generating:2026-10-16").await.unwrap(), Some("1".to_string()));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(store.set_if_absent("generating:2026-10-16", "3", 5).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_if_equals_only_removes_matching_value() {
        let store = MemoryStore::new();
        store.set("generating:2026-10-16", "owner-a", 60).await.unwrap();

        assert!(!store.delete_if_equals("generating:2026-10-16", "owner-b").await.unwrap());
        assert!(store.exists("generating:2026-10-16").await.unwrap());

        assert!(store.delete_if_equals("generating:2026-10-16", "owner-a").await.unwrap());
        assert!(!store.exists("generating:2026-10-16").await.unwrap());
        assert!(!store.delete_if_equals("generating:2026-10-16", "owner-a").await.unwrap());
    }

    #[tokio::test]
    async fn test_huge_ttl_does_not_overflow() {
        let store = MemoryStore::new();

        store.set("content:2026-10-16", "hello", u64::MAX).await.unwrap();
        assert!(store.set_if_absent("generating:2026-10-16", "1", u64::MAX).await.unwrap());

        assert_eq!(store.get("content:2026-10-16").await.unwrap(), Some("hello".to_string()));
        assert_eq!(store.ttl("content:2026-10-16").await.unwrap(), None);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.delete("content:1999-01-01").await.is_ok());
        assert!(!store.exists("content:1999-01-01").await.unwrap());
    }
}
