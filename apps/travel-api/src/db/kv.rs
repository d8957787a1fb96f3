use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::ApiError;

/// Abstraction over a key-value store used for access tokens.
///
/// Only an in-memory map ships today; a shared cache can implement the same
/// trait when the API runs on more than one node.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ApiError>;
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    async fn del(&self, key: &str) -> Result<(), ApiError>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

pub struct MemoryStore {
    data: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, ApiError> {
        self.data
            .lock()
            .map_err(|_| ApiError::internal("Key-value store unavailable"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ApiError> {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: now + Duration::from_secs(ttl_secs),
        };
        let mut data = self.lock()?;
        // Tokens that are never looked up again would otherwise stay forever.
        data.retain(|_, entry| entry.expires_at > now);
        data.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let mut data = self.lock()?;
        match data.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                data.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn del(&self, key: &str) -> Result<(), ApiError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_deletes_values() {
        let kv = MemoryStore::new();
        kv.set_ex("k", "v", 60).await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("v"));
        kv.del("k").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_values_are_gone() {
        let kv = MemoryStore::new();
        kv.set_ex("k", "v", 0).await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn writes_sweep_expired_entries() {
        let kv = MemoryStore::new();
        kv.set_ex("stale", "v", 0).await.unwrap();
        kv.set_ex("fresh", "v", 60).await.unwrap();

        let data = kv.lock().unwrap();
        assert_eq!(data.len(), 1);
        assert!(data.contains_key("fresh"));
    }
}
