//! Response cache: key generation, the backend trait and the in-memory store.
//!
//! # Design
//! Keys are the SHA-256 of a canonical JSON rendering of
//! `(endpoint, sorted params)`, so parameter order never changes the key.
//! Entries expire lazily: an expired entry is removed on the `get` that finds
//! it. Payloads are owned `serde_json::Value`s cloned on the way in and out,
//! so callers never alias cached data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{const_mutex, Mutex};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::params::Params;

/// Compute the cache key for `endpoint` + `params`.
pub fn cache_key(endpoint: &str, params: &Params) -> String {
    let pairs: Vec<(&str, &str)> = params.iter().collect();
    let canonical = Value::from(vec![
        Value::from(endpoint),
        Value::from(
            pairs
                .into_iter()
                .map(|(k, v)| Value::from(vec![Value::from(k), Value::from(v)]))
                .collect::<Vec<_>>(),
        ),
    ]);
    let digest = Sha256::digest(canonical.to_string().as_bytes());
    hex::encode(digest)
}

/// A store for classified response payloads.
///
/// Implementations must be safe to share between threads. Failures are
/// reported as `ScryfallError::Cache`; the dispatcher treats a failed `get`
/// as a miss and ignores a failed `set`.
pub trait CacheBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&self, key: &str, payload: &Value, ttl: Duration) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// Number of live (not yet evicted) entries, if the backend can tell.
    fn len(&self) -> usize {
        0
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    expires_at: Instant,
}

/// Thread-safe in-memory cache guarded by one mutex.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Ok(Some(entry.payload.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, payload: &Value, ttl: Duration) -> Result<()> {
        let entry = CacheEntry {
            payload: payload.clone(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.lock().clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

static SHARED_CACHE: Mutex<Option<Arc<MemoryCache>>> = const_mutex(None);

/// The process-wide cache, created on first use.
pub fn shared_cache() -> Arc<MemoryCache> {
    let mut slot = SHARED_CACHE.lock();
    Arc::clone(slot.get_or_insert_with(|| Arc::new(MemoryCache::new())))
}

/// Drop the process-wide cache; the next `shared_cache()` builds a fresh one.
/// Clients already holding the old instance keep using it.
pub fn reset_shared_cache() {
    *SHARED_CACHE.lock() = None;
}

#[cfg(test)]
mod tests {
    use std::thread;

    use serde_json::json;

    use super::*;

    #[test]
    fn key_is_stable_under_reordering() {
        let a = Params::new().with("q", "bolt").with("order", "name");
        let b = Params::new().with("order", "name").with("q", "bolt");
        assert_eq!(cache_key("/cards/search", &a), cache_key("/cards/search", &b));
    }

    #[test]
    fn key_changes_with_endpoint_or_value() {
        let params = Params::new().with("q", "bolt");
        let base = cache_key("/cards/search", &params);
        assert_ne!(base, cache_key("/cards/named", &params));
        assert_ne!(base, cache_key("/cards/search", &Params::new().with("q", "bolts")));
        assert_ne!(base, cache_key("/cards/search", &Params::new().with("q", "bolt").with("page", 1)));
    }

    #[test]
    fn key_is_hex_sha256() {
        let key = cache_key("sets", &Params::new());
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn empty_value_differs_from_absent() {
        let with_empty = cache_key("cards/search", &Params::new().with("face", ""));
        let without = cache_key("cards/search", &Params::new());
        assert_ne!(with_empty, without);
    }

    #[test]
    fn ttl_expiry_removes_entry() {
        let cache = MemoryCache::new();
        cache.set("k", &json!({"name": "Opt"}), Duration::from_millis(100)).unwrap();
        assert_eq!(cache.len(), 1);

        thread::sleep(Duration::from_millis(50));
        assert_eq!(cache.get("k").unwrap(), Some(json!({"name": "Opt"})));

        thread::sleep(Duration::from_millis(150));
        assert_eq!(cache.get("k").unwrap(), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn returned_payload_is_a_copy() {
        let cache = MemoryCache::new();
        let mut original = json!({"name": "Opt"});
        cache.set("k", &original, Duration::from_secs(60)).unwrap();
        original["name"] = json!("Shock");

        let mut fetched = cache.get("k").unwrap().unwrap();
        assert_eq!(fetched["name"], "Opt");
        fetched["name"] = json!("Counterspell");
        assert_eq!(cache.get("k").unwrap().unwrap()["name"], "Opt");
    }

    #[test]
    fn set_overwrites_and_clear_empties() {
        let cache = MemoryCache::new();
        cache.set("k", &json!(1), Duration::from_secs(60)).unwrap();
        cache.set("k", &json!(2), Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("k").unwrap(), Some(json!(2)));
        cache.set("other", &json!(3), Duration::from_secs(60)).unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_writers_do_not_lose_entries() {
        let cache = Arc::new(MemoryCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for j in 0..25 {
                        cache
                            .set(&format!("{i}-{j}"), &json!(j), Duration::from_secs(60))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 200);
    }

    #[test]
    fn shared_cache_is_a_singleton_until_reset() {
        let a = shared_cache();
        let b = shared_cache();
        assert!(Arc::ptr_eq(&a, &b));
        reset_shared_cache();
        let c = shared_cache();
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
