//! In-process TTL cache for JSON payloads
//!
//! Keys are plain strings; groups of keys share a prefix (`menu:`) so a
//! write can invalidate the whole group with [`Cache::delete_prefix`].

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Prefix shared by all menu cache keys
pub const MENU_PREFIX: &str = "menu:";
/// Complete menu tree
pub const MENU_COMPLETE_KEY: &str = "menu:complete";

/// Per-category menu key
pub fn menu_category_key(category_id: i64) -> String {
    format!("{MENU_PREFIX}category:{category_id}")
}

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct Cache {
    entries: Arc<DashMap<String, Entry>>,
    menu_generation: Arc<AtomicU64>,
    ttl: Duration,
}

impl Cache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            menu_generation: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    /// Fetch and deserialize a live entry
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        let value = {
            let entry = self.entries.get(key)?;
            if entry.expires_at <= now {
                None
            } else {
                Some(entry.value.clone())
            }
        };
        match value {
            Some(v) => match serde_json::from_value(v) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!(key, error = %e, "Dropping undecodable cache entry");
                    self.entries.remove(key);
                    None
                }
            },
            None => {
                self.entries.remove_if(key, |_, e| e.expires_at <= now);
                None
            }
        }
    }

    /// Store with the default TTL
    pub fn set<T: Serialize>(&self, key: impl Into<String>, value: &T) {
        self.set_with_ttl(key, value, self.ttl);
    }

    pub fn set_with_ttl<T: Serialize>(&self, key: impl Into<String>, value: &T, ttl: Duration) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key,
                    Entry {
                        value,
                        expires_at: Instant::now() + ttl,
                    },
                );
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "Failed to serialize cache entry"),
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every key starting with `prefix`; returns the number removed
    pub fn delete_prefix(&self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(prefix));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(prefix, removed, "Cache entries invalidated");
        }
        removed
    }

    /// Drop the whole menu group after a catalog write
    pub fn invalidate_menu(&self) {
        self.menu_generation.fetch_add(1, Ordering::SeqCst);
        self.delete_prefix(MENU_PREFIX);
    }

    /// Bumped by every [`Cache::invalidate_menu`]; read it before loading a menu
    pub fn menu_generation(&self) -> u64 {
        self.menu_generation.load(Ordering::SeqCst)
    }

    /// Store a menu entry built while `generation` was current.
    ///
    /// If the menu was invalidated in the meantime the entry is dropped again
    /// and `false` is returned.
    pub fn set_menu<T: Serialize>(&self, key: impl Into<String>, value: &T, generation: u64) -> bool {
        let key = key.into();
        if self.menu_generation() != generation {
            return false;
        }
        self.set(key.clone(), value);
        if self.menu_generation() != generation {
            self.entries.remove(&key);
            return false;
        }
        true
    }

    /// Remove expired entries
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, e| e.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("menu:complete", &vec![1, 2, 3]);
        let got: Option<Vec<i32>> = cache.get("menu:complete");
        assert_eq!(got, Some(vec![1, 2, 3]));
        let missing: Option<Vec<i32>> = cache.get("menu:other");
        assert!(missing.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire() {
        let cache = Cache::new(Duration::from_secs(5));
        cache.set("k", &"v");
        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(cache.get::<String>("k").as_deref(), Some("v"));
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get::<String>("k").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = Cache::new(Duration::from_secs(10));
        cache.set_with_ttl("short", &1, Duration::from_secs(1));
        cache.set("long", &2);
        tokio::time::advance(Duration::from_secs(2)).await;
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<i32>("long"), Some(2));
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set(MENU_COMPLETE_KEY, &1);
        cache.set(menu_category_key(4), &2);
        cache.set("content:hero", &3);

        cache.invalidate_menu();
        assert!(cache.get::<i32>(MENU_COMPLETE_KEY).is_none());
        assert!(cache.get::<i32>(&menu_category_key(4)).is_none());
        assert_eq!(cache.get::<i32>("content:hero"), Some(3));
        assert!(cache.delete("content:hero"));
        assert!(!cache.delete("content:hero"));
    }

    #[tokio::test]
    async fn test_stale_menu_is_not_stored_after_invalidation() {
        let cache = Cache::new(Duration::from_secs(60));
        let generation = cache.menu_generation();

        // A write lands while the menu is being loaded
        cache.invalidate_menu();
        assert!(!cache.set_menu(MENU_COMPLETE_KEY, &"stale", generation));
        assert!(cache.get::<String>(MENU_COMPLETE_KEY).is_none());

        let generation = cache.menu_generation();
        assert!(cache.set_menu(MENU_COMPLETE_KEY, &"fresh", generation));
        assert_eq!(cache.get::<String>(MENU_COMPLETE_KEY).as_deref(), Some("fresh"));
    }
}
