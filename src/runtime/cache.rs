use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Key holding the comma separated segment types/aliases to hide.
pub const TOGGLE_CACHE: &str = "toggles";

/// String key-value store for one prompt invocation, with optional expiry.
#[derive(Clone, Default)]
pub struct SessionCache {
    data: Arc<DashMap<String, CacheEntry>>,
}

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let expired = {
            let entry = self.data.get(key)?;
            match entry.expires_at {
                Some(expires_at) if Instant::now() > expires_at => true,
                _ => return Some(entry.value.clone()),
            }
        };
        if expired {
            self.data.remove(key);
        }
        None
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                expires_at: None,
            },
        );
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.data.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
    }

    pub fn delete(&self, key: &str) -> Option<String> {
        self.data.remove(key).map(|(_, entry)| entry.value)
    }

    /// Read a comma separated value as a list, skipping empty items.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn clear_expired(&self) {
        let now = Instant::now();
        self.data
            .retain(|_, entry| entry.expires_at.map_or(true, |expires_at| now <= expires_at));
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
