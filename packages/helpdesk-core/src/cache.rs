//! Read-through result cache.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Key/value cache for serialized operation results.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn clear(&self);
}

/// In-memory cache whose entries expire a fixed time after being stored.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, Value)>>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for TtlCache {
    fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().ok()?;
        let (stored_at, value) = entries.get(key)?;
        if stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(value.clone())
    }

    fn set(&self, key: &str, value: Value) {
        if let Ok(mut entries) = self.entries.write() {
            let ttl = self.ttl;
            entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
            entries.insert(key.to_string(), (Instant::now(), value));
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
