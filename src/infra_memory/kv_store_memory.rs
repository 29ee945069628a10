use crate::domain_port::{KvStore, KvStoreError};
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process store backend. Expiry is checked lazily on access, which is
/// enough for a single-process backend.
pub struct MemoryKvStore {
    entries: DashMap<String, Entry>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        MemoryKvStore {
            entries: DashMap::new(),
        }
    }

    /// Drop the entry if its expiry has passed.
    fn purge_expired(&self, key: &str, now: Instant) {
        let gone = self
            .entries
            .get(key)
            .map(|entry| entry.expired(now))
            .unwrap_or(false);
        if gone {
            self.entries.remove(key);
        }
    }

    fn slice(items: &[String], start: isize, end: isize) -> Vec<String> {
        let len = items.len() as isize;
        let normalize = |i: isize| if i < 0 { (len + i).max(0) } else { i.min(len) };
        let start = normalize(start);
        // An inclusive end, as in LRANGE.
        let end = if end < 0 { len + end } else { end.min(len - 1) };
        if len == 0 || start > end || end < 0 {
            return Vec::new();
        }
        items[start as usize..=end as usize].to_vec()
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        self.purge_expired(key, Instant::now());
        match self.entries.get(key).map(|entry| entry.value.clone()) {
            Some(Value::Str(value)) => Ok(Some(value)),
            Some(Value::List(_)) => Err(KvStoreError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), KvStoreError> {
        let expires_at = ttl_secs.map(|secs| Instant::now() + Duration::from_secs(secs));
        self.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at,
            },
        );
        Ok(())
    }

    async fn list_range(
        &self,
        key: &str,
        start: isize,
        end: isize,
    ) -> Result<Vec<String>, KvStoreError> {
        self.purge_expired(key, Instant::now());
        match self.entries.get(key).map(|entry| entry.value.clone()) {
            Some(Value::List(items)) => Ok(Self::slice(&items, start, end)),
            Some(Value::Str(_)) => Err(KvStoreError::WrongType(key.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn list_push_left(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        self.purge_expired(key, Instant::now());
        let mut entry = self.entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::List(Vec::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::List(items) => {
                items.insert(0, value.to_string());
                Ok(())
            }
            Value::Str(_) => Err(KvStoreError::WrongType(key.to_string())),
        }
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), KvStoreError> {
        let now = Instant::now();
        self.purge_expired(key, now);
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.expires_at = Some(now + Duration::from_secs(ttl_secs));
        }
        Ok(())
    }
}
