#[derive(Debug, thiserror::Error)]
pub enum KvStoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("wrong value type for key {0}")]
    WrongType(String),
}

/// Consumed key-value store interface. Implementations hold the
/// deployment-specific key prefix; callers pass logical keys only and never
/// assume a particular backend.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError>;
    /// Save a value, with an optional expiry in seconds.
    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), KvStoreError>;
    /// Return the list elements between `start` and `end` inclusive.
    /// Negative indices count from the tail, `-1` being the last element.
    async fn list_range(
        &self,
        key: &str,
        start: isize,
        end: isize,
    ) -> Result<Vec<String>, KvStoreError>;
    /// Left-insert a value on the list at `key`, creating it if absent.
    async fn list_push_left(&self, key: &str, value: &str) -> Result<(), KvStoreError>;
    /// (Re)set the expiry of an existing key. A missing key is not an error.
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), KvStoreError>;
}
