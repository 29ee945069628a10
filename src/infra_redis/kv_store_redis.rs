use crate::domain_port::{KvStore, KvStoreError};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

pub struct RedisKvStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisKvStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisKvStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    fn unavailable(e: redis::RedisError) -> KvStoreError {
        KvStoreError::Unavailable(e.to_string())
    }
}

#[async_trait::async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .get(self.key(key))
            .await
            .map_err(Self::unavailable)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), KvStoreError> {
        let mut conn = self.conn.clone();
        let key = self.key(key);
        match ttl_secs {
            Some(secs) => {
                let _: () = conn
                    .set_ex(key, value, secs)
                    .await
                    .map_err(Self::unavailable)?;
            }
            None => {
                let _: () = conn.set(key, value).await.map_err(Self::unavailable)?;
            }
        }
        Ok(())
    }

    async fn list_range(
        &self,
        key: &str,
        start: isize,
        end: isize,
    ) -> Result<Vec<String>, KvStoreError> {
        let mut conn = self.conn.clone();
        let entries: Vec<String> = conn
            .lrange(self.key(key), start, end)
            .await
            .map_err(Self::unavailable)?;
        Ok(entries)
    }

    async fn list_push_left(&self, key: &str, value: &str) -> Result<(), KvStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .lpush(self.key(key), value)
            .await
            .map_err(Self::unavailable)?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), KvStoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .expire(self.key(key), ttl_secs as i64)
            .await
            .map_err(Self::unavailable)?;
        Ok(())
    }
}
