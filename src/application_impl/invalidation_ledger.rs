use crate::application_port::SessionError;
use crate::domain_model::{TokenId, UserId};
use crate::domain_port::{KvStore, KvStoreError};
use std::sync::Arc;
use std::time::Duration;

/// Per-user denylist of invalidated token ids, kept in the key-value store
/// under `invalid-tokens-<user>` with a bounded retention window.
///
/// Invariant: `retention` must be at least the maximum token lifetime, so a
/// revoked token can never outlive its own ledger entry. `Server::try_new`
/// enforces this at construction.
pub struct InvalidationLedger {
    store: Arc<dyn KvStore>,
    retention: Duration,
}

impl InvalidationLedger {
    pub fn new(store: Arc<dyn KvStore>, retention: Duration) -> Self {
        InvalidationLedger { store, retention }
    }

    fn user_key(user: &UserId) -> String {
        format!("invalid-tokens-{}", user)
    }

    fn unavailable(e: KvStoreError) -> SessionError {
        SessionError::LedgerUnavailable(e.to_string())
    }

    /// Append `token_id` to the user's denylist and refresh the list expiry.
    /// Safe to call twice for the same pair; membership is the only query, so
    /// duplicate entries are harmless.
    pub async fn record_invalidation(
        &self,
        user: &UserId,
        token_id: &TokenId,
    ) -> Result<(), SessionError> {
        let key = Self::user_key(user);
        self.store
            .list_push_left(&key, &token_id.to_string())
            .await
            .map_err(Self::unavailable)?;
        self.store
            .expire(&key, self.retention.as_secs())
            .await
            .map_err(Self::unavailable)?;
        Ok(())
    }

    /// Whether `token_id` appears in the user's denylist. A missing list
    /// means nothing was ever invalidated for the user.
    pub async fn is_invalidated(
        &self,
        user: &UserId,
        token_id: &TokenId,
    ) -> Result<bool, SessionError> {
        let entries = self
            .store
            .list_range(&Self::user_key(user), 0, -1)
            .await
            .map_err(Self::unavailable)?;
        let needle = token_id.to_string();
        Ok(entries.iter().any(|entry| *entry == needle))
    }
}
