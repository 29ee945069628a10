use crate::domain_model::{BearerToken, Claims, UserId};
use chrono::{DateTime, Utc};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("user is not authenticated")]
    NotAuthenticated,
    #[error("malformed token")]
    MalformedToken,
    #[error("token expired at {expired_at}")]
    ExpiredToken { expired_at: DateTime<Utc> },
    #[error("invalidation ledger unavailable: {0}")]
    LedgerUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[async_trait::async_trait]
pub trait TokenCodec: Send + Sync {
    /// Issue a signed token for `user` with a freshly generated token id.
    /// `ttl` falls back to the codec default when absent.
    async fn issue(
        &self,
        user: &UserId,
        ttl: Option<Duration>,
    ) -> Result<(BearerToken, Claims), SessionError>;
    /// Parse and check structure, signature and expiry against wall-clock
    /// time. Never consults the invalidation ledger.
    async fn verify(&self, token: &str) -> Result<Claims, SessionError>;
    /// Decode claims without signature or expiry validation, for callers
    /// that already hold a verified token.
    async fn peek(&self, token: &str) -> Result<Claims, SessionError>;
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    async fn issue(&self, user: &UserId) -> Result<BearerToken, SessionError>;
    async fn verify(&self, token: &str) -> Result<Claims, SessionError>;
    /// Whether the token has been invalidated. Verification is a separate
    /// concern: callers that must honor revocation check this explicitly
    /// after a successful `verify`.
    async fn is_invalidated(&self, user: &UserId, token: &str) -> Result<bool, SessionError>;
    /// Record the token as invalidated. Idempotent: invalidating an already
    /// invalidated token still returns `true`.
    async fn invalidate(&self, user: &UserId, token: &str) -> Result<bool, SessionError>;
}
