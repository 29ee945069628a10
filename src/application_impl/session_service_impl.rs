use crate::application_impl::InvalidationLedger;
use crate::application_port::{SessionError, SessionService, TokenCodec};
use crate::domain_model::{BearerToken, Claims, UserId};
use std::sync::Arc;

/// The session manager: composes the token codec and the invalidation
/// ledger. Verification and revocation stay separate concerns; `verify`
/// never consults the ledger.
pub struct RealSessionService {
    codec: Arc<dyn TokenCodec>,
    ledger: InvalidationLedger,
}

impl RealSessionService {
    pub fn new(codec: Arc<dyn TokenCodec>, ledger: InvalidationLedger) -> Self {
        Self { codec, ledger }
    }
}

#[async_trait::async_trait]
impl SessionService for RealSessionService {
    async fn issue(&self, user: &UserId) -> Result<BearerToken, SessionError> {
        let (token, _) = self.codec.issue(user, None).await?;
        Ok(token)
    }

    async fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        self.codec.verify(token).await
    }

    async fn is_invalidated(&self, user: &UserId, token: &str) -> Result<bool, SessionError> {
        let claims = self.codec.peek(token).await?;
        self.ledger.is_invalidated(user, &claims.token_id).await
    }

    async fn invalidate(&self, user: &UserId, token: &str) -> Result<bool, SessionError> {
        // The caller is trusted to have verified the token already; only the
        // token id is needed here.
        let claims = self.codec.peek(token).await?;
        if self.ledger.is_invalidated(user, &claims.token_id).await? {
            return Ok(true);
        }
        self.ledger.record_invalidation(user, &claims.token_id).await?;
        Ok(true)
    }
}
