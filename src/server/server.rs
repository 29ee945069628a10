use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::KvStore;
use crate::infra_memory::MemoryKvStore;
use crate::infra_redis::RedisKvStore;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;

/// All dependencies are injected here explicitly; nothing reaches for an
/// ambient registry.
pub struct Server {
    pub login_service: Arc<dyn LoginService>,
    pub session_service: Arc<dyn SessionService>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn KvStore> = match settings.store.backend.as_str() {
            "memory" => Arc::new(MemoryKvStore::new()),
            "redis" => {
                let client = redis::Client::open(settings.store.redis_dsn.as_str())?;
                let manager = client.get_connection_manager().await?;
                Arc::new(RedisKvStore::new(manager, settings.store.prefix.clone()))
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let token_ttl = Duration::from_secs(settings.session.token_ttl_secs);
        let ledger_retention = Duration::from_secs(settings.session.ledger_retention_secs);
        if ledger_retention < token_ttl {
            return Err(anyhow::anyhow!(
                "ledger retention ({}s) is shorter than the token ttl ({}s); a revoked token would outlive its ledger entry",
                ledger_retention.as_secs(),
                token_ttl.as_secs()
            ));
        }

        let signing_key = std::env::var("JWT_SIGNING_KEY")
            .unwrap_or_else(|_| "my-dev-secret-key".to_string())
            .into_bytes();
        let codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            token_ttl,
            signing_key,
        }));
        let ledger = InvalidationLedger::new(store, ledger_retention);
        let session_service: Arc<dyn SessionService> =
            Arc::new(RealSessionService::new(codec, ledger));

        let login_service: Arc<dyn LoginService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeLoginService::new()),
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        info!("server started");

        Ok(Self {
            login_service,
            session_service,
        })
    }
}
