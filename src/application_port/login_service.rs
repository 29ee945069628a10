use crate::domain_model::UserProfile;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("wrong credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// External login-validation collaborator. Resolves credentials to the user
/// record they belong to; user persistence and password hashing live behind
/// this port.
#[async_trait::async_trait]
pub trait LoginService: Send + Sync {
    async fn validate(&self, input: LoginInput) -> Result<UserProfile, LoginError>;
}
