use crate::application_port::{SessionError, TokenCodec};
use crate::domain_model::{BearerToken, Claims, TokenId, UserId};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Default token lifetime when the caller does not pass one.
    pub token_ttl: Duration,
    pub signing_key: Vec<u8>,
}

/// Wire representation of the claims.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    jti: String,
    iat: i64,
    exp: i64,
}

pub struct JwtHs256Codec {
    cfg: JwtConfig,
}

impl JwtHs256Codec {
    pub fn new(cfg: JwtConfig) -> Self {
        JwtHs256Codec { cfg }
    }

    fn to_claims(raw: JwtClaims) -> Result<Claims, SessionError> {
        let token_id = raw
            .jti
            .parse::<TokenId>()
            .map_err(|_| SessionError::MalformedToken)?;
        let issued_at =
            DateTime::from_timestamp(raw.iat, 0).ok_or(SessionError::MalformedToken)?;
        let expires_at =
            DateTime::from_timestamp(raw.exp, 0).ok_or(SessionError::MalformedToken)?;
        Ok(Claims {
            subject: UserId(raw.sub),
            token_id,
            issued_at,
            expires_at,
        })
    }

    /// Decode without signature or expiry validation. Used to surface the
    /// original expiry of an expired token and by `peek`.
    fn decode_unchecked(&self, token: &str) -> Result<Claims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(&self.cfg.signing_key),
            &validation,
        )
        .map_err(|_| SessionError::MalformedToken)?;
        Self::to_claims(data.claims)
    }
}

#[async_trait::async_trait]
impl TokenCodec for JwtHs256Codec {
    async fn issue(
        &self,
        user: &UserId,
        ttl: Option<Duration>,
    ) -> Result<(BearerToken, Claims), SessionError> {
        let ttl = ttl.unwrap_or(self.cfg.token_ttl);
        let issued_at = Utc::now();
        let expires_at = issued_at + ttl;
        let token_id = TokenId::generate();

        let raw = JwtClaims {
            sub: user.to_string(),
            jti: token_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &raw,
            &EncodingKey::from_secret(&self.cfg.signing_key),
        )
        .map_err(|e| SessionError::Internal(e.to_string()))?;

        let claims = Claims {
            subject: user.clone(),
            token_id,
            issued_at,
            expires_at,
        };
        Ok((BearerToken(token), claims))
    }

    async fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against wall-clock time with zero leeway.
        validation.leeway = 0;
        let result = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(&self.cfg.signing_key),
            &validation,
        );
        match result {
            Ok(data) => Self::to_claims(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => {
                    let claims = self.decode_unchecked(token)?;
                    Err(SessionError::ExpiredToken {
                        expired_at: claims.expires_at,
                    })
                }
                _ => Err(SessionError::MalformedToken),
            },
        }
    }

    async fn peek(&self, token: &str) -> Result<Claims, SessionError> {
        self.decode_unchecked(token)
    }
}
