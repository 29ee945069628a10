use crate::application_port::{LoginError, SessionError};
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

/// Error shape surfaced to HTTP callers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "hasError")]
    pub has_error: u8,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            has_error: 1,
            message: message.into(),
        }
    }
}

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(code) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ErrorBody::new(code.to_string()));
        Ok(warp::reply::with_status(json, code.status()))
    } else {
        warn!("unhandled rejection: {:?}", err);
        let json = warp::reply::json(&ErrorBody::new("Internal error."));
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[derive(Debug, Clone, Error)]
pub enum ApiErrorCode {
    #[error("User is not authenticated.")]
    NotAuthenticated,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Token expired.")]
    ExpiredToken,
    #[error("Wrong credentials.")]
    WrongCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("Internal error.")]
    InternalError,
}

impl ApiErrorCode {
    fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiErrorCode::InvalidToken
            | ApiErrorCode::ExpiredToken
            | ApiErrorCode::WrongCredentials => StatusCode::FORBIDDEN,
            ApiErrorCode::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<SessionError> for ApiErrorCode {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::NotAuthenticated => ApiErrorCode::NotAuthenticated,
            SessionError::MalformedToken => ApiErrorCode::InvalidToken,
            SessionError::ExpiredToken { expired_at } => {
                warn!(%expired_at, "rejected expired token");
                ApiErrorCode::ExpiredToken
            }
            SessionError::LedgerUnavailable(e) => ApiErrorCode::internal(e),
            SessionError::Internal(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<LoginError> for ApiErrorCode {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => ApiErrorCode::WrongCredentials,
            LoginError::Validation(message) => ApiErrorCode::Validation(message),
            LoginError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}
