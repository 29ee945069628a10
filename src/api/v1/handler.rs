use super::error::*;
use crate::application_port::{LoginInput, LoginService, SessionService};
use crate::domain_model::UserId;
use serde::Serialize;
use std::sync::Arc;
use warp::{self, http, reject};

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Authenticate the user and issue a fresh token, returned via the
/// `Authorization` response header.
pub async fn login(
    body: LoginInput,
    login_service: Arc<dyn LoginService>,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let profile = login_service
        .validate(body)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let token = session_service
        .issue(&profile.id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let json = warp::reply::json(&DataResponse { data: profile });
    Ok(warp::reply::with_header(
        json,
        http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    ))
}

/// Logout by invalidating the presented token.
pub async fn logout(
    token: String,
    session_service: Arc<dyn SessionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let claims = session_service
        .verify(&token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    session_service
        .invalidate(&claims.subject, &token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&MessageResponse {
        message: "Logout successfully performed.".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: UserId,
}

pub async fn me(user_id: UserId) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&DataResponse {
        data: MeResponse { id: user_id },
    }))
}
