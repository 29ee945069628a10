use super::error::*;
use super::handler;
use crate::application_port::SessionService;
use crate::domain_model::UserId;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let login = warp::post()
        .and(warp::path("sessions"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.login_service.clone()))
        .and(with(server.session_service.clone()))
        .and_then(handler::login);

    let logout = warp::delete()
        .and(warp::path("sessions"))
        .and(warp::path::end())
        .and(bearer_token())
        .and(with(server.session_service.clone()))
        .and_then(handler::logout);

    let me = warp::get()
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(with_authentication(server.session_service.clone()))
        .and_then(handler::me);

    login.or(logout).or(me)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Extract the bearer token. A missing header or a garbled scheme rejects as
/// not authenticated.
fn bearer_token() -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>(http::header::AUTHORIZATION.as_ref()).and_then(
        |header: Option<String>| async move {
            let token = header
                .as_deref()
                .and_then(|h| h.strip_prefix("Bearer "))
                .filter(|t| !t.is_empty());
            match token {
                Some(token) => Ok(token.to_string()),
                None => Err(reject::custom(ApiErrorCode::NotAuthenticated)),
            }
        },
    )
}

/// Verify the token and resolve the subject. Revocation is honored on every
/// authenticated request: a logged-out token is rejected immediately rather
/// than riding out its remaining lifetime.
fn with_authentication(
    session_service: Arc<dyn SessionService>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    bearer_token().and_then(move |token: String| {
        let session_service = session_service.clone();
        async move {
            let claims = session_service
                .verify(&token)
                .await
                .map_err(ApiErrorCode::from)
                .map_err(reject::custom)?;

            let revoked = session_service
                .is_invalidated(&claims.subject, &token)
                .await
                .map_err(ApiErrorCode::from)
                .map_err(reject::custom)?;
            if revoked {
                return Err(reject::custom(ApiErrorCode::InvalidToken));
            }

            Ok::<UserId, warp::Rejection>(claims.subject)
        }
    })
}
