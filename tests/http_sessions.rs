use jobgate::api;
use jobgate::application_impl::{
    FakeLoginService, InvalidationLedger, JwtConfig, JwtHs256Codec, RealSessionService,
};
use jobgate::application_port::{LoginService, SessionService, TokenCodec};
use jobgate::domain_port::{KvStore, KvStoreError};
use jobgate::infra_memory::MemoryKvStore;
use jobgate::server::Server;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use warp::{Filter, Reply};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;

fn make_server(store: Arc<dyn KvStore>) -> Arc<Server> {
    let codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
        token_ttl: Duration::from_secs(4 * 60 * 60),
        signing_key: b"integration-test-key".to_vec(),
    }));
    let ledger = InvalidationLedger::new(store, Duration::from_secs(24 * 60 * 60));
    let session_service: Arc<dyn SessionService> =
        Arc::new(RealSessionService::new(codec, ledger));
    let login_service: Arc<dyn LoginService> = Arc::new(FakeLoginService::new());
    Arc::new(Server {
        login_service,
        session_service,
    })
}

fn api_filter(server: Arc<Server>) -> BoxedFilter<(warp::reply::Response,)> {
    warp::path("api")
        .and(warp::path("v1"))
        .and(api::v1::routes(server))
        .recover(api::v1::recover_error)
        .map(Reply::into_response)
        .boxed()
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body is JSON")
}

async fn login(filter: &BoxedFilter<(warp::reply::Response,)>) -> String {
    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .json(&json!({ "email": "ada@example.com", "password": "correct-horse" }))
        .reply(filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let header = resp
        .headers()
        .get("authorization")
        .expect("Authorization response header")
        .to_str()
        .unwrap();
    header
        .strip_prefix("Bearer ")
        .expect("Bearer scheme")
        .to_string()
}

#[tokio::test]
async fn login_issues_a_bearer_token_and_returns_the_user() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .json(&json!({ "email": "ada@example.com", "password": "correct-horse" }))
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let header = resp.headers().get("authorization").unwrap().to_str().unwrap();
    assert!(header.starts_with("Bearer "));

    let body = body_json(resp.body());
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["username"], "adalovelace");
}

#[tokio::test]
async fn login_with_wrong_password_is_forbidden() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .json(&json!({ "email": "ada@example.com", "password": "nope" }))
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(resp.body()),
        json!({ "hasError": 1, "message": "Wrong credentials." })
    );
}

#[tokio::test]
async fn login_with_missing_fields_lists_every_message() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));

    let resp = warp::test::request()
        .method("POST")
        .path("/api/v1/sessions")
        .json(&json!({}))
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(resp.body()),
        json!({
            "hasError": 1,
            "message": "The Email is missing. The Password is missing."
        })
    );
}

#[tokio::test]
async fn protected_route_requires_authentication() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp.body()),
        json!({ "hasError": 1, "message": "User is not authenticated." })
    );
}

#[tokio::test]
async fn garbled_scheme_is_not_authenticated() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .header("authorization", "Token abc")
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_the_protected_route() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));
    let token = login(&filter).await;

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert!(body["data"]["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn tampered_token_is_forbidden() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));
    let token = login(&filter).await;

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let mut sig = parts[2].clone();
    let first = sig.remove(0);
    parts[2] = format!("{}{}", if first == 'A' { 'B' } else { 'A' }, sig);
    let tampered = parts.join(".");

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .header("authorization", format!("Bearer {}", tampered))
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(resp.body()),
        json!({ "hasError": 1, "message": "Invalid token." })
    );
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));
    let token = login(&filter).await;

    let resp = warp::test::request()
        .method("DELETE")
        .path("/api/v1/sessions")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp.body()),
        json!({ "message": "Logout successfully performed." })
    );

    // The logged-out token is rejected on the next authenticated request.
    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_twice_still_succeeds() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));
    let token = login(&filter).await;

    for _ in 0..2 {
        let resp = warp::test::request()
            .method("DELETE")
            .path("/api/v1/sessions")
            .header("authorization", format!("Bearer {}", token))
            .reply(&filter)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp.body()),
            json!({ "message": "Logout successfully performed." })
        );
    }
}

#[tokio::test]
async fn other_tokens_survive_a_logout() {
    let filter = api_filter(make_server(Arc::new(MemoryKvStore::new())));
    let first = login(&filter).await;
    let second = login(&filter).await;

    let resp = warp::test::request()
        .method("DELETE")
        .path("/api/v1/sessions")
        .header("authorization", format!("Bearer {}", first))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/me")
        .header("authorization", format!("Bearer {}", second))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Delegates everything to a live in-memory store except the denylist
/// append, which always fails.
struct PushFailingStore {
    inner: MemoryKvStore,
}

#[async_trait::async_trait]
impl KvStore for PushFailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvStoreError> {
        self.inner.get(key).await
    }
    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), KvStoreError> {
        self.inner.set(key, value, ttl_secs).await
    }
    async fn list_range(
        &self,
        key: &str,
        start: isize,
        end: isize,
    ) -> Result<Vec<String>, KvStoreError> {
        self.inner.list_range(key, start, end).await
    }
    async fn list_push_left(&self, _key: &str, _value: &str) -> Result<(), KvStoreError> {
        Err(KvStoreError::Unavailable("connection reset".to_string()))
    }
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), KvStoreError> {
        self.inner.expire(key, ttl_secs).await
    }
}

#[tokio::test]
async fn ledger_outage_during_logout_leaves_no_partial_write() {
    let server = make_server(Arc::new(PushFailingStore {
        inner: MemoryKvStore::new(),
    }));
    let filter = api_filter(server.clone());
    let token = login(&filter).await;

    let resp = warp::test::request()
        .method("DELETE")
        .path("/api/v1/sessions")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp.body()),
        json!({ "hasError": 1, "message": "Internal error." })
    );

    // Nothing was recorded by the failed attempt.
    let claims = server.session_service.verify(&token).await.unwrap();
    let invalidated = server
        .session_service
        .is_invalidated(&claims.subject, &token)
        .await
        .unwrap();
    assert!(!invalidated);
}
