//! Refresh-and-retry behaviour of the API client against a mock server
//!
//! Every scenario uses the real refresh endpoint client, so the refresh call
//! travels over HTTP like the requests it unblocks.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::{json, Value};
use smartpantry_common::auth::{
    MemoryTokenStorage, SessionError, SessionManager, TokenPair, TokenStorage,
};
use smartpantry_common::testing::jwt_valid_for;
use smartpantry_domain::constants::{
    ACCESS_TOKEN_KEY, INVENTORY_ITEMS_PATH, JWT_CREATE_PATH, JWT_REFRESH_PATH,
};
use smartpantry_domain::{ApiConfig, Config, SessionConfig};
use smartpantry_infra::{
    ApiClient, ApiClientConfig, ApiError, AppContext, HttpClient, HttpTokenRefresher,
};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestSession = SessionManager<HttpTokenRefresher, MemoryTokenStorage>;

const REFRESH_TOKEN: &str = "refresh-token-1";

fn fresh_jwt() -> String {
    jwt_valid_for(Duration::from_secs(600))
}

async fn signed_in_session(refresh_base: &str, access: &str) -> Arc<TestSession> {
    let refresher = HttpTokenRefresher::new(refresh_base, HttpClient::new().unwrap());
    let session = Arc::new(SessionManager::new(
        Arc::new(refresher),
        Arc::new(MemoryTokenStorage::new()),
    ));
    session.start_session(TokenPair::new(access, REFRESH_TOKEN)).await.unwrap();
    session
}

fn client_for(server: &MockServer, session: &Arc<TestSession>) -> ApiClient {
    let config = ApiClientConfig { base_url: server.uri(), ..Default::default() };
    ApiClient::new(config, Arc::clone(session) as Arc<dyn smartpantry_infra::SessionProvider>).unwrap()
}

/// Items answer 200 only to `Bearer {accepted}`, 401 to anything else.
async fn mount_items_accepting(server: &MockServer, accepted: &str) {
    Mock::given(method("GET"))
        .and(path(INVENTORY_ITEMS_PATH))
        .and(header("Authorization", format!("Bearer {accepted}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(INVENTORY_ITEMS_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Given token not valid for any token type"})),
        )
        .mount(server)
        .await;
}

/// Listener that accepts connections but never answers.
async fn silent_listener() -> (tokio::net::TcpListener, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}

#[tokio::test]
async fn concurrent_rejections_share_one_refresh() {
    let server = MockServer::start().await;
    let stale = fresh_jwt();
    let renewed = fresh_jwt();

    mount_items_accepting(&server, &renewed).await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .and(body_json(json!({"refresh": REFRESH_TOKEN})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": renewed}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server.uri(), &stale).await;
    let client = client_for(&server, &session);

    let (a, b) = tokio::join!(
        client.get::<Value>(INVENTORY_ITEMS_PATH),
        client.get::<Value>(INVENTORY_ITEMS_PATH),
    );
    assert_eq!(a.unwrap(), json!([]));
    assert_eq!(b.unwrap(), json!([]));

    assert_eq!(session.access_token().as_deref(), Some(renewed.as_str()));
    assert_eq!(session.refresh_token().as_deref(), Some(REFRESH_TOKEN));
    assert!(!session.is_refreshing());
}

#[tokio::test]
async fn ten_concurrent_rejections_share_one_refresh() {
    let server = MockServer::start().await;
    let stale = fresh_jwt();
    let renewed = fresh_jwt();

    mount_items_accepting(&server, &renewed).await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": renewed}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server.uri(), &stale).await;
    let client = client_for(&server, &session);

    let results = join_all((0..10).map(|_| client.get::<Value>(INVENTORY_ITEMS_PATH))).await;
    assert!(results.iter().all(Result::is_ok), "every request succeeds after one refresh");
}

#[tokio::test]
async fn refresh_transport_failure_rejects_all_and_signs_out() {
    let server = MockServer::start().await;
    let stale = fresh_jwt();
    mount_items_accepting(&server, "never-issued").await;

    // The refresh hangs until its timeout, so both rejections queue on it
    let (_listener, silent_url) = silent_listener().await;
    let refresh_http =
        HttpClient::builder().timeout(Duration::from_millis(300)).build().unwrap();
    let refresher = HttpTokenRefresher::new(&silent_url, refresh_http);
    let session: Arc<TestSession> = Arc::new(SessionManager::new(
        Arc::new(refresher),
        Arc::new(MemoryTokenStorage::new()),
    ));
    session.start_session(TokenPair::new(stale.as_str(), REFRESH_TOKEN)).await.unwrap();
    let client = client_for(&server, &session);

    let (a, b) = tokio::join!(
        client.get::<Value>(INVENTORY_ITEMS_PATH),
        client.get::<Value>(INVENTORY_ITEMS_PATH),
    );
    for result in [a, b] {
        let err = result.unwrap_err();
        assert!(
            matches!(err, ApiError::Session(SessionError::RefreshTransport(_))),
            "unexpected error: {err:?}"
        );
        assert!(err.requires_login());
    }

    assert!(session.current_tokens().is_empty());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn rejected_refresh_token_signs_out() {
    let server = MockServer::start().await;
    mount_items_accepting(&server, "never-issued").await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Token is blacklisted", "code": "token_not_valid"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server.uri(), &fresh_jwt()).await;
    let client = client_for(&server, &session);

    let err = client.get::<Value>(INVENTORY_ITEMS_PATH).await.unwrap_err();
    match err {
        ApiError::Session(SessionError::RefreshRejected { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Token is blacklisted");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn retried_request_is_not_refreshed_twice() {
    let server = MockServer::start().await;
    let renewed = fresh_jwt();

    // The server keeps rejecting even the renewed token
    mount_items_accepting(&server, "never-issued").await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": renewed})))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server.uri(), &fresh_jwt()).await;
    let client = client_for(&server, &session);

    let err = client.get::<Value>(INVENTORY_ITEMS_PATH).await.unwrap_err();
    assert!(matches!(err, ApiError::Auth { status: 401, .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn missing_refresh_token_skips_refresh_and_signs_out() {
    let server = MockServer::start().await;
    mount_items_accepting(&server, "never-issued").await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStorage::new());
    storage.set_item(ACCESS_TOKEN_KEY, &fresh_jwt()).await.unwrap();
    let refresher = HttpTokenRefresher::new(&server.uri(), HttpClient::new().unwrap());
    let session = Arc::new(SessionManager::new(Arc::new(refresher), storage));
    assert!(session.initialize().await.unwrap());

    let client = client_for(&server, &session);
    let err = client.get::<Value>(INVENTORY_ITEMS_PATH).await.unwrap_err();

    assert!(matches!(err, ApiError::Auth { status: 401, .. }), "unexpected error: {err:?}");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn forbidden_does_not_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INVENTORY_ITEMS_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"detail": "You do not have permission to perform this action."})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let session = signed_in_session(&server.uri(), &fresh_jwt()).await;
    let client = client_for(&server, &session);

    let err = client.get::<Value>(INVENTORY_ITEMS_PATH).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(session.is_authenticated(), "a 403 leaves the session alone");
}

#[tokio::test]
async fn login_then_refresh_persists_to_session_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let first = fresh_jwt();
    let renewed = fresh_jwt();

    Mock::given(method("POST"))
        .and(path(JWT_CREATE_PATH))
        .and(body_json(json!({"username": "alice", "password": "s3cret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": first, "refresh": REFRESH_TOKEN})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_items_accepting(&server, &renewed).await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": renewed})))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        api: ApiConfig { base_url: server.uri(), ..ApiConfig::default() },
        session: SessionConfig { storage_path: dir.path().join("session.json") },
    };

    let ctx = AppContext::from_config(config.clone()).await.unwrap();
    ctx.auth.login("alice", "s3cret").await.unwrap();
    assert!(ctx.auth.is_authenticated());

    let items: Value = ctx.client.get(INVENTORY_ITEMS_PATH).await.unwrap();
    assert_eq!(items, json!([]));

    // A second process picks up the renewed token from disk
    let restored = AppContext::from_config(config).await.unwrap();
    assert_eq!(restored.session.access_token().as_deref(), Some(renewed.as_str()));
    assert_eq!(restored.session.refresh_token().as_deref(), Some(REFRESH_TOKEN));

    restored.auth.logout().await;
    assert!(!restored.auth.is_authenticated());
}

#[tokio::test]
async fn bad_credentials_do_not_trigger_refresh() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path(JWT_CREATE_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "No active account found with the given credentials"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(JWT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        api: ApiConfig { base_url: server.uri(), ..ApiConfig::default() },
        session: SessionConfig { storage_path: dir.path().join("session.json") },
    };
    let ctx = AppContext::from_config(config).await.unwrap();

    let err = ctx.auth.login("alice", "wrong").await.unwrap_err();
    match err {
        ApiError::Auth { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "No active account found with the given credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!ctx.auth.is_authenticated());
}
