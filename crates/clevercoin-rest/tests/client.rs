//! Integration tests for the CleverCoin REST client using a mock Axum server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, Method as HttpMethod, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use clevercoin_auth::{Nonce, RequestSigner, HEADER_KEY, HEADER_NONCE, HEADER_SIGNATURE};
use clevercoin_rest::{
    CallSpec, ClevercoinClient, ClientConfig, Credentials, FixedClock, Method, Params, RestError,
    Visibility,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    query: Option<String>,
    headers: HashMap<String, String>,
    body: String,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn auth_header_count(&self) -> usize {
        self.headers
            .keys()
            .filter(|name| name.starts_with("x-auth-"))
            .count()
    }
}

#[derive(Clone, Default)]
struct TestServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServerState {
    async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    (
        status,
        [("content-type", "application/json")],
        body.to_string(),
    )
        .into_response()
}

async fn handle(
    State(state): State<TestServerState>,
    method: HttpMethod,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: body.clone(),
    };
    state.requests.lock().await.push(recorded);

    match uri.path() {
        "/v1/ticker" => json_response(StatusCode::OK, json!({"last": "250.00", "volume": "12.5"})),
        "/v1/wallets" => {
            if headers.contains_key(HEADER_SIGNATURE) {
                json_response(
                    StatusCode::OK,
                    json!({"wallets": [{"currency": "EUR", "balance": "100.00"}]}),
                )
            } else {
                json_response(StatusCode::UNAUTHORIZED, json!({"error": "missing signature"}))
            }
        }
        "/v1/orders" => json_response(StatusCode::OK, json!({"echo": body})),
        "/v1/missing" => json_response(StatusCode::NOT_FOUND, json!({"error": "not found"})),
        "/v1/broken" => (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response(),
        "/v1/garbage" => (StatusCode::OK, "not json").into_response(),
        "/v1/list" => json_response(StatusCode::OK, json!([1, 2, 3])),
        "/v1/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            json_response(StatusCode::OK, json!({}))
        }
        _ => json_response(StatusCode::NOT_FOUND, json!({"error": "unknown endpoint"})),
    }
}

async fn start_test_server(state: TestServerState) -> SocketAddr {
    let router = Router::new().fallback(handle).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("missing local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test server failed");
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

fn fixed_clock() -> FixedClock {
    FixedClock(Duration::new(123_456, 1_000))
}

fn public_client(addr: SocketAddr) -> ClevercoinClient {
    ClevercoinClient::with_config(ClientConfig::new().with_base_url(format!("http://{}/", addr)))
        .unwrap()
}

fn private_client(addr: SocketAddr) -> ClevercoinClient {
    let creds = Credentials::new("K", "S").unwrap();
    ClevercoinClient::with_config(
        ClientConfig::new()
            .with_base_url(format!("http://{}", addr))
            .with_credentials(creds),
    )
    .unwrap()
}

#[tokio::test]
async fn test_public_call_returns_object_without_auth_headers() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = public_client(addr);

    let ticker = client
        .execute(&CallSpec::public(Method::Get, "ticker"))
        .await
        .unwrap();
    assert_eq!(ticker["last"], "250.00");

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/v1/ticker");
    assert_eq!(requests[0].auth_header_count(), 0);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_public_call_with_credentials_still_unsigned() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = private_client(addr);

    client
        .execute(&CallSpec::public(Method::Get, "ticker"))
        .await
        .unwrap();

    assert_eq!(state.requests().await[0].auth_header_count(), 0);
}

#[tokio::test]
async fn test_private_get_sends_pinned_signature() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = private_client(addr).with_clock(fixed_clock());

    let wallets = client
        .execute(&CallSpec::private(Method::Get, "wallets"))
        .await
        .unwrap();
    assert!(wallets["wallets"].is_array());

    let requests = state.requests().await;
    let request = &requests[0];
    assert_eq!(request.auth_header_count(), 3);
    assert_eq!(request.header(HEADER_KEY), Some("K"));
    assert_eq!(request.header(HEADER_NONCE), Some("123456000001"));
    assert_eq!(
        request.header(HEADER_SIGNATURE),
        Some("8a983685a56a6da3dbf8c22df9b08b736cbe9a7b9dfa8cc47db7ab9f3cd26d22")
    );
}

#[tokio::test]
async fn test_private_post_sends_form_body_and_matching_signature() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = private_client(addr).with_clock(fixed_clock());

    let call = CallSpec::private(Method::Post, "orders")
        .query("currency", "EUR")
        .body("type", "bid")
        .body("amount", "0.5")
        .body("note", "a b&c");
    let response = client.execute(&call).await.unwrap();
    assert_eq!(response["echo"], "type=bid&amount=0.5&note=a+b%26c");

    let requests = state.requests().await;
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.query.as_deref(), Some("currency=EUR"));
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );

    let creds = Credentials::new("K", "S").unwrap();
    let expected = RequestSigner::with_nonce(&creds, Nonce::from("123456000001"))
        .sign(
            "POST",
            "/v1/orders?currency=EUR",
            [("amount", "0.5"), ("note", "a b&c"), ("type", "bid")],
        )
        .unwrap();
    assert_eq!(request.header(HEADER_SIGNATURE), Some(expected.signature.as_str()));
}

#[tokio::test]
async fn test_query_string_keeps_caller_order() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = public_client(addr);

    client
        .execute(
            &CallSpec::public(Method::Get, "ticker")
                .query("z", "1")
                .query("a", "2"),
        )
        .await
        .unwrap();

    assert_eq!(state.requests().await[0].query.as_deref(), Some("z=1&a=2"));
}

#[tokio::test]
async fn test_get_with_body_never_reaches_server() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = private_client(addr);

    let err = client
        .execute(&CallSpec::private(Method::Get, "wallets").body("amount", "1"))
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::Validation(_)));
    assert!(state.requests().await.is_empty());
}

#[tokio::test]
async fn test_api_error_uses_error_field() {
    let addr = start_test_server(TestServerState::default()).await;
    let client = public_client(addr);

    let err = client
        .execute(&CallSpec::public(Method::Get, "missing"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RestError::Api { status: 404, ref message } if message == "not found"
    ));
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_api_error_uses_raw_body() {
    let addr = start_test_server(TestServerState::default()).await;
    let client = public_client(addr);

    let err = client
        .execute(&CallSpec::public(Method::Get, "broken"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RestError::Api { status: 500, ref message } if message == "oops"
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unauthenticated_private_endpoint_reports_status() {
    let addr = start_test_server(TestServerState::default()).await;
    let client = public_client(addr);

    let err = client
        .execute(&CallSpec::public(Method::Get, "wallets"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_protocol_errors() {
    let addr = start_test_server(TestServerState::default()).await;
    let client = public_client(addr);

    let err = client
        .execute(&CallSpec::public(Method::Get, "garbage"))
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Protocol { ref body, .. } if body == "not json"));

    let err = client
        .execute(&CallSpec::public(Method::Get, "list"))
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Protocol { .. }));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = public_client(addr);
    let err = client
        .execute(&CallSpec::public(Method::Get, "ticker"))
        .await
        .unwrap_err();

    assert!(matches!(err, RestError::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let addr = start_test_server(TestServerState::default()).await;
    let client = ClevercoinClient::with_config(
        ClientConfig::new()
            .with_base_url(format!("http://{}", addr))
            .with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = client
        .execute(&CallSpec::public(Method::Get, "slow"))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_execute_as_deserializes_response() {
    #[derive(Debug, Deserialize)]
    struct Ticker {
        last: String,
        volume: String,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Wrong {
        bid: u64,
    }

    let addr = start_test_server(TestServerState::default()).await;
    let client = public_client(addr);
    let call = CallSpec::public(Method::Get, "ticker");

    let ticker: Ticker = client.execute_as(&call).await.unwrap();
    assert_eq!(ticker.last, "250.00");
    assert_eq!(ticker.volume, "12.5");

    let err = client.execute_as::<Wrong>(&call).await.unwrap_err();
    assert!(matches!(err, RestError::Protocol { .. }));
}

#[tokio::test]
async fn test_call_with_parts() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = private_client(addr);

    let response = client
        .call(
            Visibility::Private,
            Method::Put,
            "orders",
            Params::new(),
            Params::from([("id", "7"), ("price", "260")]),
        )
        .await
        .unwrap();
    assert_eq!(response["echo"], "id=7&price=260");

    let requests = state.requests().await;
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].auth_header_count(), 3);
}

#[tokio::test]
async fn test_concurrent_private_calls_get_increasing_nonces() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = private_client(addr);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .execute(&CallSpec::private(Method::Get, "wallets"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let nonces: Vec<String> = state
        .requests()
        .await
        .iter()
        .map(|r| r.header(HEADER_NONCE).unwrap().to_string())
        .collect();
    assert_eq!(nonces.len(), 8);
    for pair in nonces.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
    }
}

#[tokio::test]
async fn test_close_releases_client() {
    let addr = start_test_server(TestServerState::default()).await;
    let client = public_client(addr);
    let other = client.clone();

    client.close();

    // Clones keep their own handle
    other
        .execute(&CallSpec::public(Method::Get, "ticker"))
        .await
        .unwrap();
    other.close();
}

#[tokio::test]
async fn test_signed_path_matches_received_path() {
    let state = TestServerState::default();
    let addr = start_test_server(state.clone()).await;
    let client = private_client(addr).with_clock(fixed_clock());

    client
        .execute(&CallSpec::private(Method::Get, "orders/open_v2").query("limit", "5"))
        .await
        .unwrap_err();

    let err = client
        .execute(&CallSpec::private(Method::Get, "orders/../wallets"))
        .await
        .unwrap_err();
    assert!(matches!(err, RestError::Validation(_)));

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1/orders/open_v2");
    assert_eq!(requests[0].query.as_deref(), Some("limit=5"));

    let creds = Credentials::new("K", "S").unwrap();
    let expected = RequestSigner::with_nonce(&creds, Nonce::from("123456000001"))
        .sign("GET", "/v1/orders/open_v2?limit=5", std::iter::empty::<(&str, &str)>())
        .unwrap();
    assert_eq!(
        requests[0].header(HEADER_SIGNATURE),
        Some(expected.signature.as_str())
    );
}

#[tokio::test]
async fn test_unparseable_base_url_is_not_retryable() {
    let err = ClevercoinClient::with_config(ClientConfig::new().with_base_url("api.clevercoin.com"))
        .unwrap_err();
    assert!(matches!(err, RestError::Validation(_)));
    assert!(!err.is_retryable());
}
