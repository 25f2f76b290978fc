//! HTTP transport and client tests against a local Bot API stub.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use parking_lot::Mutex;
use relay_metrics::{PrometheusRegistry, SendOutcome};
use relay_ratelimit::{RateLimitPolicy, SlidingWindowLimiter};
use relay_telegram::{
    HttpTransport, NotifyError, OutboundMessage, RetryPolicy, SendMessagePayload, TelegramClient, TelegramConfig,
    Transport, send_message_url,
};
use serde_json::{Value, json};

const TOKEN: &str = "TEST_TOKEN";

#[derive(Clone, Default)]
struct StubState {
    responses: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl StubState {
    fn with_responses(responses: Vec<(StatusCode, Value)>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            received: Arc::default(),
        }
    }

    fn received(&self) -> Vec<Value> {
        self.received.lock().clone()
    }
}

async fn send_message(State(state): State<StubState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.received.lock().push(body);
    let (status, reply) = state
        .responses
        .lock()
        .pop_front()
        .unwrap_or((StatusCode::OK, json!({"ok": true, "result": {}})));
    (status, Json(reply))
}

/// Serve the stub on an ephemeral port and return its root URL.
async fn spawn_stub(state: StubState) -> String {
    let app = Router::new()
        .route(&format!("/bot{TOKEN}/sendMessage"), post(send_message))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn payload(silent: bool) -> SendMessagePayload {
    SendMessagePayload::new("-100", &OutboundMessage::new("<b>alert</b>", silent))
}

#[tokio::test]
async fn test_transport_posts_json_body() {
    let stub = StubState::default();
    let root = spawn_stub(stub.clone()).await;
    let transport = HttpTransport::new(Duration::from_secs(5), None).unwrap();

    transport
        .post(&send_message_url(&root, TOKEN), &payload(true))
        .await
        .unwrap();

    let received = stub.received();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        json!({
            "chat_id": "-100",
            "text": "<b>alert</b>",
            "parse_mode": "HTML",
            "disable_notification": true,
        })
    );
}

#[tokio::test]
async fn test_transport_reports_api_description() {
    let stub = StubState::with_responses(vec![(
        StatusCode::BAD_REQUEST,
        json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}),
    )]);
    let root = spawn_stub(stub).await;
    let transport = HttpTransport::new(Duration::from_secs(5), None).unwrap();

    let err = transport
        .post(&send_message_url(&root, TOKEN), &payload(false))
        .await
        .unwrap_err();

    match err {
        NotifyError::Api { status, description } => {
            assert_eq!(status, 400);
            assert_eq!(description, "Bad Request: chat not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_transport_falls_back_to_status_reason() {
    let stub = StubState::with_responses(vec![(StatusCode::BAD_GATEWAY, json!({}))]);
    let root = spawn_stub(stub).await;
    let transport = HttpTransport::new(Duration::from_secs(5), None).unwrap();

    let err = transport
        .post(&send_message_url(&root, TOKEN), &payload(false))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "telegram api returned 502: Bad Gateway");
}

#[tokio::test]
async fn test_client_retries_until_accepted() {
    let stub = StubState::with_responses(vec![
        (StatusCode::INTERNAL_SERVER_ERROR, json!({"ok": false})),
        (StatusCode::TOO_MANY_REQUESTS, json!({"ok": false, "description": "Too Many Requests"})),
    ]);
    let root = spawn_stub(stub.clone()).await;

    let config = TelegramConfig::new()
        .with_bot_token(TOKEN)
        .with_chat_id("-100")
        .with_api_root(root)
        .with_retry(RetryPolicy::new(3, Duration::from_millis(1)));
    let limiter = Arc::new(SlidingWindowLimiter::new(RateLimitPolicy::default()));
    let registry = PrometheusRegistry::new();

    let client = TelegramClient::from_config(config, limiter, registry.message_metrics().clone()).unwrap();

    assert!(client.send("<b>alert</b>", false).await);

    let received = stub.received();
    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|body| body == &received[0]));
    assert_eq!(registry.message_metrics().get_sent(SendOutcome::Success), 1);
    assert_eq!(registry.message_metrics().get_sent(SendOutcome::Error), 0);
}

#[tokio::test]
async fn test_client_gives_up_after_retries() {
    let stub = StubState::with_responses(vec![
        (StatusCode::INTERNAL_SERVER_ERROR, json!({})),
        (StatusCode::INTERNAL_SERVER_ERROR, json!({})),
    ]);
    let root = spawn_stub(stub.clone()).await;

    let config = TelegramConfig::new()
        .with_bot_token(TOKEN)
        .with_chat_id("-100")
        .with_api_root(root)
        .with_retry(RetryPolicy::new(2, Duration::from_millis(1)));
    let limiter = Arc::new(SlidingWindowLimiter::new(RateLimitPolicy::default()));
    let registry = PrometheusRegistry::new();

    let client = TelegramClient::from_config(config, limiter, registry.message_metrics().clone()).unwrap();

    assert!(!client.send("x", true).await);
    assert_eq!(stub.received().len(), 2);
    assert_eq!(registry.message_metrics().get_sent(SendOutcome::Error), 1);
}
