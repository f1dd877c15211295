// crates/bucketpop-auth/tests/lambda_invoker.rs
// ============================================================================
// Module: Lambda Invoker Tests
// Description: Lambda-backed invocation against a local endpoint.
// Purpose: Validate function-error mapping and payload round trips offline.
// ============================================================================

//! ## Overview
//! Serves the Lambda `Invoke` route from an axum app on `127.0.0.1:0` and
//! points a [`LambdaInvoker`] at it with fixed test credentials.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

mod common;

use std::sync::Arc;
use std::sync::Mutex;

use aws_sdk_lambda::Client;
use aws_sdk_lambda::config::BehaviorVersion;
use aws_sdk_lambda::config::Credentials;
use aws_sdk_lambda::config::Region;
use axum::Router;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use bucketpop_auth::FailureKind;
use bucketpop_auth::FunctionInvoker;
use bucketpop_auth::FunctionResolver;
use bucketpop_auth::LambdaInvoker;
use bucketpop_auth::LoginCredentials;
use bucketpop_auth::ProviderResolver;
use bucketpop_auth::ResolveError;
use bucketpop_config::FunctionResolverConfig;
use bucketpop_core::CredentialBundle;
use common::RecordingConnector;
use common::STORE_MESSAGE_COUNT;
use common::expect_failure;
use common::listing_len;
use common::spawn_server;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Route of the Lambda `Invoke` operation.
const INVOKE_ROUTE: &str = "/2015-03-31/functions/{name}/invocations";

/// Canned reply and the invocations seen by the local endpoint.
#[derive(Clone)]
struct Endpoint {
    reply: Value,
    function_error: Option<&'static str>,
    seen: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Endpoint {
    fn new(reply: Value, function_error: Option<&'static str>) -> Self {
        Self {
            reply,
            function_error,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn invoke(
    State(endpoint): State<Endpoint>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    endpoint.seen.lock().unwrap().push((name, request));
    let payload = serde_json::to_vec(&endpoint.reply).unwrap();
    match endpoint.function_error {
        Some(kind) => ([("x-amz-function-error", kind)], payload).into_response(),
        None => payload.into_response(),
    }
}

async fn serve(endpoint: Endpoint) -> (LambdaInvoker, tokio::sync::oneshot::Sender<()>) {
    let app = Router::new().route(INVOKE_ROUTE, post(invoke)).with_state(endpoint);
    let (base, shutdown) = spawn_server(app).await;
    let config = aws_sdk_lambda::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url(base)
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "tests"))
        .build();
    (LambdaInvoker::from_client(Client::from_conf(config)), shutdown)
}

// ============================================================================
// SECTION: Invocation
// ============================================================================

#[tokio::test]
async fn plain_reply_returns_payload() {
    let endpoint = Endpoint::new(json!({"StatusCode": 200, "bucket": "mail"}), None);
    let (invoker, _shutdown) = serve(endpoint.clone()).await;
    let payload = invoker.invoke("mail-auth", br#"{"User":"u"}"#.to_vec()).await.unwrap();
    let reply: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(reply, json!({"StatusCode": 200, "bucket": "mail"}));
    let seen = endpoint.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![("mail-auth".to_string(), json!({"User": "u"}))]);
}

#[tokio::test]
async fn function_error_is_a_transport_failure() {
    let endpoint = Endpoint::new(json!({"errorMessage": "boom"}), Some("Unhandled"));
    let (invoker, _shutdown) = serve(endpoint).await;
    let error = invoker.invoke("mail-auth", b"{}".to_vec()).await.unwrap_err();
    assert!(matches!(&error, ResolveError::Transport(message) if message.contains("Unhandled")));
    assert_eq!(error.kind(), FailureKind::TransportFailure);
}

// ============================================================================
// SECTION: Function Strategy
// ============================================================================

#[tokio::test]
async fn function_strategy_binds_bundle_through_lambda() {
    let endpoint = Endpoint::new(
        json!({"StatusCode": 200, "bucket": "mail", "region": "eu-west-1"}),
        None,
    );
    let (invoker, _shutdown) = serve(endpoint.clone()).await;
    let connector = RecordingConnector::shared();
    let resolver = FunctionResolver::new(
        &FunctionResolverConfig::new("mail-auth"),
        Arc::new(invoker),
        connector.clone(),
    );
    let provider = resolver.resolve(&LoginCredentials::new("alice", "pw")).await.unwrap();
    assert_eq!(listing_len(provider.as_ref()).await, STORE_MESSAGE_COUNT);
    let mut expected = CredentialBundle::for_bucket("mail");
    expected.region = "eu-west-1".to_string();
    assert_eq!(connector.only_bundle(), expected);
    let seen = endpoint.seen.lock().unwrap().clone();
    assert_eq!(seen[0].1, json!({"User": "alice", "Password": "pw"}));
}

#[tokio::test]
async fn function_strategy_refuses_login_on_function_error() {
    let endpoint = Endpoint::new(json!({"StatusCode": 200, "bucket": "mail"}), Some("Handled"));
    let (invoker, _shutdown) = serve(endpoint).await;
    let connector = RecordingConnector::shared();
    let resolver = FunctionResolver::new(
        &FunctionResolverConfig::new("mail-auth"),
        Arc::new(invoker),
        connector.clone(),
    );
    let error = expect_failure(resolver.resolve(&LoginCredentials::new("alice", "pw")).await);
    assert_eq!(error.kind(), FailureKind::TransportFailure);
    assert!(connector.bundles().is_empty());
}
