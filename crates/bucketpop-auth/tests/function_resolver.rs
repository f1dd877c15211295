// crates/bucketpop-auth/tests/function_resolver.rs
// ============================================================================
// Module: Function Resolver Tests
// Description: Function authority behavior through an in-memory invoker.
// Purpose: Validate payload shape, status handling, and timeouts.
// ============================================================================

//! ## Overview
//! Replaces the Lambda invoker with scripted [`FunctionInvoker`]s.

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
use std::time::Duration;

use async_trait::async_trait;
use bucketpop_auth::DelegatedResponse;
use bucketpop_auth::FailureKind;
use bucketpop_auth::FunctionInvoker;
use bucketpop_auth::FunctionResolver;
use bucketpop_auth::LoginCredentials;
use bucketpop_auth::ProviderResolver;
use bucketpop_auth::ResolveError;
use bucketpop_config::FunctionResolverConfig;
use bucketpop_core::CredentialBundle;
use common::RecordingConnector;
use common::STORE_MESSAGE_COUNT;
use common::expect_failure;
use common::listing_len;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Invoker answering every call with a fixed outcome.
struct ScriptedInvoker {
    outcome: Result<Vec<u8>, String>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedInvoker {
    fn replying(payload: &Value) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(serde_json::to_vec(payload).unwrap()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn raw(payload: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(payload.to_vec()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl FunctionInvoker for ScriptedInvoker {
    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<Vec<u8>, ResolveError> {
        let request: Value = serde_json::from_slice(&payload).unwrap();
        self.calls.lock().unwrap().push((function.to_string(), request));
        self.outcome.clone().map_err(ResolveError::Transport)
    }
}

/// Invoker that never answers.
struct SilentInvoker;

#[async_trait]
impl FunctionInvoker for SilentInvoker {
    async fn invoke(&self, _function: &str, _payload: Vec<u8>) -> Result<Vec<u8>, ResolveError> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }
}

fn config() -> FunctionResolverConfig {
    FunctionResolverConfig {
        timeout_ms: 200,
        ..FunctionResolverConfig::new("mail-auth")
    }
}

fn resolver(
    invoker: Arc<dyn FunctionInvoker>,
    connector: Arc<RecordingConnector>,
) -> FunctionResolver {
    FunctionResolver::new(&config(), invoker, connector)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn status_200_binds_returned_bundle() {
    let invoker = ScriptedInvoker::replying(&json!({
        "StatusCode": 200,
        "bucket": "b1",
        "region": "us-east-1",
        "awsAccessKeyID": "ASIA",
        "awsSessionToken": "tok"
    }));
    let connector = RecordingConnector::shared();
    let provider = resolver(invoker.clone(), connector.clone())
        .resolve(&LoginCredentials::new("alice", "pw"))
        .await
        .unwrap();
    assert_eq!(listing_len(provider.as_ref()).await, STORE_MESSAGE_COUNT);
    assert_eq!(
        connector.only_bundle(),
        CredentialBundle {
            region: "us-east-1".to_string(),
            access_key_id: "ASIA".to_string(),
            session_token: "tok".to_string(),
            ..CredentialBundle::for_bucket("b1")
        }
    );
    let calls = invoker.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![("mail-auth".to_string(), json!({"User": "alice", "Password": "pw"}))]);
}

#[tokio::test]
async fn non_200_payload_status_is_rejected() {
    for status in [500, 401, 0] {
        let invoker = ScriptedInvoker::replying(&json!({"StatusCode": status, "bucket": "b1"}));
        let connector = RecordingConnector::shared();
        let error = expect_failure(
            resolver(invoker, connector.clone()).resolve(&LoginCredentials::new("u", "p")).await,
        );
        assert!(matches!(
            error,
            ResolveError::AuthorityRejected { status: code } if i32::from(code) == status
        ));
        assert!(connector.bundles().is_empty());
    }
}

#[tokio::test]
async fn missing_status_is_rejected() {
    let invoker = ScriptedInvoker::replying(&json!({"bucket": "b1"}));
    let error = expect_failure(
        resolver(invoker, RecordingConnector::shared())
            .resolve(&LoginCredentials::new("u", "p"))
            .await,
    );
    assert_eq!(error.kind(), FailureKind::AuthorityRejected);
}

#[tokio::test]
async fn invocation_failure_is_a_transport_failure() {
    let error = expect_failure(
        resolver(ScriptedInvoker::failing("throttled"), RecordingConnector::shared())
            .resolve(&LoginCredentials::new("u", "p"))
            .await,
    );
    assert_eq!(error.kind(), FailureKind::TransportFailure);
}

#[tokio::test]
async fn malformed_payload_is_a_decode_failure() {
    for payload in [&b"not json"[..], b"", b"[1,2]", br#"{"StatusCode":"200"}"#] {
        let error = expect_failure(
            resolver(ScriptedInvoker::raw(payload), RecordingConnector::shared())
                .resolve(&LoginCredentials::new("u", "p"))
                .await,
        );
        assert_eq!(error.kind(), FailureKind::DecodeFailure);
    }
}

#[tokio::test]
async fn out_of_range_status_is_a_decode_failure() {
    let invoker = ScriptedInvoker::replying(&json!({"StatusCode": 70000}));
    let error = expect_failure(
        resolver(invoker, RecordingConnector::shared())
            .resolve(&LoginCredentials::new("u", "p"))
            .await,
    );
    assert_eq!(error.kind(), FailureKind::DecodeFailure);
}

#[tokio::test]
async fn silent_function_times_out() {
    let error = expect_failure(
        resolver(Arc::new(SilentInvoker), RecordingConnector::shared())
            .resolve(&LoginCredentials::new("u", "p"))
            .await,
    );
    assert!(matches!(error, ResolveError::Timeout(timeout) if timeout == Duration::from_millis(200)));
}

#[test]
fn response_accepts_lower_camel_status() {
    let response: DelegatedResponse =
        serde_json::from_value(json!({"statusCode": 200, "bucket": "b"})).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.bundle, CredentialBundle::for_bucket("b"));
}
