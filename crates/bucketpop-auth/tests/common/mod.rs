// crates/bucketpop-auth/tests/common/mod.rs
// ============================================================================
// Module: Resolver Test Fixtures
// Description: Shared connectors and mock authorities for resolver tests.
// ============================================================================

//! Shared fixtures for bucketpop-auth integration tests.

#![allow(dead_code, reason = "Not every test binary uses every fixture.")]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only fixtures use expect for clarity."
)]

use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use bucketpop_auth::ResolveError;
use bucketpop_core::CredentialBundle;
use bucketpop_core::PlaceholderProvider;
use bucketpop_core::Provider;
use bucketpop_core::ProviderError;
use bucketpop_core::StoreConnector;
use tokio::sync::oneshot;

/// Number of messages a store-backed test provider lists.
pub const STORE_MESSAGE_COUNT: usize = 2;

/// Connector that records every bundle it is asked to bind.
#[derive(Default)]
pub struct RecordingConnector {
    bundles: Mutex<Vec<CredentialBundle>>,
}

impl RecordingConnector {
    /// Creates a shared connector.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the bundles bound so far.
    pub fn bundles(&self) -> Vec<CredentialBundle> {
        self.bundles.lock().expect("bundles lock").clone()
    }

    /// Returns the single bound bundle.
    pub fn only_bundle(&self) -> CredentialBundle {
        let bundles = self.bundles();
        assert_eq!(bundles.len(), 1, "expected exactly one bound bundle");
        bundles.into_iter().next().expect("bundle")
    }
}

impl StoreConnector for RecordingConnector {
    fn connect(&self, bundle: CredentialBundle) -> Result<Box<dyn Provider>, ProviderError> {
        self.bundles.lock().expect("bundles lock").push(bundle);
        Ok(Box::new(PlaceholderProvider::with_messages([
            ("store-1", b"one".to_vec()),
            ("store-2", b"two".to_vec()),
        ])))
    }
}

/// Connector that refuses every bundle.
pub struct FailingConnector;

impl StoreConnector for FailingConnector {
    fn connect(&self, _bundle: CredentialBundle) -> Result<Box<dyn Provider>, ProviderError> {
        Err(ProviderError::Unavailable("store offline".to_string()))
    }
}

/// Returns the number of messages `provider` lists.
pub async fn listing_len(provider: &dyn Provider) -> usize {
    provider.list_emails(&[]).await.expect("listing").len()
}

/// Serves `app` on an ephemeral local port.
pub async fn spawn_server(app: Router) -> (String, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    (format!("http://{addr}"), shutdown_tx)
}

/// Returns the error of a resolution expected to fail.
pub fn expect_failure<T>(result: Result<T, ResolveError>) -> ResolveError {
    match result {
        Ok(_) => panic!("expected resolution to fail"),
        Err(error) => error,
    }
}
