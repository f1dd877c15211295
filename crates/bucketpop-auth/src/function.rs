// crates/bucketpop-auth/src/function.rs
// ============================================================================
// Module: Function Authority Resolver
// Description: Resolution delegated to a synchronously invoked function.
// Purpose: Exchange a login for a store bundle via a serverless authority.
// Dependencies: async-trait, aws-config, aws-sdk-lambda, serde, tokio
// ============================================================================

//! ## Overview
//! The login is serialized as `{"User","Password"}` and sent to the configured
//! function with a request/response invocation. The function answers with a
//! `StatusCode` and the bundle fields inlined. A status other than 200 refuses
//! the login even though the invocation itself succeeded; that separates "the
//! function said no" from "the function could not be reached".
//!
//! Invocation goes through [`FunctionInvoker`]; [`LambdaInvoker`] is the
//! AWS Lambda implementation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use bucketpop_config::FunctionResolverConfig;
use bucketpop_core::CredentialBundle;
use bucketpop_core::Provider;
use bucketpop_core::StoreConnector;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::Binding;
use crate::LoginCredentials;
use crate::ProviderResolver;
use crate::ResolveError;
use crate::resolver::resolve_binding;

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Status a function returns to accept a login.
const STATUS_OK: i64 = 200;

/// Request payload sent to the function.
#[derive(Clone, Copy, Serialize)]
pub struct DelegatedRequest<'a> {
    /// Submitted user name.
    #[serde(rename = "User")]
    pub user: &'a str,
    /// Submitted password.
    #[serde(rename = "Password")]
    pub password: &'a str,
}

impl<'a> From<&'a LoginCredentials> for DelegatedRequest<'a> {
    fn from(login: &'a LoginCredentials) -> Self {
        Self {
            user: login.user(),
            password: login.password(),
        }
    }
}

impl fmt::Debug for DelegatedRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedRequest")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response payload returned by the function.
///
/// # Invariants
/// - A missing `StatusCode` decodes as 0 and is therefore a refusal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedResponse {
    /// The function's own accept/refuse signal.
    #[serde(rename = "StatusCode", alias = "statusCode", default)]
    pub status_code: i64,
    /// Bundle fields inlined at the top level.
    #[serde(flatten)]
    pub bundle: CredentialBundle,
}

// ============================================================================
// SECTION: Invoker
// ============================================================================

/// Synchronous function invocation seam.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invokes `function` with `payload` and returns the response payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Transport`] when the invocation fails or the
    /// function reports an execution error.
    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<Vec<u8>, ResolveError>;
}

/// [`FunctionInvoker`] backed by the AWS Lambda API.
///
/// # Invariants
/// - SDK configuration is loaded once, on the first invocation.
#[derive(Debug)]
pub struct LambdaInvoker {
    /// Region override applied when loading SDK configuration.
    region: Option<String>,
    /// Endpoint override applied when loading SDK configuration.
    endpoint_url: Option<String>,
    /// Lambda client, built on first use.
    client: OnceCell<Client>,
}

impl LambdaInvoker {
    /// Creates an invoker using the ambient SDK configuration plus the
    /// region and endpoint overrides from `config`.
    #[must_use]
    pub fn new(config: &FunctionResolverConfig) -> Self {
        Self {
            region: config.region.clone(),
            endpoint_url: config.endpoint_url.clone(),
            client: OnceCell::new(),
        }
    }

    /// Creates an invoker around an already configured client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self {
            region: None,
            endpoint_url: None,
            client: OnceCell::from(client),
        }
    }

    /// Returns the client, loading SDK configuration on first use.
    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let mut loader = aws_config::defaults(BehaviorVersion::latest());
                if let Some(region) = self.region.clone() {
                    loader = loader.region(Region::new(region));
                }
                if let Some(endpoint) = self.endpoint_url.clone() {
                    loader = loader.endpoint_url(endpoint);
                }
                Client::new(&loader.load().await)
            })
            .await
    }
}

#[async_trait]
impl FunctionInvoker for LambdaInvoker {
    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<Vec<u8>, ResolveError> {
        let output = self
            .client()
            .await
            .invoke()
            .function_name(function)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|err| ResolveError::Transport(DisplayErrorContext(&err).to_string()))?;
        if let Some(error) = output.function_error() {
            return Err(ResolveError::Transport(format!("function error: {error}")));
        }
        Ok(output.payload().map(|blob| blob.as_ref().to_vec()).unwrap_or_default())
    }
}

// ============================================================================
// SECTION: Function Resolver
// ============================================================================

/// Resolver consulting a remote function.
pub struct FunctionResolver {
    /// Function name or ARN.
    function: String,
    /// Invocation timeout.
    timeout: Duration,
    /// Invocation backend.
    invoker: Arc<dyn FunctionInvoker>,
    /// Connector used for store bindings.
    connector: Arc<dyn StoreConnector>,
}

impl FunctionResolver {
    /// Creates a function resolver around an invoker.
    #[must_use]
    pub fn new(
        config: &FunctionResolverConfig,
        invoker: Arc<dyn FunctionInvoker>,
        connector: Arc<dyn StoreConnector>,
    ) -> Self {
        Self {
            function: config.function.clone(),
            timeout: config.timeout(),
            invoker,
            connector,
        }
    }

    /// Asks the function for the bundle belonging to `login`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Transport`], [`ResolveError::Timeout`],
    /// [`ResolveError::Decode`], or [`ResolveError::AuthorityRejected`].
    pub async fn bind(&self, login: &LoginCredentials) -> Result<Binding, ResolveError> {
        let request = serde_json::to_vec(&DelegatedRequest::from(login))
            .map_err(|err| ResolveError::Decode(err.to_string()))?;
        let payload =
            tokio::time::timeout(self.timeout, self.invoker.invoke(&self.function, request))
                .await
                .map_err(|_| ResolveError::Timeout(self.timeout))??;
        let response: DelegatedResponse = serde_json::from_slice(&payload)
            .map_err(|err| ResolveError::Decode(err.to_string()))?;
        if response.status_code != STATUS_OK {
            let status = u16::try_from(response.status_code).map_err(|_| {
                ResolveError::Decode(format!("status code {} out of range", response.status_code))
            })?;
            return Err(ResolveError::AuthorityRejected {
                status,
            });
        }
        Ok(Binding::Store(response.bundle))
    }
}

impl fmt::Debug for FunctionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionResolver")
            .field("function", &self.function)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderResolver for FunctionResolver {
    fn strategy(&self) -> &'static str {
        "function"
    }

    async fn resolve(&self, login: &LoginCredentials) -> Result<Box<dyn Provider>, ResolveError> {
        resolve_binding(
            self.strategy(),
            Some(login.user()),
            self.connector.as_ref(),
            self.bind(login),
        )
        .await
    }
}
