// crates/bucketpop-auth/src/http.rs
// ============================================================================
// Module: HTTP Authority Resolver
// Description: Resolution delegated to a remote HTTP authority.
// Purpose: Exchange Basic credentials for a store bundle over HTTPS.
// Dependencies: async-trait, bucketpop-config, bucketpop-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! Each login issues one `GET` to the configured authority with the pair as
//! HTTP Basic credentials. A 2xx answer carries the bundle as JSON; anything
//! else refuses the login without reading the body.
//!
//! Security posture: redirects are disabled so credentials are never replayed
//! to another origin, and response bodies are size-bounded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bucketpop_config::HttpResolverConfig;
use bucketpop_core::CredentialBundle;
use bucketpop_core::Provider;
use bucketpop_core::StoreConnector;
use reqwest::Client;
use reqwest::redirect::Policy;

use crate::Binding;
use crate::LoginCredentials;
use crate::ProviderResolver;
use crate::ResolveError;
use crate::ResolverBuildError;
use crate::resolver::resolve_binding;

// ============================================================================
// SECTION: HTTP Resolver
// ============================================================================

/// Resolver consulting an HTTP authority.
///
/// # Invariants
/// - The client is built once and shared by every login.
/// - Bodies larger than `max_response_bytes` are refused.
pub struct HttpResolver {
    /// Authority URL.
    url: String,
    /// Whole-request timeout, reported on expiry.
    timeout: Duration,
    /// Maximum accepted body size.
    max_response_bytes: usize,
    /// Shared HTTP client with timeouts applied.
    client: Client,
    /// Connector used for store bindings.
    connector: Arc<dyn StoreConnector>,
}

impl HttpResolver {
    /// Creates an HTTP resolver from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverBuildError::HttpClient`] when the client cannot be built.
    pub fn new(
        config: &HttpResolverConfig,
        connector: Arc<dyn StoreConnector>,
    ) -> Result<Self, ResolverBuildError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .redirect(Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| ResolverBuildError::HttpClient(err.to_string()))?;
        Ok(Self {
            url: config.url.clone(),
            timeout: config.timeout(),
            max_response_bytes: config.max_response_bytes,
            client,
            connector,
        })
    }

    /// Asks the authority for the bundle belonging to `login`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Transport`], [`ResolveError::Timeout`],
    /// [`ResolveError::AuthorityRejected`], or [`ResolveError::Decode`].
    pub async fn bind(&self, login: &LoginCredentials) -> Result<Binding, ResolveError> {
        let mut response = self
            .client
            .get(&self.url)
            .basic_auth(login.user(), Some(login.password()))
            .send()
            .await
            .map_err(|err| self.transport_error(&err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::AuthorityRejected {
                status: status.as_u16(),
            });
        }
        let body = self.read_body_with_limit(&mut response).await?;
        let bundle: CredentialBundle =
            serde_json::from_slice(&body).map_err(|err| ResolveError::Decode(err.to_string()))?;
        Ok(Binding::Store(bundle))
    }

    /// Reads the response body while enforcing the size limit.
    async fn read_body_with_limit(
        &self,
        response: &mut reqwest::Response,
    ) -> Result<Vec<u8>, ResolveError> {
        let limit = self.max_response_bytes;
        if let Some(length) = response.content_length()
            && !usize::try_from(length).is_ok_and(|length| length <= limit)
        {
            return Err(ResolveError::Decode(format!(
                "response body exceeds size limit ({length} > {limit})"
            )));
        }
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|err| self.transport_error(&err))? {
            let next_len = body.len().saturating_add(chunk.len());
            if next_len > limit {
                return Err(ResolveError::Decode(format!(
                    "response body exceeds size limit ({next_len} > {limit})"
                )));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Maps a client error to a timeout or transport failure.
    fn transport_error(&self, err: &reqwest::Error) -> ResolveError {
        if err.is_timeout() {
            ResolveError::Timeout(self.timeout)
        } else {
            ResolveError::Transport(err.to_string())
        }
    }
}

impl fmt::Debug for HttpResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResolver")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderResolver for HttpResolver {
    fn strategy(&self) -> &'static str {
        "http"
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
