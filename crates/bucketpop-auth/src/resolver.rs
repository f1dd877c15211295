// crates/bucketpop-auth/src/resolver.rs
// ============================================================================
// Module: Provider Resolver
// Description: The resolution contract and the configured-strategy union.
// Purpose: Map a login to a bound provider behind one uniform interface.
// Dependencies: async-trait, bucketpop-core, tokio, tracing
// ============================================================================

//! ## Overview
//! A resolver turns the (user, password) pair from a mail login into a
//! [`Provider`]. Each strategy decides only *which* [`Binding`] applies; the
//! binding is then turned into a provider through the injected
//! [`StoreConnector`]. [`Resolver`] is the tagged union of the four strategies
//! that the factory hands to the listener.
//!
//! Invariants:
//! - Resolution is all-or-nothing; no strategy falls back to another.
//! - Passwords and tokens never appear in logs or `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use bucketpop_core::CredentialBundle;
use bucketpop_core::PlaceholderProvider;
use bucketpop_core::Provider;
use bucketpop_core::StoreConnector;

use crate::FunctionResolver;
use crate::HttpResolver;
use crate::ResolveError;
use crate::StaticResolver;
use crate::TokenResolver;

// ============================================================================
// SECTION: Login Credentials
// ============================================================================

/// The user/password pair supplied by a login attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Submitted user name.
    user: String,
    /// Submitted password or token.
    password: String,
}

impl LoginCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Returns the submitted user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the submitted password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Bindings
// ============================================================================

/// The store binding a strategy selected for a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Placeholder provider with no messages.
    Empty,
    /// Placeholder provider holding the demonstration message.
    Demo,
    /// Store-backed provider for the bundle.
    Store(CredentialBundle),
}

impl Binding {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Demo => "demo",
            Self::Store(_) => "store",
        }
    }

    /// Builds the provider for this binding.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Store`] when the connector cannot bind the bundle.
    pub fn into_provider(
        self,
        connector: &dyn StoreConnector,
    ) -> Result<Box<dyn Provider>, ResolveError> {
        match self {
            Self::Empty => Ok(Box::new(PlaceholderProvider::empty())),
            Self::Demo => Ok(Box::new(PlaceholderProvider::demo())),
            Self::Store(bundle) => Ok(connector.connect(bundle)?),
        }
    }
}

// ============================================================================
// SECTION: Resolver Contract
// ============================================================================

/// Maps a login to a bound provider.
///
/// # Invariants
/// - Implementations hold only immutable configuration and shared clients.
/// - Each call is independent; no state carries between logins.
#[async_trait]
pub trait ProviderResolver: Send + Sync {
    /// Returns the stable strategy label.
    fn strategy(&self) -> &'static str;

    /// Resolves `login` into a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the login is refused or the authority
    /// cannot be consulted.
    async fn resolve(&self, login: &LoginCredentials) -> Result<Box<dyn Provider>, ResolveError>;
}

/// Runs a strategy's binding step, then connects and logs the outcome.
///
/// `user` is `None` for strategies that ignore the submitted user name.
pub(crate) async fn resolve_binding<F>(
    strategy: &'static str,
    user: Option<&str>,
    connector: &dyn StoreConnector,
    binding: F,
) -> Result<Box<dyn Provider>, ResolveError>
where
    F: Future<Output = Result<Binding, ResolveError>> + Send,
{
    let user = user.unwrap_or("");
    tracing::debug!(strategy, user, "resolving provider");
    let outcome = match binding.await {
        Ok(binding) => {
            let label = binding.label();
            binding.into_provider(connector).map(|provider| (label, provider))
        }
        Err(error) => Err(error),
    };
    match outcome {
        Ok((binding, provider)) => {
            tracing::info!(strategy, user, binding, "provider resolved");
            Ok(provider)
        }
        Err(error) => {
            tracing::warn!(strategy, user, kind = error.kind().as_str(), %error, "resolution failed");
            Err(error)
        }
    }
}

// ============================================================================
// SECTION: Configured Resolver
// ============================================================================

/// The single strategy configured for a deployment.
pub enum Resolver {
    /// Fixed user/password pair.
    Static(StaticResolver),
    /// Self-authenticating signed token.
    Token(TokenResolver),
    /// Remote HTTP authority.
    Http(HttpResolver),
    /// Remote serverless function.
    Function(FunctionResolver),
}

impl Resolver {
    /// Resolves `login`, returning [`ResolveError::Cancelled`] if `cancelled`
    /// completes first. The in-flight authority call is dropped on cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when resolution fails or is cancelled.
    pub async fn resolve_or_cancel<C>(
        &self,
        login: &LoginCredentials,
        cancelled: C,
    ) -> Result<Box<dyn Provider>, ResolveError>
    where
        C: Future<Output = ()> + Send,
    {
        tokio::select! {
            biased;
            () = cancelled => {
                tracing::warn!(
                    strategy = self.strategy(),
                    kind = ResolveError::Cancelled.kind().as_str(),
                    "resolution cancelled"
                );
                Err(ResolveError::Cancelled)
            }
            result = self.resolve(login) => result,
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Resolver").field(&self.strategy()).finish()
    }
}

#[async_trait]
impl ProviderResolver for Resolver {
    fn strategy(&self) -> &'static str {
        match self {
            Self::Static(resolver) => resolver.strategy(),
            Self::Token(resolver) => resolver.strategy(),
            Self::Http(resolver) => resolver.strategy(),
            Self::Function(resolver) => resolver.strategy(),
        }
    }

    async fn resolve(&self, login: &LoginCredentials) -> Result<Box<dyn Provider>, ResolveError> {
        match self {
            Self::Static(resolver) => resolver.resolve(login).await,
            Self::Token(resolver) => resolver.resolve(login).await,
            Self::Http(resolver) => resolver.resolve(login).await,
            Self::Function(resolver) => resolver.resolve(login).await,
        }
    }
}
