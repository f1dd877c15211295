// crates/bucketpop-auth/src/static_creds.rs
// ============================================================================
// Module: Static Resolver
// Description: Resolution against one configured user/password pair.
// Purpose: Serve single-mailbox deployments without an external authority.
// Dependencies: async-trait, bucketpop-config, bucketpop-core
// ============================================================================

//! ## Overview
//! Accepts exactly the configured pair. A configured bundle binds the store;
//! without one the login gets an empty placeholder mailbox.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bucketpop_config::StaticResolverConfig;
use bucketpop_core::Provider;
use bucketpop_core::StoreConnector;

use crate::Binding;
use crate::LoginCredentials;
use crate::ProviderResolver;
use crate::ResolveError;
use crate::resolver::resolve_binding;
use crate::security::credentials_match;

/// Resolver for a fixed user/password pair.
pub struct StaticResolver {
    /// Configured credentials and optional bundle.
    config: StaticResolverConfig,
    /// Connector used for store bindings.
    connector: Arc<dyn StoreConnector>,
}

impl StaticResolver {
    /// Creates a static resolver.
    #[must_use]
    pub fn new(config: StaticResolverConfig, connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            config,
            connector,
        }
    }

    /// Selects the binding for `login`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CredentialMismatch`] unless both fields match.
    pub fn bind(&self, login: &LoginCredentials) -> Result<Binding, ResolveError> {
        if !credentials_match(
            login.user(),
            login.password(),
            &self.config.user,
            &self.config.password,
        ) {
            return Err(ResolveError::CredentialMismatch);
        }
        Ok(self.config.bundle.clone().map_or(Binding::Empty, Binding::Store))
    }
}

impl fmt::Debug for StaticResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticResolver").field("config", &self.config).finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderResolver for StaticResolver {
    fn strategy(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self, login: &LoginCredentials) -> Result<Box<dyn Provider>, ResolveError> {
        let binding = self.bind(login);
        resolve_binding(self.strategy(), Some(login.user()), self.connector.as_ref(), async {
            binding
        })
        .await
    }
}
