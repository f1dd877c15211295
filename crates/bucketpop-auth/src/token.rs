// crates/bucketpop-auth/src/token.rs
// ============================================================================
// Module: Token Resolver
// Description: Resolution from self-authenticating HMAC-signed tokens.
// Purpose: Let the login password carry a verified store binding.
// Dependencies: async-trait, bucketpop-config, bucketpop-core, jsonwebtoken, serde
// ============================================================================

//! ## Overview
//! The login password is a compact JWS signed with a shared secret. The
//! signature and temporal claims are verified first; only a verified token's
//! `provider` discriminator is inspected. The submitted user name is ignored.
//!
//! Security posture: tokens are untrusted input. Verification runs with zero
//! leeway and failures are never defaulted to a binding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bucketpop_config::TokenResolverConfig;
use bucketpop_core::CredentialBundle;
use bucketpop_core::Provider;
use bucketpop_core::StoreConnector;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use jsonwebtoken::get_current_timestamp;
use serde::Deserialize;
use serde::Serialize;

use crate::Binding;
use crate::LoginCredentials;
use crate::ProviderResolver;
use crate::ResolveError;
use crate::resolver::resolve_binding;

// ============================================================================
// SECTION: Claims
// ============================================================================

/// Signed-token payload.
///
/// # Invariants
/// - Temporal claims are seconds since the Unix epoch and optional.
/// - Bundle fields sit at the top level of the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    /// Issued-at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Not-before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience (single string form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Provider discriminator; absent means the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Embedded store bundle.
    #[serde(flatten)]
    pub bundle: CredentialBundle,
}

impl TokenClaims {
    /// Creates claims binding `bundle` under `provider`.
    #[must_use]
    pub fn new(provider: impl Into<String>, bundle: CredentialBundle) -> Self {
        Self {
            provider: Some(provider.into()),
            bundle,
            ..Self::default()
        }
    }

    /// Sets `iat` to now and `exp` to now plus `ttl_secs`.
    #[must_use]
    pub fn valid_for(mut self, ttl_secs: u64) -> Self {
        let now = get_current_timestamp();
        self.iat = Some(now);
        self.exp = Some(now.saturating_add(ttl_secs));
        self
    }

    /// Signs the claims as an HS256 token.
    ///
    /// # Errors
    ///
    /// Returns the signing error when the claims cannot be encoded.
    pub fn sign(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

// ============================================================================
// SECTION: Provider Discriminator
// ============================================================================

/// Closed set of bindings a token may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `none`: empty placeholder.
    None,
    /// `demo`: placeholder with the demonstration message.
    Demo,
    /// `""` or `s3`: store-backed provider.
    Store,
}

impl ProviderKind {
    /// Parses a discriminator, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnsupportedProvider`] for any other value.
    pub fn parse(value: &str) -> Result<Self, ResolveError> {
        if value.is_empty() || value.eq_ignore_ascii_case("s3") {
            Ok(Self::Store)
        } else if value.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else if value.eq_ignore_ascii_case("demo") {
            Ok(Self::Demo)
        } else {
            Err(ResolveError::UnsupportedProvider(value.to_string()))
        }
    }
}

// ============================================================================
// SECTION: Token Resolver
// ============================================================================

/// Resolver verifying HMAC-signed tokens.
pub struct TokenResolver {
    /// Verification key derived from the shared secret.
    key: DecodingKey,
    /// Signature and claim validation rules.
    validation: Validation,
    /// Connector used for store bindings.
    connector: Arc<dyn StoreConnector>,
}

impl TokenResolver {
    /// Creates a token resolver.
    #[must_use]
    pub fn new(config: &TokenResolverConfig, connector: Arc<dyn StoreConnector>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.required_spec_claims.clear();
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            connector,
        }
    }

    /// Verifies `token` and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::TokenInvalid`] on any structural, signature,
    /// or temporal failure.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, ResolveError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|err| ResolveError::TokenInvalid(err.to_string()))?;
        let claims = data.claims;
        if claims.iat.is_some_and(|iat| iat > get_current_timestamp()) {
            return Err(ResolveError::TokenInvalid("token issued in the future".to_string()));
        }
        Ok(claims)
    }

    /// Selects the binding for a token.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::TokenInvalid`] or
    /// [`ResolveError::UnsupportedProvider`].
    pub fn bind(&self, token: &str) -> Result<Binding, ResolveError> {
        let claims = self.verify(token)?;
        match ProviderKind::parse(claims.provider.as_deref().unwrap_or(""))? {
            ProviderKind::None => Ok(Binding::Empty),
            ProviderKind::Demo => Ok(Binding::Demo),
            ProviderKind::Store => Ok(Binding::Store(claims.bundle)),
        }
    }
}

impl fmt::Debug for TokenResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResolver")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProviderResolver for TokenResolver {
    fn strategy(&self) -> &'static str {
        "token"
    }

    async fn resolve(&self, login: &LoginCredentials) -> Result<Box<dyn Provider>, ResolveError> {
        let binding = self.bind(login.password());
        resolve_binding(self.strategy(), None, self.connector.as_ref(), async { binding }).await
    }
}
