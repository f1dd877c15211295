// crates/bucketpop-auth/src/error.rs
// ============================================================================
// Module: Resolution Errors
// Description: Failure types for provider resolution and resolver construction.
// Purpose: Give callers stable failure kinds without leaking secrets.
// Dependencies: bucketpop-core, thiserror
// ============================================================================

//! ## Overview
//! Every resolution failure is terminal for the login attempt that produced
//! it. [`ResolveError::kind`] maps failures to stable [`FailureKind`] labels
//! for logs. Error text never contains the submitted password or token.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use bucketpop_core::ProviderError;
use thiserror::Error;

// ============================================================================
// SECTION: Resolution Errors
// ============================================================================

/// Provider resolution failures.
///
/// # Invariants
/// - Variants are stable for classification via [`ResolveError::kind`].
/// - Messages never echo the submitted password or token.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Static credentials did not match.
    #[error("credentials do not match")]
    CredentialMismatch,
    /// Token failed structural, signature, or temporal verification.
    #[error("invalid token: {0}")]
    TokenInvalid(String),
    /// Token named a provider outside the accepted set.
    #[error("unsupported provider {0:?}: expected '', 'none', 'demo' or 's3'")]
    UnsupportedProvider(String),
    /// Authority could not be reached or the exchange failed.
    #[error("authority transport failure: {0}")]
    Transport(String),
    /// Authority did not answer within the configured timeout.
    #[error("authority timed out after {0:?}")]
    Timeout(Duration),
    /// Authority answered but refused the login.
    #[error("authority rejected login with status {status}")]
    AuthorityRejected {
        /// Status reported by the authority.
        status: u16,
    },
    /// Authority response could not be decoded.
    #[error("authority response decode failed: {0}")]
    Decode(String),
    /// The store connector could not bind the resolved bundle.
    #[error(transparent)]
    Store(#[from] ProviderError),
    /// The caller cancelled the resolution.
    #[error("resolution cancelled")]
    Cancelled,
}

impl ResolveError {
    /// Returns the stable failure classification.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::CredentialMismatch => FailureKind::CredentialMismatch,
            Self::TokenInvalid(_) => FailureKind::TokenInvalid,
            Self::UnsupportedProvider(_) => FailureKind::UnsupportedProvider,
            Self::Transport(_) | Self::Timeout(_) => FailureKind::TransportFailure,
            Self::AuthorityRejected {
                ..
            } => FailureKind::AuthorityRejected,
            Self::Decode(_) => FailureKind::DecodeFailure,
            Self::Store(_) => FailureKind::StoreUnavailable,
            Self::Cancelled => FailureKind::Cancelled,
        }
    }
}

/// Stable failure classification for logs and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Static credential mismatch.
    CredentialMismatch,
    /// Token verification failure.
    TokenInvalid,
    /// Unknown token provider discriminator.
    UnsupportedProvider,
    /// Network, invocation, or timeout failure.
    TransportFailure,
    /// Authority refused the login.
    AuthorityRejected,
    /// Malformed authority response.
    DecodeFailure,
    /// Store connector failure.
    StoreUnavailable,
    /// Caller cancellation.
    Cancelled,
}

impl FailureKind {
    /// Returns the snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CredentialMismatch => "credential_mismatch",
            Self::TokenInvalid => "token_invalid",
            Self::UnsupportedProvider => "unsupported_provider",
            Self::TransportFailure => "transport_failure",
            Self::AuthorityRejected => "authority_rejected",
            Self::DecodeFailure => "decode_failure",
            Self::StoreUnavailable => "store_unavailable",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Construction Errors
// ============================================================================

/// Failures while building a resolver from configuration.
#[derive(Debug, Error)]
pub enum ResolverBuildError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] bucketpop_config::ConfigError),
    /// HTTP client construction failed.
    #[error("http client build failed: {0}")]
    HttpClient(String),
}
