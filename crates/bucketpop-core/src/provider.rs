// crates/bucketpop-core/src/provider.rs
// ============================================================================
// Module: Provider Contract
// Description: Message provider capability and store connector seam.
// Purpose: Give the mail listener one interface over every backing store.
// Dependencies: async-trait, thiserror
// ============================================================================

//! ## Overview
//! A [`Provider`] exposes list/get/delete operations over a numbered set of
//! messages. Numbers are 1-based within the current session view, and every
//! read accepts a set of numbers to exclude (messages already marked deleted
//! by the session). Store-backed providers are created through a
//! [`StoreConnector`], which lives outside this layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::CredentialBundle;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// 1-based message number within a session view.
pub type MessageNumber = usize;

/// Listing entry for a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// 1-based message number.
    pub number: MessageNumber,
    /// Stable unique identifier (reported by `UIDL`).
    pub uid: String,
    /// Message size in bytes.
    pub size: u64,
}

/// Raw RFC 5322 message bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPayload(Vec<u8>);

impl EmailPayload {
    /// Wraps raw message bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the message bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the payload and returns the message bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the payload has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Provider failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Message number is outside the view or excluded.
    #[error("message {0} not found")]
    NotFound(MessageNumber),
    /// The bundle cannot address a store.
    #[error("invalid store bundle: {0}")]
    InvalidBundle(String),
    /// Backing store reported an error.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Provider Trait
// ============================================================================

/// Message provider bound to one backing store.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Lists messages keyed by number, omitting `excluding`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the store cannot be listed.
    async fn list_emails(
        &self,
        excluding: &[MessageNumber],
    ) -> Result<BTreeMap<MessageNumber, Email>, ProviderError>;

    /// Returns the listing entry for one message.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when the number is unknown or excluded.
    async fn get_email(
        &self,
        number: MessageNumber,
        excluding: &[MessageNumber],
    ) -> Result<Email, ProviderError>;

    /// Returns the raw bytes of one message.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when the number is unknown or excluded.
    async fn get_email_payload(
        &self,
        number: MessageNumber,
        excluding: &[MessageNumber],
    ) -> Result<EmailPayload, ProviderError>;

    /// Deletes one message from the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the message is unknown or cannot be removed.
    async fn delete_email(&self, number: MessageNumber) -> Result<(), ProviderError>;
}

// ============================================================================
// SECTION: Store Connector
// ============================================================================

/// Builds store-backed providers from credential bundles.
pub trait StoreConnector: Send + Sync {
    /// Binds a provider to the store addressed by `bundle`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the bundle cannot address a store.
    fn connect(&self, bundle: CredentialBundle) -> Result<Box<dyn Provider>, ProviderError>;
}
