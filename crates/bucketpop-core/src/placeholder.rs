// crates/bucketpop-core/src/placeholder.rs
// ============================================================================
// Module: Placeholder Provider
// Description: In-memory provider backed by no real store.
// Purpose: Serve the "no store" and "demo" resolution outcomes.
// Dependencies: async-trait
// ============================================================================

//! ## Overview
//! [`PlaceholderProvider`] serves a fixed in-memory message list. It is what a
//! resolver hands out when a login is valid but no backing store applies:
//! either an empty mailbox or a mailbox holding the single [`DEMO_EMAIL`].
//! Invariants:
//! - The message list is fixed at construction.
//! - Deletes of existing messages are acknowledged but never persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::Email;
use crate::EmailPayload;
use crate::MessageNumber;
use crate::Provider;
use crate::ProviderError;

// ============================================================================
// SECTION: Demo Message
// ============================================================================

/// Unique identifier reported for the demonstration message.
const DEMO_EMAIL_UID: &str = "bucketpop-demo-1";

/// Fixed demonstration message served by [`PlaceholderProvider::demo`].
pub const DEMO_EMAIL: &str = "From: bucketpop <demo@bucketpop.invalid>\r\n\
To: you <you@bucketpop.invalid>\r\n\
Subject: Welcome to bucketpop\r\n\
Date: Thu, 01 Jan 2026 00:00:00 +0000\r\n\
Message-ID: <bucketpop-demo-1@bucketpop.invalid>\r\n\
MIME-Version: 1.0\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
This mailbox is a demonstration.\r\n\
\r\n\
Objects stored in a bucket show up here as messages once your login\r\n\
token names a real store.\r\n";

// ============================================================================
// SECTION: Placeholder Provider
// ============================================================================

/// Message held by a placeholder provider.
#[derive(Debug, Clone)]
struct StoredMessage {
    /// Unique identifier.
    uid: String,
    /// Raw message bytes.
    body: Vec<u8>,
}

/// Provider serving a fixed in-memory message list.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderProvider {
    /// Messages in number order (index 0 is message 1).
    messages: Vec<StoredMessage>,
}

impl PlaceholderProvider {
    /// Creates a provider with no messages.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Creates a provider holding exactly the [`DEMO_EMAIL`] message.
    #[must_use]
    pub fn demo() -> Self {
        Self::with_messages([(DEMO_EMAIL_UID, DEMO_EMAIL.as_bytes().to_vec())])
    }

    /// Creates a provider from `(uid, body)` pairs numbered from 1.
    #[must_use]
    pub fn with_messages<I, U>(messages: I) -> Self
    where
        I: IntoIterator<Item = (U, Vec<u8>)>,
        U: Into<String>,
    {
        Self {
            messages: messages
                .into_iter()
                .map(|(uid, body)| StoredMessage {
                    uid: uid.into(),
                    body,
                })
                .collect(),
        }
    }

    /// Returns the stored message for `number` unless it is excluded.
    fn lookup(
        &self,
        number: MessageNumber,
        excluding: &[MessageNumber],
    ) -> Result<&StoredMessage, ProviderError> {
        if excluding.contains(&number) {
            return Err(ProviderError::NotFound(number));
        }
        number
            .checked_sub(1)
            .and_then(|index| self.messages.get(index))
            .ok_or(ProviderError::NotFound(number))
    }
}

/// Builds the listing entry for a stored message.
fn listing(number: MessageNumber, message: &StoredMessage) -> Email {
    Email {
        number,
        uid: message.uid.clone(),
        size: u64::try_from(message.body.len()).unwrap_or(u64::MAX),
    }
}

#[async_trait]
impl Provider for PlaceholderProvider {
    async fn list_emails(
        &self,
        excluding: &[MessageNumber],
    ) -> Result<BTreeMap<MessageNumber, Email>, ProviderError> {
        Ok(self
            .messages
            .iter()
            .enumerate()
            .map(|(index, message)| (index + 1, message))
            .filter(|(number, _)| !excluding.contains(number))
            .map(|(number, message)| (number, listing(number, message)))
            .collect())
    }

    async fn get_email(
        &self,
        number: MessageNumber,
        excluding: &[MessageNumber],
    ) -> Result<Email, ProviderError> {
        self.lookup(number, excluding).map(|message| listing(number, message))
    }

    async fn get_email_payload(
        &self,
        number: MessageNumber,
        excluding: &[MessageNumber],
    ) -> Result<EmailPayload, ProviderError> {
        self.lookup(number, excluding).map(|message| EmailPayload::new(message.body.clone()))
    }

    async fn delete_email(&self, number: MessageNumber) -> Result<(), ProviderError> {
        self.lookup(number, &[]).map(|_| ())
    }
}
