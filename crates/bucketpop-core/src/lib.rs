// crates/bucketpop-core/src/lib.rs
// ============================================================================
// Module: bucketpop Core
// Description: Shared data model and provider contract for bucketpop.
// Purpose: Define the bundle, provider, and connector surfaces used by resolvers.
// Dependencies: async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! `bucketpop-core` holds the types every resolution strategy shares: the
//! [`CredentialBundle`] describing how to reach a backing store, the
//! [`Provider`] capability contract consumed by the mail listener, the
//! in-memory [`PlaceholderProvider`], and the [`StoreConnector`] seam that
//! turns a bundle into a store-backed provider.
//! Invariants:
//! - Bundles are immutable once constructed and never print secrets.
//! - Message numbers are 1-based within a session view.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bundle;
pub mod placeholder;
pub mod provider;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bundle::CredentialBundle;
pub use placeholder::DEMO_EMAIL;
pub use placeholder::PlaceholderProvider;
pub use provider::Email;
pub use provider::EmailPayload;
pub use provider::MessageNumber;
pub use provider::Provider;
pub use provider::ProviderError;
pub use provider::StoreConnector;
