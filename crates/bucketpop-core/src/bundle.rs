// crates/bucketpop-core/src/bundle.rs
// ============================================================================
// Module: Credential Bundle
// Description: Addressing and credential data for a backing object store.
// Purpose: Carry store coordinates from a resolver to the store connector.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`CredentialBundle`] names the keys, region, bucket, and key prefix of a
//! backing store. Every field is optional and an absent field is the empty
//! string, so an empty bundle is valid and means "no backing store".
//! Security posture: bundles arrive from untrusted tokens and remote
//! authorities; `Debug` redacts secret material.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

// ============================================================================
// SECTION: Credential Bundle
// ============================================================================

/// Store coordinates and credentials handed to a [`crate::StoreConnector`].
///
/// # Invariants
/// - Absent and `null` fields decode to the empty string.
/// - Key fields also accept the capitalized `AWS*` spelling some authorities emit.
/// - Empty fields are omitted when serialized.
/// - `Debug` never prints `secret_access_key` or `session_token`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialBundle {
    /// Access key identifier.
    #[serde(
        rename = "awsAccessKeyID",
        alias = "AWSAccessKeyID",
        alias = "access_key_id",
        deserialize_with = "nullable_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub access_key_id: String,
    /// Secret access key.
    #[serde(
        rename = "awsSecretAccessKey",
        alias = "AWSSecretAccessKey",
        alias = "secret_access_key",
        deserialize_with = "nullable_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub secret_access_key: String,
    /// Temporary session token.
    #[serde(
        rename = "awsSessionToken",
        alias = "AWSSessionToken",
        alias = "session_token",
        deserialize_with = "nullable_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub session_token: String,
    /// Store region.
    #[serde(deserialize_with = "nullable_string", skip_serializing_if = "String::is_empty")]
    pub region: String,
    /// Bucket name.
    #[serde(deserialize_with = "nullable_string", skip_serializing_if = "String::is_empty")]
    pub bucket: String,
    /// Key prefix messages are listed under.
    #[serde(deserialize_with = "nullable_string", skip_serializing_if = "String::is_empty")]
    pub prefix: String,
}

impl CredentialBundle {
    /// Creates a bundle addressing `bucket` with every other field empty.
    #[must_use]
    pub fn for_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Returns true when every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_empty()
            && self.secret_access_key.is_empty()
            && self.session_token.is_empty()
            && self.region.is_empty()
            && self.bucket.is_empty()
            && self.prefix.is_empty()
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .field("session_token", &redacted(&self.session_token))
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Marker printed in place of secret values.
fn redacted(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "<redacted>" }
}

/// Decodes a string field, mapping `null` to the empty string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
