// crates/bucketpop-core/tests/placeholder_provider.rs
// ============================================================================
// Module: Placeholder Provider Tests
// Description: Behavior of the in-memory provider used for none/demo logins.
// Purpose: Validate numbering, exclusion handling, and delete semantics.
// ============================================================================

//! ## Overview
//! Exercises [`PlaceholderProvider`] through the [`Provider`] contract the
//! mail listener uses.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only panic-based assertions are permitted."
)]

use bucketpop_core::DEMO_EMAIL;
use bucketpop_core::PlaceholderProvider;
use bucketpop_core::Provider;
use bucketpop_core::ProviderError;

// ============================================================================
// SECTION: Listing
// ============================================================================

#[tokio::test]
async fn empty_provider_lists_nothing() {
    let provider = PlaceholderProvider::empty();
    let listing = provider.list_emails(&[]).await.unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn demo_provider_lists_exactly_one_message() {
    let provider = PlaceholderProvider::demo();
    let listing = provider.list_emails(&[]).await.unwrap();
    assert_eq!(listing.len(), 1);
    let email = listing.get(&1).expect("message 1");
    assert_eq!(email.number, 1);
    assert_eq!(email.size, u64::try_from(DEMO_EMAIL.len()).unwrap());
}

#[tokio::test]
async fn listing_omits_excluded_numbers_and_keeps_numbering() {
    let provider = PlaceholderProvider::with_messages([
        ("a", b"first".to_vec()),
        ("b", b"second".to_vec()),
        ("c", b"third".to_vec()),
    ]);
    let listing = provider.list_emails(&[2]).await.unwrap();
    let numbers: Vec<usize> = listing.keys().copied().collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(listing[&3].uid, "c");
}

// ============================================================================
// SECTION: Retrieval
// ============================================================================

#[tokio::test]
async fn demo_payload_is_the_fixed_message() {
    let provider = PlaceholderProvider::demo();
    let payload = provider.get_email_payload(1, &[]).await.unwrap();
    assert_eq!(payload.as_bytes(), DEMO_EMAIL.as_bytes());
}

#[tokio::test]
async fn get_rejects_zero_out_of_range_and_excluded_numbers() {
    let provider = PlaceholderProvider::demo();
    assert!(matches!(provider.get_email(0, &[]).await, Err(ProviderError::NotFound(0))));
    assert!(matches!(provider.get_email(2, &[]).await, Err(ProviderError::NotFound(2))));
    assert!(matches!(provider.get_email_payload(1, &[1]).await, Err(ProviderError::NotFound(1))));
}

// ============================================================================
// SECTION: Deletes
// ============================================================================

#[tokio::test]
async fn delete_is_acknowledged_but_not_persisted() {
    let provider = PlaceholderProvider::demo();
    provider.delete_email(1).await.unwrap();
    assert_eq!(provider.list_emails(&[]).await.unwrap().len(), 1);
    assert!(matches!(provider.delete_email(5).await, Err(ProviderError::NotFound(5))));
}
