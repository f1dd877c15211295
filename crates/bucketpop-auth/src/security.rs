// crates/bucketpop-auth/src/security.rs
// ============================================================================
// Module: Credential Comparison
// Description: Constant-time comparison utilities for login secrets.
// Purpose: Keep static credential checks free of early-exit timing signals.
// Dependencies: subtle
// ============================================================================

//! ## Overview
//! Equality helpers used when a submitted user/password pair is checked
//! against configured values.
//!
//! Security posture: both fields are always compared so the response time
//! does not reveal which field was wrong.

use subtle::Choice;
use subtle::ConstantTimeEq;

// ============================================================================
// SECTION: Constant-Time Comparisons
// ============================================================================

/// Compares two strings in constant time.
///
/// Lengths are not hidden; contents are.
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    ct_eq(a, b).into()
}

/// Compares a submitted pair against an expected pair, evaluating both fields.
#[must_use]
pub fn credentials_match(
    user: &str,
    password: &str,
    expected_user: &str,
    expected_password: &str,
) -> bool {
    (ct_eq(user, expected_user) & ct_eq(password, expected_password)).into()
}

/// Constant-time byte equality as a [`Choice`].
fn ct_eq(a: &str, b: &str) -> Choice {
    a.as_bytes().ct_eq(b.as_bytes())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
