// crates/bucketpop-config/tests/common/mod.rs
// ============================================================================
// Module: Config Test Helpers
// Description: Shared assertions for bucketpop-config integration tests.
// ============================================================================

//! Shared helpers for config validation tests.

#![allow(dead_code, reason = "Not every test binary uses every helper.")]

use bucketpop_config::AuthConfig;
use bucketpop_config::ConfigError;

/// Result type for fallible tests.
pub type TestResult = Result<(), String>;

/// Asserts the result is an error whose message contains `needle`.
pub fn assert_invalid(result: Result<AuthConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

/// Parses `content`, mapping errors to strings.
pub fn parse_ok(content: &str) -> Result<AuthConfig, String> {
    AuthConfig::parse(content).map_err(|err| err.to_string())
}
