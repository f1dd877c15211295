// crates/bucketpop-auth/src/lib.rs
// ============================================================================
// Module: bucketpop Auth Library
// Description: Provider-resolution strategies and the resolver factory.
// Purpose: Turn a mail login into a bound provider, fail-closed.
// Dependencies: bucketpop-core, bucketpop-config, jsonwebtoken, reqwest, aws-sdk-lambda
// ============================================================================

//! ## Overview
//! `bucketpop-auth` maps the (user, password) pair of a mail login to a
//! [`bucketpop_core::Provider`]. Four strategies are available and exactly one
//! is active per deployment:
//! - [`StaticResolver`]: one configured pair.
//! - [`TokenResolver`]: the password is an HMAC-signed token.
//! - [`HttpResolver`]: a remote HTTP authority answers Basic credentials.
//! - [`FunctionResolver`]: a remote function answers a JSON request.
//!
//! [`build_resolver`] constructs the configured strategy as a [`Resolver`].
//!
//! Security posture: all inputs are untrusted; any ambiguity refuses the
//! login and nothing falls back to another strategy.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod factory;
pub mod function;
pub mod http;
pub mod resolver;
pub mod security;
pub mod static_creds;
pub mod token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::FailureKind;
pub use error::ResolveError;
pub use error::ResolverBuildError;
pub use factory::build_resolver;
pub use factory::build_resolver_with_invoker;
pub use function::DelegatedRequest;
pub use function::DelegatedResponse;
pub use function::FunctionInvoker;
pub use function::FunctionResolver;
pub use function::LambdaInvoker;
pub use http::HttpResolver;
pub use resolver::Binding;
pub use resolver::LoginCredentials;
pub use resolver::ProviderResolver;
pub use resolver::Resolver;
pub use static_creds::StaticResolver;
pub use token::ProviderKind;
pub use token::TokenClaims;
pub use token::TokenResolver;
