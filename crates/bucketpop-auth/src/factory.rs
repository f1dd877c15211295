// crates/bucketpop-auth/src/factory.rs
// ============================================================================
// Module: Resolver Factory
// Description: Builds the configured resolution strategy once at startup.
// Purpose: Give the listener one reusable resolver per deployment.
// Dependencies: bucketpop-config, bucketpop-core
// ============================================================================

//! ## Overview
//! The factory validates the resolver configuration and constructs exactly one
//! strategy. HTTP clients are created here; the Lambda client loads its SDK
//! configuration on the first invocation. Either is owned by the strategy for
//! its lifetime.

use std::sync::Arc;

use bucketpop_config::FunctionResolverConfig;
use bucketpop_config::ResolverConfig;
use bucketpop_core::StoreConnector;

use crate::FunctionInvoker;
use crate::FunctionResolver;
use crate::HttpResolver;
use crate::LambdaInvoker;
use crate::Resolver;
use crate::ResolverBuildError;
use crate::StaticResolver;
use crate::TokenResolver;

/// Builds the configured resolver, using Lambda for the function strategy.
///
/// # Errors
///
/// Returns [`ResolverBuildError`] when the configuration is invalid or a
/// client cannot be built.
pub fn build_resolver(
    config: &ResolverConfig,
    connector: Arc<dyn StoreConnector>,
) -> Result<Resolver, ResolverBuildError> {
    config.validate()?;
    build(config, connector, |function| -> Arc<dyn FunctionInvoker> {
        Arc::new(LambdaInvoker::new(function))
    })
}

/// Builds the configured resolver with an explicit function invoker.
///
/// The invoker is ignored by every strategy except the function strategy.
///
/// # Errors
///
/// Returns [`ResolverBuildError`] when the configuration is invalid or a
/// client cannot be built.
pub fn build_resolver_with_invoker(
    config: &ResolverConfig,
    connector: Arc<dyn StoreConnector>,
    invoker: Arc<dyn FunctionInvoker>,
) -> Result<Resolver, ResolverBuildError> {
    config.validate()?;
    build(config, connector, |_| invoker)
}

/// Constructs the strategy for validated `config`.
fn build(
    config: &ResolverConfig,
    connector: Arc<dyn StoreConnector>,
    invoker_for: impl FnOnce(&FunctionResolverConfig) -> Arc<dyn FunctionInvoker>,
) -> Result<Resolver, ResolverBuildError> {
    let resolver = match config {
        ResolverConfig::Static(static_config) => {
            Resolver::Static(StaticResolver::new(static_config.clone(), connector))
        }
        ResolverConfig::Token(token) => Resolver::Token(TokenResolver::new(token, connector)),
        ResolverConfig::Http(http) => Resolver::Http(HttpResolver::new(http, connector)?),
        ResolverConfig::Function(function) => {
            Resolver::Function(FunctionResolver::new(function, invoker_for(function), connector))
        }
    };
    tracing::debug!(strategy = config.mode_label(), "resolver built");
    Ok(resolver)
}
