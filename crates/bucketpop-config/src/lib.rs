// crates/bucketpop-config/src/lib.rs
// ============================================================================
// Module: bucketpop Config Library
// Description: Resolver configuration model and validation.
// Purpose: Single source of truth for bucketpop.toml semantics.
// Dependencies: bucketpop-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `bucketpop-config` defines which provider-resolution strategy a deployment
//! runs and with what parameters. Loading is bounded and validation is
//! fail-closed: a config that parses but names an unusable authority is
//! rejected before any resolver is built.
//!
//! Security posture: config files carry secrets; `Debug` output redacts them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
