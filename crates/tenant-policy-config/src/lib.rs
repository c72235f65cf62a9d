// crates/tenant-policy-config/src/lib.rs
// ============================================================================
// Module: Tenant Policy Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for tenant-policy.toml semantics.
// Dependencies: tenant-policy-core, serde, toml
// ============================================================================

//! ## Overview
//! `tenant-policy-config` defines the configuration model for tenant policy
//! services and provides strict, fail-closed validation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
