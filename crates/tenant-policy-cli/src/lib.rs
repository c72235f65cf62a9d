// crates/tenant-policy-cli/src/lib.rs
// ============================================================================
// Module: Tenant Policy CLI Library
// Description: Shared helpers for the tenant policy command-line interface.
// Purpose: Provide the message catalog for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses the CLI message catalog. The binary entry point
//! (`src/main.rs`) routes every user-facing string through [`t!`] so output
//! stays consistent across commands.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and formatting helpers.
pub mod i18n;
