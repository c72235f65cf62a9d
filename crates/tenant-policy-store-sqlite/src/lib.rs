// crates/tenant-policy-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Property Store
// Description: Durable PropertyStore backend using SQLite WAL.
// Purpose: Persist tenant properties and configurations across restarts.
// Dependencies: tenant-policy-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`tenant_policy_core::PropertyStore`]
//! implementation. Each row carries a digest of its value; reads verify the
//! digest and fail closed on mismatch.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_VALUE_BYTES;
pub use store::SqlitePropertyStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
