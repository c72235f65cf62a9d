// crates/tenant-policy-core/src/lib.rs
// ============================================================================
// Module: Tenant Policy Core Library
// Description: Public API surface for tenant configuration governance.
// Purpose: Expose the data model, collaborator interfaces, and runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Tenant policy core stores each tenant's environment policy (promotion
//! pipelines, requestable environments, base sync targets) keyed by stable
//! environment identifiers, and presents the same policy keyed by current
//! environment names. Reads tolerate directory drift; writes reject it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::DirectoryError;
pub use interfaces::EntityType;
pub use interfaces::EnvironmentDirectory;
pub use interfaces::ListedProperty;
pub use interfaces::MetadataNotifier;
pub use interfaces::MetadataOperation;
pub use interfaces::NoopMetadataNotifier;
pub use interfaces::PermissionChecker;
pub use interfaces::PropertyStore;
pub use interfaces::PropertyStoreError;
pub use interfaces::StoredProperty;
pub use interfaces::TenantDirectory;
pub use runtime::Collaborators;
pub use runtime::ConfigurationValidator;
pub use runtime::DEFAULT_CONFIG_DESCRIPTION;
pub use runtime::DirectorySnapshot;
pub use runtime::InMemoryEnvironmentDirectory;
pub use runtime::InMemoryPropertyStore;
pub use runtime::InMemoryTenantDirectory;
pub use runtime::TenantConfigStore;
