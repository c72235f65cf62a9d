// crates/tenant-policy-core/src/core/mod.rs
// ============================================================================
// Module: Tenant Policy Core Types
// Description: Identifiers, environments, configurations, and errors.
// Purpose: Group the data model shared by every tenant policy crate.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Data model for tenant configurations and the directories they reference.

pub mod access;
pub mod configuration;
pub mod environment;
pub mod error;
pub mod hashing;
pub mod identifiers;

pub use access::AccessPolicy;
pub use access::Capability;
pub use access::Principal;
pub use configuration::ById;
pub use configuration::ByName;
pub use configuration::FormKind;
pub use configuration::IdFormConfiguration;
pub use configuration::IdFormDocument;
pub use configuration::NameFormConfiguration;
pub use configuration::NameFormDocument;
pub use configuration::ReferenceForm;
pub use configuration::TenantConfigDocument;
pub use configuration::TenantConfiguration;
pub use environment::Domain;
pub use environment::Environment;
pub use environment::Tenant;
pub use error::TenantConfigError;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use hashing::canonical_json_bytes;
pub use hashing::hash_bytes;
pub use identifiers::DEFAULT_TENANT_ID;
pub use identifiers::EnvironmentId;
pub use identifiers::EnvironmentName;
pub use identifiers::PropertyKey;
pub use identifiers::TENANT_CONFIG_PROPERTY;
pub use identifiers::TenantId;
