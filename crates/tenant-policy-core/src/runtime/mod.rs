// crates/tenant-policy-core/src/runtime/mod.rs
// ============================================================================
// Module: Tenant Policy Runtime
// Description: Reference resolution, validation, and the configuration store.
// Purpose: Implement the read and write paths over tenant configurations.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules turn stored id-form configurations into display form and
//! validated display-form configurations back into stored form.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod config_store;
pub mod resolver;
pub mod store;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config_store::Collaborators;
pub use config_store::DEFAULT_CONFIG_DESCRIPTION;
pub use config_store::TenantConfigStore;
pub use resolver::DirectorySnapshot;
pub use resolver::document_to_id_form;
pub use resolver::document_to_name_form;
pub use resolver::to_id_form;
pub use resolver::to_name_form;
pub use store::InMemoryEnvironmentDirectory;
pub use store::InMemoryPropertyStore;
pub use store::InMemoryTenantDirectory;
pub use validator::ConfigurationValidator;
pub use validator::check_references;
