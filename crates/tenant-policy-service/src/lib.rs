// crates/tenant-policy-service/src/lib.rs
// ============================================================================
// Module: Tenant Policy Service
// Description: Server configuration operations over the tenant policy core.
// Purpose: Expose editable configuration listing, updates, and server properties.
// Dependencies: tenant-policy-core, tenant-policy-config, serde
// ============================================================================

//! ## Overview
//! The service layer wraps [`tenant_policy_core::TenantConfigStore`] with the
//! caller-facing operations: listing a tenant's editable properties, applying
//! an update with a structured outcome, and reading the masked server
//! property snapshot. Every update outcome is written to an audit sink.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod permissions;
pub mod properties;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ConfigAuditEvent;
pub use audit::ConfigAuditEventParams;
pub use audit::ConfigAuditOutcome;
pub use audit::ConfigAuditSink;
pub use audit::ConfigFileAuditSink;
pub use audit::ConfigNoopAuditSink;
pub use audit::ConfigStderrAuditSink;
pub use permissions::StaticPermissionChecker;
pub use properties::MASKED_VALUE;
pub use properties::ServerProperty;
pub use properties::ServerPropertyHandle;
pub use properties::ServerPropertySnapshot;
pub use properties::WRAP_WIDTH;
pub use service::EditableProperty;
pub use service::FAILURE_MESSAGE;
pub use service::NOT_AUTHORIZED_MESSAGE;
pub use service::SUCCESS_MESSAGE;
pub use service::ServerConfigService;
pub use service::ServiceError;
pub use service::UpdateOutcome;
