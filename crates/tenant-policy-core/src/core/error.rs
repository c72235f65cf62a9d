// crates/tenant-policy-core/src/core/error.rs
// ============================================================================
// Module: Tenant Configuration Errors
// Description: Error taxonomy for resolution, validation, and persistence.
// Purpose: Provide stable, caller-facing failure reasons.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every failure the configuration engine can report. Display strings are the
//! messages surfaced to administrators, so they name the offending value.

use thiserror::Error;

use crate::core::identifiers::TenantId;

/// Tenant configuration failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling and audit labeling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantConfigError {
    /// The configuration names a tenant the directory does not know.
    #[error("unknown tenant: {0}")]
    UnknownTenant(String),
    /// A listed environment does not exist in the matching domain.
    #[error("environment {0} does not exist for this tenant")]
    UnknownResource(String),
    /// A base sync reference does not exist in the matching domain.
    #[error("invalid base sync environment: {0}")]
    InvalidBaseSyncEnvironment(String),
    /// The configuration belongs to a different tenant than the caller.
    #[error("configuration tenant {actual} does not match caller tenant {expected}")]
    TenantMismatch {
        /// Tenant of the caller.
        expected: TenantId,
        /// Tenant named by the configuration.
        actual: TenantId,
    },
    /// Caller lacks the capability or the key is not editable by the tenant.
    #[error("not authorized")]
    NotAuthorized,
    /// The configuration document could not be parsed or serialized.
    #[error("malformed configuration: {0}")]
    MalformedConfiguration(String),
    /// The environment or tenant directory could not be read.
    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),
    /// The property store rejected the write or read.
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl TenantConfigError {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTenant(_) => "unknown_tenant",
            Self::UnknownResource(_) => "unknown_resource",
            Self::InvalidBaseSyncEnvironment(_) => "invalid_base_sync_environment",
            Self::TenantMismatch {
                ..
            } => "tenant_mismatch",
            Self::NotAuthorized => "not_authorized",
            Self::MalformedConfiguration(_) => "malformed_configuration",
            Self::DirectoryUnavailable(_) => "directory_unavailable",
            Self::PersistenceFailure(_) => "persistence_failure",
        }
    }

    /// Returns true when the failure is caused by caller input and should be
    /// surfaced verbatim.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        !matches!(self, Self::DirectoryUnavailable(_) | Self::PersistenceFailure(_))
    }
}
