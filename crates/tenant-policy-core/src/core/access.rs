// crates/tenant-policy-core/src/core/access.rs
// ============================================================================
// Module: Access Model
// Description: Principals, capabilities, and the per-tenant key allow-list.
// Purpose: Gate configuration reads and writes before any validation runs.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Mutations require the [`Capability::ManageServerConfiguration`] capability.
//! The default tenant may edit every property key; other tenants may only
//! touch the keys on the admin allow-list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::DEFAULT_TENANT_ID;
use crate::core::identifiers::PropertyKey;
use crate::core::identifiers::TENANT_CONFIG_PROPERTY;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Principals
// ============================================================================

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal {
    /// Subject identifier (user name or token fingerprint).
    pub subject: String,
}

impl Principal {
    /// Creates a principal for the given subject.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Capability checked by the permission gate.
///
/// # Invariants
/// - Variants are stable for configuration and audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read and update server and tenant configuration.
    ManageServerConfiguration,
}

impl Capability {
    /// Returns a stable label for the capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageServerConfiguration => "manage_server_configuration",
        }
    }
}

// ============================================================================
// SECTION: Access Policy
// ============================================================================

/// Key allow-list applied to non-default tenants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Tenant allowed to edit every key.
    default_tenant: TenantId,
    /// Keys editable by non-default tenants.
    admin_editable_keys: BTreeSet<String>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_ID, [TENANT_CONFIG_PROPERTY.to_string()])
    }
}

impl AccessPolicy {
    /// Builds a policy from the default tenant and the admin allow-list.
    #[must_use]
    pub fn new(default_tenant: TenantId, keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            default_tenant,
            admin_editable_keys: keys.into_iter().collect(),
        }
    }

    /// Returns the default tenant.
    #[must_use]
    pub const fn default_tenant(&self) -> TenantId {
        self.default_tenant
    }

    /// Returns true when the tenant is the default tenant.
    #[must_use]
    pub fn is_default_tenant(&self, tenant_id: TenantId) -> bool {
        tenant_id == self.default_tenant
    }

    /// Returns true when the tenant may view or edit the key.
    #[must_use]
    pub fn may_edit(&self, tenant_id: TenantId, key: &PropertyKey) -> bool {
        self.is_default_tenant(tenant_id) || self.admin_editable_keys.contains(key.as_str())
    }
}
