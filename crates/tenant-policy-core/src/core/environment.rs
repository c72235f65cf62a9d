// crates/tenant-policy-core/src/core/environment.rs
// ============================================================================
// Module: Environment Model
// Description: Environments, resource domains, and tenants.
// Purpose: Describe the directory entries that configuration references point at.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Environments belong to exactly one tenant and one resource domain. The
//! directory owns them; this crate only reads them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::EnvironmentId;
use crate::core::identifiers::EnvironmentName;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Domain
// ============================================================================

/// Resource domain an environment belongs to.
///
/// # Invariants
/// - Variants are stable for storage and audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Message-broker (Kafka) environments.
    Messaging,
    /// Connector-cluster (Kafka Connect) environments.
    Connect,
    /// Schema-registry environments.
    SchemaRegistry,
}

impl Domain {
    /// All domains in a fixed order.
    pub const ALL: [Self; 3] = [Self::Messaging, Self::Connect, Self::SchemaRegistry];

    /// Returns a stable label for the domain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Messaging => "messaging",
            Self::Connect => "connect",
            Self::SchemaRegistry => "schema_registry",
        }
    }
}

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Directory entry for a single environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Stable identifier.
    pub id: EnvironmentId,
    /// Current display name.
    pub name: EnvironmentName,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Resource domain.
    pub domain: Domain,
}

impl Environment {
    /// Builds an environment entry.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        domain: Domain,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: EnvironmentId::new(id),
            name: EnvironmentName::new(name),
            tenant_id,
            domain,
        }
    }
}

// ============================================================================
// SECTION: Tenant
// ============================================================================

/// Tenant directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant identifier.
    pub id: TenantId,
    /// Tenant name.
    pub name: String,
}
