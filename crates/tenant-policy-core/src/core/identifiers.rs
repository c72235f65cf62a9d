// crates/tenant-policy-core/src/core/identifiers.rs
// ============================================================================
// Module: Tenant Policy Identifiers
// Description: Canonical identifiers for tenants, environments, and properties.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque and serialize transparently on the wire. Environment
//! identifiers and environment names are distinct types so that a reference in
//! one form can never be mistaken for the other.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Tenant Identifiers
// ============================================================================

/// Tenant identifier.
///
/// # Invariants
/// - Opaque integer; tenants are owned by the tenant directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(u32);

impl TenantId {
    /// Creates a new tenant identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Well-known identifier of the default (super-admin) tenant.
pub const DEFAULT_TENANT_ID: TenantId = TenantId::new(101);

// ============================================================================
// SECTION: Environment References
// ============================================================================

/// Stable environment identifier.
///
/// # Invariants
/// - Never changes for the lifetime of the environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentId(String);

impl EnvironmentId {
    /// Creates a new environment identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EnvironmentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Human-readable environment name.
///
/// # Invariants
/// - Unique per tenant and domain at any point in time; may change over time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Creates a new environment name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EnvironmentName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Property Keys
// ============================================================================

/// Key of a stored tenant property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey(String);

impl PropertyKey {
    /// Creates a new property key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the reserved key holding the tenant configuration document.
    #[must_use]
    pub fn tenant_config() -> Self {
        Self::new(TENANT_CONFIG_PROPERTY)
    }

    /// Returns true when this is the reserved tenant configuration key.
    #[must_use]
    pub fn is_tenant_config(&self) -> bool {
        self.0 == TENANT_CONFIG_PROPERTY
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PropertyKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Reserved property key for the tenant configuration document.
pub const TENANT_CONFIG_PROPERTY: &str = "governance.tenant.config";
