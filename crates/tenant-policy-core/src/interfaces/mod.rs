// crates/tenant-policy-core/src/interfaces/mod.rs
// ============================================================================
// Module: Tenant Policy Interfaces
// Description: Contracts for directories, property storage, and permissions.
// Purpose: Define the collaborator seams consumed by the configuration engine.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The configuration engine never owns environments, tenants, or storage. It
//! reads them through the traits defined here. Implementations may be stale
//! between calls but must be internally consistent for the duration of one
//! call; the engine reads each directory once per resolve or validate pass.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::Capability;
use crate::core::Domain;
use crate::core::Environment;
use crate::core::EnvironmentId;
use crate::core::EnvironmentName;
use crate::core::Principal;
use crate::core::PropertyKey;
use crate::core::TenantConfigError;
use crate::core::TenantId;

// ============================================================================
// SECTION: Directories
// ============================================================================

/// Directory lookup failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// No entry matches the lookup.
    #[error("not found: {0}")]
    NotFound(String),
    /// The directory could not be read.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for TenantConfigError {
    fn from(error: DirectoryError) -> Self {
        match error {
            DirectoryError::NotFound(name) => Self::UnknownTenant(name),
            DirectoryError::Unavailable(message) => Self::DirectoryUnavailable(message),
        }
    }
}

/// Per-tenant, per-domain environment inventory.
pub trait EnvironmentDirectory: Send + Sync {
    /// Lists every environment of the tenant in the domain.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the directory cannot be read.
    fn list_environments(
        &self,
        tenant_id: TenantId,
        domain: Domain,
    ) -> Result<Vec<Environment>, DirectoryError>;

    /// Finds an environment by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the directory cannot be read.
    fn find_environment_by_id(
        &self,
        tenant_id: TenantId,
        domain: Domain,
        id: &EnvironmentId,
    ) -> Result<Option<Environment>, DirectoryError> {
        Ok(self.list_environments(tenant_id, domain)?.into_iter().find(|env| &env.id == id))
    }

    /// Finds an environment by its current name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the directory cannot be read.
    fn find_environment_by_name(
        &self,
        tenant_id: TenantId,
        domain: Domain,
        name: &EnvironmentName,
    ) -> Result<Option<Environment>, DirectoryError> {
        Ok(self
            .list_environments(tenant_id, domain)?
            .into_iter()
            .find(|env| &env.name == name && env.tenant_id == tenant_id))
    }
}

/// Tenant id/name mapping.
pub trait TenantDirectory: Send + Sync {
    /// Resolves a tenant name to its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when no tenant has the name.
    fn tenant_id_for_name(&self, name: &str) -> Result<TenantId, DirectoryError>;

    /// Resolves a tenant identifier to its name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when the tenant does not exist.
    fn tenant_name_for_id(&self, tenant_id: TenantId) -> Result<String, DirectoryError>;
}

// ============================================================================
// SECTION: Property Store
// ============================================================================

/// Stored property record, one per tenant and key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProperty {
    /// Property key.
    pub key: PropertyKey,
    /// Raw stored value (id-form JSON for the tenant configuration key).
    pub value: String,
    /// Human-readable description.
    pub description: String,
}

/// Listed property record whose value is checked row by row.
///
/// # Invariants
/// - `key` and `description` are always present; only `value` can fail
///   integrity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedProperty {
    /// Property key.
    pub key: PropertyKey,
    /// Human-readable description.
    pub description: String,
    /// Stored value, or the integrity failure for this row.
    pub value: Result<String, PropertyStoreError>,
}

impl ListedProperty {
    /// Wraps a verified record.
    #[must_use]
    pub fn verified(property: StoredProperty) -> Self {
        Self {
            key: property.key,
            description: property.description,
            value: Ok(property.value),
        }
    }

    /// Converts back into a stored record.
    ///
    /// # Errors
    ///
    /// Returns the row's [`PropertyStoreError`] when its value is unreadable.
    pub fn into_stored(self) -> Result<StoredProperty, PropertyStoreError> {
        Ok(StoredProperty {
            key: self.key,
            value: self.value?,
            description: self.description,
        })
    }
}

/// Property store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyStoreError {
    /// Store I/O error.
    #[error("property store io error: {0}")]
    Io(String),
    /// Stored data fails integrity checks.
    #[error("property store corruption: {0}")]
    Corrupt(String),
    /// Stored or submitted data is invalid.
    #[error("property store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("property store error: {0}")]
    Store(String),
}

impl From<PropertyStoreError> for TenantConfigError {
    fn from(error: PropertyStoreError) -> Self {
        Self::PersistenceFailure(error.to_string())
    }
}

/// Durable per-tenant property storage.
///
/// # Invariants
/// - Each write replaces the whole record atomically (last writer wins).
pub trait PropertyStore: Send + Sync {
    /// Reads a property for the tenant.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError`] when the read fails.
    fn read_property(
        &self,
        tenant_id: TenantId,
        key: &PropertyKey,
    ) -> Result<Option<StoredProperty>, PropertyStoreError>;

    /// Creates or overwrites a property for the tenant.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError`] when the write fails.
    fn write_property(
        &self,
        tenant_id: TenantId,
        property: &StoredProperty,
    ) -> Result<(), PropertyStoreError>;

    /// Lists every property of the tenant ordered by key.
    ///
    /// A row that fails integrity checks is listed with its error in
    /// [`ListedProperty::value`] and does not fail the listing.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError`] when the store cannot be read at all.
    fn list_properties(&self, tenant_id: TenantId)
    -> Result<Vec<ListedProperty>, PropertyStoreError>;

    /// Reports store readiness.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyStoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), PropertyStoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Permissions
// ============================================================================

/// Capability check for principals.
pub trait PermissionChecker: Send + Sync {
    /// Returns true when the principal holds the capability.
    fn is_authorized(&self, principal: &Principal, capability: Capability) -> bool;
}

// ============================================================================
// SECTION: Metadata Notifications
// ============================================================================

/// Entity kind named in metadata change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Tenant properties, including the tenant configuration.
    Properties,
}

/// Operation named in metadata change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataOperation {
    /// A record was created or overwritten.
    Create,
}

/// Fire-and-forget cache invalidation hook.
pub trait MetadataNotifier: Send + Sync {
    /// Signals that tenant metadata changed.
    fn notify_metadata_changed(
        &self,
        tenant_id: TenantId,
        entity: EntityType,
        operation: MetadataOperation,
    );
}

/// Notifier that discards every notification.
pub struct NoopMetadataNotifier;

impl MetadataNotifier for NoopMetadataNotifier {
    fn notify_metadata_changed(
        &self,
        _tenant_id: TenantId,
        _entity: EntityType,
        _operation: MetadataOperation,
    ) {
    }
}
