// crates/tenant-policy-core/src/runtime/config_store.rs
// ============================================================================
// Module: Tenant Configuration Store
// Description: Load-for-display and validated save of tenant configurations.
// Purpose: Orchestrate gates, validation, resolution, and persistence.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`TenantConfigStore`] owns the two paths over the stored configuration:
//! - Load: stored id form is resolved to name form. Any failure renders the
//!   default configuration instead of an error.
//! - Save: permission gate, key allow-list, validation, tenant match,
//!   resolution to id form, then a single property write. A failed save
//!   never touches the stored record.
//!
//! The store holds no locks. Concurrent saves are serialized by the property
//! store, which keeps the last write.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::AccessPolicy;
use crate::core::Capability;
use crate::core::IdFormDocument;
use crate::core::NameFormDocument;
use crate::core::Principal;
use crate::core::PropertyKey;
use crate::core::TenantConfigError;
use crate::core::TenantId;
use crate::interfaces::EntityType;
use crate::interfaces::EnvironmentDirectory;
use crate::interfaces::MetadataNotifier;
use crate::interfaces::MetadataOperation;
use crate::interfaces::PermissionChecker;
use crate::interfaces::PropertyStore;
use crate::interfaces::PropertyStoreError;
use crate::interfaces::StoredProperty;
use crate::interfaces::TenantDirectory;
use crate::runtime::resolver::DirectorySnapshot;
use crate::runtime::resolver::document_to_id_form;
use crate::runtime::resolver::document_to_name_form;
use crate::runtime::validator::ConfigurationValidator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Description written when the tenant configuration record is first created.
pub const DEFAULT_CONFIG_DESCRIPTION: &str = "Tenant environment policy configuration";

// ============================================================================
// SECTION: Collaborators
// ============================================================================

/// External collaborators consumed by the configuration store.
#[derive(Clone)]
pub struct Collaborators {
    /// Tenant id/name mapping.
    pub tenants: Arc<dyn TenantDirectory>,
    /// Environment inventory.
    pub environments: Arc<dyn EnvironmentDirectory>,
    /// Property persistence.
    pub properties: Arc<dyn PropertyStore>,
    /// Capability checks.
    pub permissions: Arc<dyn PermissionChecker>,
    /// Metadata change notifications.
    pub notifier: Arc<dyn MetadataNotifier>,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Tenant configuration load/save orchestrator.
#[derive(Clone)]
pub struct TenantConfigStore {
    /// External collaborators.
    collaborators: Collaborators,
    /// Reference validator.
    validator: ConfigurationValidator,
    /// Key allow-list.
    policy: AccessPolicy,
}

impl TenantConfigStore {
    /// Creates a store over the collaborators and access policy.
    #[must_use]
    pub fn new(collaborators: Collaborators, policy: AccessPolicy) -> Self {
        let validator = ConfigurationValidator::new(
            Arc::clone(&collaborators.tenants),
            Arc::clone(&collaborators.environments),
        );
        Self {
            collaborators,
            validator,
            policy,
        }
    }

    /// Returns the access policy.
    #[must_use]
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Returns the collaborators.
    #[must_use]
    pub const fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Loads the tenant configuration in display form.
    ///
    /// Absent records, malformed stored data, and directory failures all
    /// yield the default (empty) document.
    #[must_use]
    pub fn load_for_display(&self, tenant_id: TenantId) -> NameFormDocument {
        self.try_load_for_display(tenant_id).unwrap_or_default()
    }

    /// Loads the tenant configuration in display form, reporting failures.
    ///
    /// An absent record is not a failure and yields the default document.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError`] when the record cannot be read, parsed,
    /// or resolved.
    pub fn try_load_for_display(
        &self,
        tenant_id: TenantId,
    ) -> Result<NameFormDocument, TenantConfigError> {
        let Some(record) = self
            .collaborators
            .properties
            .read_property(tenant_id, &PropertyKey::tenant_config())?
        else {
            return Ok(NameFormDocument::default());
        };
        self.resolve_for_display(tenant_id, &record.value)
    }

    /// Resolves a stored id-form value to display form.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError`] when the value cannot be parsed or the
    /// directory cannot be read.
    pub fn resolve_for_display(
        &self,
        tenant_id: TenantId,
        stored_value: &str,
    ) -> Result<NameFormDocument, TenantConfigError> {
        let stored = IdFormDocument::from_json(stored_value)?;
        let snapshot =
            DirectorySnapshot::capture(self.collaborators.environments.as_ref(), tenant_id)?;
        Ok(document_to_name_form(&snapshot, &stored))
    }

    /// Validates and persists a display-form configuration for the tenant.
    ///
    /// # Errors
    ///
    /// Returns the first gate, validation, resolution, or persistence
    /// failure. Nothing is written when an error is returned.
    pub fn save(
        &self,
        tenant_id: TenantId,
        principal: &Principal,
        document: &NameFormDocument,
    ) -> Result<PropertyKey, TenantConfigError> {
        let key = PropertyKey::tenant_config();
        self.authorize(tenant_id, principal, &key)?;
        let Some(model) = document.tenant_model.as_ref() else {
            return Err(TenantConfigError::MalformedConfiguration(
                "tenantModel is required".to_string(),
            ));
        };
        let (config_tenant, snapshot) = self.validator.validate_with_snapshot(model)?;
        if config_tenant != tenant_id {
            return Err(TenantConfigError::TenantMismatch {
                expected: tenant_id,
                actual: config_tenant,
            });
        }
        let stored = document_to_id_form(&snapshot, document)?;
        let value = stored.to_canonical_json()?;
        self.persist(tenant_id, &key, value, DEFAULT_CONFIG_DESCRIPTION)?;
        Ok(key)
    }

    /// Persists a raw property value for any key other than the tenant
    /// configuration key.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError::NotAuthorized`] when a gate rejects the
    /// caller, [`TenantConfigError::MalformedConfiguration`] for the reserved
    /// key, and [`TenantConfigError::PersistenceFailure`] when the write fails.
    pub fn save_property(
        &self,
        tenant_id: TenantId,
        principal: &Principal,
        key: &PropertyKey,
        value: &str,
    ) -> Result<PropertyKey, TenantConfigError> {
        self.authorize(tenant_id, principal, key)?;
        if key.is_tenant_config() {
            return Err(TenantConfigError::MalformedConfiguration(
                "tenant configuration must be saved as a configuration document".to_string(),
            ));
        }
        self.persist(tenant_id, key, value.to_string(), "")?;
        Ok(key.clone())
    }

    /// Applies the permission gate and the key allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError::NotAuthorized`] when either gate rejects.
    pub fn authorize(
        &self,
        tenant_id: TenantId,
        principal: &Principal,
        key: &PropertyKey,
    ) -> Result<(), TenantConfigError> {
        if !self
            .collaborators
            .permissions
            .is_authorized(principal, Capability::ManageServerConfiguration)
        {
            return Err(TenantConfigError::NotAuthorized);
        }
        if !self.policy.may_edit(tenant_id, key) {
            return Err(TenantConfigError::NotAuthorized);
        }
        Ok(())
    }

    /// Writes the record, keeping an existing description, then notifies.
    ///
    /// An existing row that fails integrity checks is overwritten with the
    /// default description.
    fn persist(
        &self,
        tenant_id: TenantId,
        key: &PropertyKey,
        value: String,
        default_description: &str,
    ) -> Result<(), TenantConfigError> {
        let properties = &self.collaborators.properties;
        let existing = match properties.read_property(tenant_id, key) {
            Ok(existing) => existing,
            Err(PropertyStoreError::Corrupt(_) | PropertyStoreError::Invalid(_)) => None,
            Err(err) => return Err(err.into()),
        };
        let description = existing
            .map_or_else(|| default_description.to_string(), |existing| existing.description);
        properties.write_property(
            tenant_id,
            &StoredProperty {
                key: key.clone(),
                value,
                description,
            },
        )?;
        self.collaborators.notifier.notify_metadata_changed(
            tenant_id,
            EntityType::Properties,
            MetadataOperation::Create,
        );
        Ok(())
    }
}
