// crates/tenant-policy-core/src/runtime/validator.rs
// ============================================================================
// Module: Configuration Validator
// Description: Write-path existence checks for name-form configurations.
// Purpose: Reject configurations that reference unknown tenants or environments.
// Dependencies: crate::{core, interfaces, runtime::resolver}
// ============================================================================

//! ## Overview
//! Validation resolves the tenant, then checks references in a fixed order:
//! base sync environment, base sync connect cluster, then the lists (topic
//! promotion, connector promotion, requestable topic, requestable connector,
//! requestable schema). The first failure is returned; lists are never
//! reordered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::Domain;
use crate::core::EnvironmentName;
use crate::core::NameFormConfiguration;
use crate::core::TenantConfigError;
use crate::core::TenantId;
use crate::interfaces::DirectoryError;
use crate::interfaces::EnvironmentDirectory;
use crate::interfaces::TenantDirectory;
use crate::runtime::resolver::DirectorySnapshot;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Existence validator over the tenant and environment directories.
#[derive(Clone)]
pub struct ConfigurationValidator {
    /// Tenant name lookup.
    tenants: Arc<dyn TenantDirectory>,
    /// Environment inventory.
    environments: Arc<dyn EnvironmentDirectory>,
}

impl ConfigurationValidator {
    /// Creates a validator over the given directories.
    #[must_use]
    pub fn new(
        tenants: Arc<dyn TenantDirectory>,
        environments: Arc<dyn EnvironmentDirectory>,
    ) -> Self {
        Self {
            tenants,
            environments,
        }
    }

    /// Validates a configuration and returns the tenant it belongs to.
    ///
    /// # Errors
    ///
    /// Returns the first failure in validation order.
    pub fn validate(&self, config: &NameFormConfiguration) -> Result<TenantId, TenantConfigError> {
        let (tenant_id, _) = self.validate_with_snapshot(config)?;
        Ok(tenant_id)
    }

    /// Validates a configuration and also returns the snapshot it was checked
    /// against, so callers can resolve with the same directory state.
    ///
    /// # Errors
    ///
    /// Returns the first failure in validation order.
    pub fn validate_with_snapshot(
        &self,
        config: &NameFormConfiguration,
    ) -> Result<(TenantId, DirectorySnapshot), TenantConfigError> {
        let tenant_id = self.resolve_tenant(&config.tenant_name)?;
        let snapshot = DirectorySnapshot::capture(self.environments.as_ref(), tenant_id)?;
        check_references(&snapshot, config)?;
        Ok((tenant_id, snapshot))
    }

    /// Resolves the tenant name through the tenant directory.
    fn resolve_tenant(&self, tenant_name: &str) -> Result<TenantId, TenantConfigError> {
        self.tenants.tenant_id_for_name(tenant_name).map_err(|err| match err {
            DirectoryError::NotFound(_) => {
                TenantConfigError::UnknownTenant(tenant_name.to_string())
            }
            DirectoryError::Unavailable(message) => {
                TenantConfigError::DirectoryUnavailable(message)
            }
        })
    }
}

/// Checks every reference of a configuration against a snapshot.
///
/// # Errors
///
/// Returns [`TenantConfigError::InvalidBaseSyncEnvironment`] or
/// [`TenantConfigError::UnknownResource`] for the first unknown reference.
pub fn check_references(
    snapshot: &DirectorySnapshot,
    config: &NameFormConfiguration,
) -> Result<(), TenantConfigError> {
    check_base_sync(snapshot, Domain::Messaging, config.base_sync_environment.as_ref())?;
    check_base_sync(snapshot, Domain::Connect, config.base_sync_connect_cluster.as_ref())?;
    let lists: [(Domain, &[EnvironmentName]); 5] = [
        (Domain::Messaging, &config.ordered_topic_promotion_envs),
        (Domain::Connect, &config.ordered_connector_promotion_envs),
        (Domain::Messaging, &config.requestable_topic_envs),
        (Domain::Connect, &config.requestable_connector_envs),
        (Domain::SchemaRegistry, &config.requestable_schema_envs),
    ];
    for (domain, names) in lists {
        if let Some(missing) =
            names.iter().find(|name| snapshot.id_for_name(domain, name).is_none())
        {
            return Err(TenantConfigError::UnknownResource(missing.to_string()));
        }
    }
    Ok(())
}

/// Checks an optional base sync reference.
fn check_base_sync(
    snapshot: &DirectorySnapshot,
    domain: Domain,
    name: Option<&EnvironmentName>,
) -> Result<(), TenantConfigError> {
    match name {
        Some(name) if snapshot.id_for_name(domain, name).is_none() => {
            Err(TenantConfigError::InvalidBaseSyncEnvironment(name.to_string()))
        }
        _ => Ok(()),
    }
}
