// crates/tenant-policy-core/src/runtime/store.rs
// ============================================================================
// Module: Tenant Policy In-Memory Backends
// Description: In-memory directories and property store.
// Purpose: Provide deterministic collaborators for tests and standalone use.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! In-memory implementations of the directory and property store traits.
//! Each backend clones cheaply and shares state, so tests can mutate the
//! directory (rename, remove) while a store holds another handle to it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::Domain;
use crate::core::Environment;
use crate::core::EnvironmentId;
use crate::core::EnvironmentName;
use crate::core::PropertyKey;
use crate::core::Tenant;
use crate::core::TenantId;
use crate::interfaces::DirectoryError;
use crate::interfaces::EnvironmentDirectory;
use crate::interfaces::ListedProperty;
use crate::interfaces::PropertyStore;
use crate::interfaces::PropertyStoreError;
use crate::interfaces::StoredProperty;
use crate::interfaces::TenantDirectory;

// ============================================================================
// SECTION: Environment Directory
// ============================================================================

/// In-memory environment directory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEnvironmentDirectory {
    /// Environments keyed by tenant and domain, in insertion order.
    environments: Arc<Mutex<BTreeMap<(TenantId, Domain), Vec<Environment>>>>,
}

impl InMemoryEnvironmentDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory seeded with environments.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when an entry collides with an
    /// existing id or name.
    pub fn with_environments(
        entries: impl IntoIterator<Item = Environment>,
    ) -> Result<Self, DirectoryError> {
        let directory = Self::new();
        for env in entries {
            directory.insert(env)?;
        }
        Ok(directory)
    }

    /// Adds an environment.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the id or name is already
    /// used in the tenant's domain.
    pub fn insert(&self, env: Environment) -> Result<(), DirectoryError> {
        let mut guard = self.lock()?;
        let entries = guard.entry((env.tenant_id, env.domain)).or_default();
        if entries.iter().any(|existing| existing.id == env.id || existing.name == env.name) {
            return Err(DirectoryError::Unavailable(format!(
                "environment {} ({}) already exists in {}",
                env.name,
                env.id,
                env.domain.as_str()
            )));
        }
        entries.push(env);
        drop(guard);
        Ok(())
    }

    /// Renames an environment. Returns false when the environment is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the new name is taken.
    pub fn rename(
        &self,
        tenant_id: TenantId,
        domain: Domain,
        id: &EnvironmentId,
        name: EnvironmentName,
    ) -> Result<bool, DirectoryError> {
        let mut guard = self.lock()?;
        let Some(entries) = guard.get_mut(&(tenant_id, domain)) else {
            return Ok(false);
        };
        if entries.iter().any(|env| env.name == name && &env.id != id) {
            return Err(DirectoryError::Unavailable(format!("environment name {name} is taken")));
        }
        let Some(env) = entries.iter_mut().find(|env| &env.id == id) else {
            return Ok(false);
        };
        env.name = name;
        drop(guard);
        Ok(true)
    }

    /// Removes an environment. Returns false when the environment is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the directory lock is poisoned.
    pub fn remove(
        &self,
        tenant_id: TenantId,
        domain: Domain,
        id: &EnvironmentId,
    ) -> Result<bool, DirectoryError> {
        let mut guard = self.lock()?;
        let Some(entries) = guard.get_mut(&(tenant_id, domain)) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|env| &env.id != id);
        let removed = entries.len() != before;
        drop(guard);
        Ok(removed)
    }

    /// Locks the environment map.
    fn lock(
        &self,
    ) -> Result<
        std::sync::MutexGuard<'_, BTreeMap<(TenantId, Domain), Vec<Environment>>>,
        DirectoryError,
    > {
        self.environments
            .lock()
            .map_err(|_| DirectoryError::Unavailable("environment directory mutex poisoned".into()))
    }
}

impl EnvironmentDirectory for InMemoryEnvironmentDirectory {
    fn list_environments(
        &self,
        tenant_id: TenantId,
        domain: Domain,
    ) -> Result<Vec<Environment>, DirectoryError> {
        let guard = self.lock()?;
        Ok(guard.get(&(tenant_id, domain)).cloned().unwrap_or_default())
    }
}

// ============================================================================
// SECTION: Tenant Directory
// ============================================================================

/// In-memory tenant directory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTenantDirectory {
    /// Tenant names keyed by id.
    tenants: Arc<Mutex<BTreeMap<TenantId, String>>>,
}

impl InMemoryTenantDirectory {
    /// Creates a directory seeded with tenants.
    #[must_use]
    pub fn with_tenants(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        Self {
            tenants: Arc::new(Mutex::new(
                tenants.into_iter().map(|tenant| (tenant.id, tenant.name)).collect(),
            )),
        }
    }

    /// Adds or replaces a tenant.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the directory lock is poisoned.
    pub fn insert(&self, tenant: Tenant) -> Result<(), DirectoryError> {
        self.tenants
            .lock()
            .map_err(|_| DirectoryError::Unavailable("tenant directory mutex poisoned".into()))?
            .insert(tenant.id, tenant.name);
        Ok(())
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn tenant_id_for_name(&self, name: &str) -> Result<TenantId, DirectoryError> {
        let guard = self
            .tenants
            .lock()
            .map_err(|_| DirectoryError::Unavailable("tenant directory mutex poisoned".into()))?;
        guard
            .iter()
            .find(|(_, tenant_name)| tenant_name.as_str() == name)
            .map(|(id, _)| *id)
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))
    }

    fn tenant_name_for_id(&self, tenant_id: TenantId) -> Result<String, DirectoryError> {
        let guard = self
            .tenants
            .lock()
            .map_err(|_| DirectoryError::Unavailable("tenant directory mutex poisoned".into()))?;
        guard
            .get(&tenant_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(tenant_id.to_string()))
    }
}

// ============================================================================
// SECTION: Property Store
// ============================================================================

/// In-memory property store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPropertyStore {
    /// Records keyed by tenant and property key.
    records: Arc<Mutex<BTreeMap<(TenantId, PropertyKey), StoredProperty>>>,
}

impl InMemoryPropertyStore {
    /// Creates an empty property store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyStore for InMemoryPropertyStore {
    fn read_property(
        &self,
        tenant_id: TenantId,
        key: &PropertyKey,
    ) -> Result<Option<StoredProperty>, PropertyStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| PropertyStoreError::Store("property store mutex poisoned".to_string()))?;
        Ok(guard.get(&(tenant_id, key.clone())).cloned())
    }

    fn write_property(
        &self,
        tenant_id: TenantId,
        property: &StoredProperty,
    ) -> Result<(), PropertyStoreError> {
        self.records
            .lock()
            .map_err(|_| PropertyStoreError::Store("property store mutex poisoned".to_string()))?
            .insert((tenant_id, property.key.clone()), property.clone());
        Ok(())
    }

    fn list_properties(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<ListedProperty>, PropertyStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| PropertyStoreError::Store("property store mutex poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|((tenant, _), _)| *tenant == tenant_id)
            .map(|(_, record)| ListedProperty::verified(record.clone()))
            .collect())
    }
}
