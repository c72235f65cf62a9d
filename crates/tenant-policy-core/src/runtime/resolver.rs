// crates/tenant-policy-core/src/runtime/resolver.rs
// ============================================================================
// Module: Reference Resolver
// Description: Converts environment references between id form and name form.
// Purpose: Keep stored configurations rename-safe while displaying names.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Resolution runs against a [`DirectorySnapshot`] captured once per call, so
//! every lookup in one pass sees the same directory state.
//!
//! Resolving to name form is tolerant: identifiers that no longer exist are
//! dropped from lists and cleared from singular fields. Resolving to id form
//! is strict: the first unknown name fails the whole conversion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ById;
use crate::core::ByName;
use crate::core::Domain;
use crate::core::Environment;
use crate::core::EnvironmentId;
use crate::core::EnvironmentName;
use crate::core::IdFormConfiguration;
use crate::core::NameFormConfiguration;
use crate::core::TenantConfigDocument;
use crate::core::TenantConfigError;
use crate::core::TenantId;
use crate::interfaces::DirectoryError;
use crate::interfaces::EnvironmentDirectory;

// ============================================================================
// SECTION: Directory Snapshot
// ============================================================================

/// Environments of one tenant across all domains, read once.
///
/// # Invariants
/// - Only environments owned by `tenant_id` are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    /// Tenant the snapshot was captured for.
    tenant_id: TenantId,
    /// Environments keyed by domain.
    environments: BTreeMap<Domain, Vec<Environment>>,
}

impl DirectorySnapshot {
    /// Reads every domain of the tenant from the directory.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when any domain listing fails.
    pub fn capture(
        directory: &dyn EnvironmentDirectory,
        tenant_id: TenantId,
    ) -> Result<Self, DirectoryError> {
        let mut environments = BTreeMap::new();
        for domain in Domain::ALL {
            let listed = directory.list_environments(tenant_id, domain)?;
            environments.insert(domain, listed);
        }
        Ok(Self::from_environments(tenant_id, environments.into_values().flatten()))
    }

    /// Builds a snapshot from explicit entries, ignoring other tenants.
    #[must_use]
    pub fn from_environments(
        tenant_id: TenantId,
        entries: impl IntoIterator<Item = Environment>,
    ) -> Self {
        let mut environments: BTreeMap<Domain, Vec<Environment>> = BTreeMap::new();
        for env in entries.into_iter().filter(|env| env.tenant_id == tenant_id) {
            environments.entry(env.domain).or_default().push(env);
        }
        Self {
            tenant_id,
            environments,
        }
    }

    /// Returns the tenant the snapshot covers.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the current name of an environment identifier.
    #[must_use]
    pub fn name_for_id(&self, domain: Domain, id: &EnvironmentId) -> Option<&EnvironmentName> {
        self.domain_entries(domain).iter().find(|env| &env.id == id).map(|env| &env.name)
    }

    /// Returns the identifier of a named environment.
    #[must_use]
    pub fn id_for_name(&self, domain: Domain, name: &EnvironmentName) -> Option<&EnvironmentId> {
        self.domain_entries(domain).iter().find(|env| &env.name == name).map(|env| &env.id)
    }

    /// Returns the environments of a domain.
    fn domain_entries(&self, domain: Domain) -> &[Environment] {
        self.environments.get(&domain).map_or(&[], Vec::as_slice)
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Converts a stored configuration into display form.
#[must_use]
pub fn to_name_form(
    snapshot: &DirectorySnapshot,
    config: &IdFormConfiguration,
) -> NameFormConfiguration {
    let single = |domain: Domain, id: &Option<EnvironmentId>| {
        id.as_ref().and_then(|id| snapshot.name_for_id(domain, id)).cloned()
    };
    let list = |domain: Domain, ids: &[EnvironmentId]| -> Vec<EnvironmentName> {
        ids.iter().filter_map(|id| snapshot.name_for_id(domain, id)).cloned().collect()
    };
    NameFormConfiguration {
        tenant_name: config.tenant_name.clone(),
        base_sync_environment: single(Domain::Messaging, &config.base_sync_environment),
        base_sync_connect_cluster: single(Domain::Connect, &config.base_sync_connect_cluster),
        ordered_topic_promotion_envs: list(Domain::Messaging, &config.ordered_topic_promotion_envs),
        ordered_connector_promotion_envs: list(
            Domain::Connect,
            &config.ordered_connector_promotion_envs,
        ),
        requestable_topic_envs: list(Domain::Messaging, &config.requestable_topic_envs),
        requestable_connector_envs: list(Domain::Connect, &config.requestable_connector_envs),
        requestable_schema_envs: list(Domain::SchemaRegistry, &config.requestable_schema_envs),
    }
}

/// Converts a display configuration into stored form.
///
/// # Errors
///
/// Returns [`TenantConfigError::InvalidBaseSyncEnvironment`] for an unknown
/// base sync reference and [`TenantConfigError::UnknownResource`] for the
/// first unknown list entry.
pub fn to_id_form(
    snapshot: &DirectorySnapshot,
    config: &NameFormConfiguration,
) -> Result<IdFormConfiguration, TenantConfigError> {
    let single = |domain: Domain, name: &Option<EnvironmentName>| match name {
        None => Ok(None),
        Some(name) => snapshot
            .id_for_name(domain, name)
            .cloned()
            .map(Some)
            .ok_or_else(|| TenantConfigError::InvalidBaseSyncEnvironment(name.to_string())),
    };
    let list = |domain: Domain, names: &[EnvironmentName]| {
        names
            .iter()
            .map(|name| {
                snapshot
                    .id_for_name(domain, name)
                    .cloned()
                    .ok_or_else(|| TenantConfigError::UnknownResource(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(IdFormConfiguration {
        tenant_name: config.tenant_name.clone(),
        base_sync_environment: single(Domain::Messaging, &config.base_sync_environment)?,
        base_sync_connect_cluster: single(Domain::Connect, &config.base_sync_connect_cluster)?,
        ordered_topic_promotion_envs: list(
            Domain::Messaging,
            &config.ordered_topic_promotion_envs,
        )?,
        ordered_connector_promotion_envs: list(
            Domain::Connect,
            &config.ordered_connector_promotion_envs,
        )?,
        requestable_topic_envs: list(Domain::Messaging, &config.requestable_topic_envs)?,
        requestable_connector_envs: list(Domain::Connect, &config.requestable_connector_envs)?,
        requestable_schema_envs: list(Domain::SchemaRegistry, &config.requestable_schema_envs)?,
    })
}

/// Converts a stored document into display form.
#[must_use]
pub fn document_to_name_form(
    snapshot: &DirectorySnapshot,
    document: &TenantConfigDocument<ById>,
) -> TenantConfigDocument<ByName> {
    TenantConfigDocument {
        tenant_model: document.tenant_model.as_ref().map(|model| to_name_form(snapshot, model)),
    }
}

/// Converts a display document into stored form.
///
/// # Errors
///
/// Returns the first resolution failure, see [`to_id_form`].
pub fn document_to_id_form(
    snapshot: &DirectorySnapshot,
    document: &TenantConfigDocument<ByName>,
) -> Result<TenantConfigDocument<ById>, TenantConfigError> {
    Ok(TenantConfigDocument {
        tenant_model: document
            .tenant_model
            .as_ref()
            .map(|model| to_id_form(snapshot, model))
            .transpose()?,
    })
}
