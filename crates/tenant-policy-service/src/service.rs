// crates/tenant-policy-service/src/service.rs
// ============================================================================
// Module: Server Configuration Service
// Description: Caller-facing configuration listing and update operations.
// Purpose: Apply gates, route updates through the store, and audit outcomes.
// Dependencies: tenant-policy-core, tenant-policy-config, tenant-policy-store-sqlite
// ============================================================================

//! ## Overview
//! [`ServerConfigService`] exposes three operations:
//! - [`ServerConfigService::get_editable_configurations`] lists a tenant's
//!   stored properties, rendering the tenant configuration in display form.
//! - [`ServerConfigService::update_configuration`] applies one update and
//!   returns a structured [`UpdateOutcome`]. Every outcome is audited.
//! - [`ServerConfigService::get_server_properties`] returns the masked
//!   server property snapshot.
//!
//! Caller errors are reported verbatim. Directory and store failures are
//! reported with a generic message; the detail goes to the audit sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use tenant_policy_config::AuditSinkType;
use tenant_policy_config::TenantPolicyConfig;
use tenant_policy_core::Capability;
use tenant_policy_core::Collaborators;
use tenant_policy_core::InMemoryPropertyStore;
use tenant_policy_core::NameFormDocument;
use tenant_policy_core::NoopMetadataNotifier;
use tenant_policy_core::Principal;
use tenant_policy_core::PropertyKey;
use tenant_policy_core::PropertyStore;
use tenant_policy_core::PropertyStoreError;
use tenant_policy_core::TenantConfigError;
use tenant_policy_core::TenantConfigStore;
use tenant_policy_core::TenantId;
use tenant_policy_store_sqlite::SqlitePropertyStore;
use thiserror::Error;

use crate::audit::ConfigAuditEvent;
use crate::audit::ConfigAuditEventParams;
use crate::audit::ConfigAuditSink;
use crate::audit::ConfigFileAuditSink;
use crate::audit::ConfigNoopAuditSink;
use crate::audit::ConfigStderrAuditSink;
use crate::permissions::StaticPermissionChecker;
use crate::properties::ServerProperty;
use crate::properties::ServerPropertyHandle;
use crate::properties::ServerPropertySnapshot;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message returned for accepted updates.
pub const SUCCESS_MESSAGE: &str = "success";
/// Message returned when a gate rejects the caller.
pub const NOT_AUTHORIZED_MESSAGE: &str = "Not Authorized";
/// Message returned when the directory or the store fails.
pub const FAILURE_MESSAGE: &str = "Failure. Unable to update configuration.";
/// Display value for a tenant configuration that cannot be rendered.
const EMPTY_DISPLAY_VALUE: &str = "{}";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Editable property as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditableProperty {
    /// Property key.
    pub key: String,
    /// Value in display form.
    pub display_value: String,
    /// Stored description.
    pub description: String,
}

/// Structured result of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// True when the value was persisted.
    pub success: bool,
    /// Stable human-readable message.
    pub message: String,
    /// Key that was written on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_key: Option<PropertyKey>,
}

impl UpdateOutcome {
    /// Builds the outcome of an accepted update.
    fn accepted(key: PropertyKey) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            accepted_key: Some(key),
        }
    }

    /// Builds the outcome of a failed update.
    fn failed(error: &TenantConfigError) -> Self {
        let message = match error {
            TenantConfigError::NotAuthorized => NOT_AUTHORIZED_MESSAGE.to_string(),
            error if error.is_caller_error() => error.to_string(),
            _ => FAILURE_MESSAGE.to_string(),
        };
        Self {
            success: false,
            message,
            accepted_key: None,
        }
    }
}

/// Service construction errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Server configuration operations for authenticated callers.
#[derive(Clone)]
pub struct ServerConfigService {
    /// Tenant configuration store.
    store: TenantConfigStore,
    /// Update audit sink.
    audit: Arc<dyn ConfigAuditSink>,
    /// Current server property snapshot.
    server_properties: Arc<ServerPropertyHandle>,
}

impl ServerConfigService {
    /// Creates a service over explicit collaborators.
    #[must_use]
    pub fn new(
        store: TenantConfigStore,
        audit: Arc<dyn ConfigAuditSink>,
        server_properties: Arc<ServerPropertyHandle>,
    ) -> Self {
        Self {
            store,
            audit,
            server_properties,
        }
    }

    /// Builds a service from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the configuration is invalid or the
    /// store or audit sink cannot be opened.
    pub fn from_config(config: &TenantPolicyConfig) -> Result<Self, ServiceError> {
        config.validate().map_err(|err| ServiceError::Config(err.to_string()))?;
        let environments =
            config.environment_directory().map_err(|err| ServiceError::Config(err.to_string()))?;
        let collaborators = Collaborators {
            tenants: Arc::new(config.tenant_directory()),
            environments: Arc::new(environments),
            properties: build_property_store(config)?,
            permissions: Arc::new(StaticPermissionChecker::from_principals(&config.principals)),
            notifier: Arc::new(NoopMetadataNotifier),
        };
        let store = TenantConfigStore::new(collaborators, config.access_policy());
        let snapshot = ServerPropertySnapshot::from_config(&config.server_properties);
        Ok(Self::new(
            store,
            build_audit_sink(config)?,
            Arc::new(ServerPropertyHandle::new(snapshot)),
        ))
    }

    /// Returns the underlying configuration store.
    #[must_use]
    pub const fn store(&self) -> &TenantConfigStore {
        &self.store
    }

    /// Returns the server property handle for refreshes.
    #[must_use]
    pub const fn server_property_handle(&self) -> &Arc<ServerPropertyHandle> {
        &self.server_properties
    }

    /// Lists the tenant's editable properties ordered by key.
    ///
    /// The tenant configuration is shown in display form. A value that fails
    /// integrity checks or cannot be rendered is shown as `{}`, and the rest
    /// of the listing is unaffected. Non-default tenants only see
    /// allow-listed keys.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError::NotAuthorized`] when the caller lacks the
    /// capability and [`TenantConfigError::PersistenceFailure`] when the
    /// store cannot be read at all.
    pub fn get_editable_configurations(
        &self,
        tenant_id: TenantId,
        principal: &Principal,
    ) -> Result<Vec<EditableProperty>, TenantConfigError> {
        if !self.has_capability(principal) {
            return Err(TenantConfigError::NotAuthorized);
        }
        let policy = self.store.policy();
        let mut records = self.store.collaborators().properties.list_properties(tenant_id)?;
        records.retain(|record| policy.may_edit(tenant_id, &record.key));
        records.sort_by(|left, right| left.key.cmp(&right.key));
        Ok(records
            .into_iter()
            .map(|record| {
                let display_value = self.render_value(tenant_id, &record.key, record.value);
                EditableProperty {
                    key: record.key.as_str().to_string(),
                    display_value,
                    description: record.description,
                }
            })
            .collect())
    }

    /// Applies one property update and audits the outcome.
    ///
    /// The raw value is trimmed. The tenant configuration key is parsed and
    /// routed through validation; other keys are stored verbatim.
    pub fn update_configuration(
        &self,
        tenant_id: TenantId,
        principal: &Principal,
        key: &str,
        raw_value: &str,
    ) -> UpdateOutcome {
        let result = self.apply_update(tenant_id, principal, key, raw_value.trim());
        let params = match &result {
            Ok(_) => ConfigAuditEventParams::accepted(tenant_id, &principal.subject, key),
            Err(error) => {
                ConfigAuditEventParams::from_error(tenant_id, &principal.subject, key, error)
            }
        };
        self.audit.record(&ConfigAuditEvent::new(params));
        match result {
            Ok(accepted) => UpdateOutcome::accepted(accepted),
            Err(error) => UpdateOutcome::failed(&error),
        }
    }

    /// Returns the masked server properties; empty without the capability.
    #[must_use]
    pub fn get_server_properties(&self, principal: &Principal) -> Vec<ServerProperty> {
        if !self.has_capability(principal) {
            return Vec::new();
        }
        self.server_properties.current().entries().to_vec()
    }

    /// Routes an update to the configuration or raw property path.
    fn apply_update(
        &self,
        tenant_id: TenantId,
        principal: &Principal,
        key: &str,
        value: &str,
    ) -> Result<PropertyKey, TenantConfigError> {
        if key.trim().is_empty() {
            return Err(TenantConfigError::MalformedConfiguration(
                "property key is required".to_string(),
            ));
        }
        let key = PropertyKey::new(key);
        self.store.authorize(tenant_id, principal, &key)?;
        if key.is_tenant_config() {
            let document = NameFormDocument::from_json(value)?;
            self.store.save(tenant_id, principal, &document)
        } else {
            self.store.save_property(tenant_id, principal, &key, value)
        }
    }

    /// Renders one listed value; unreadable or unresolvable values show as `{}`.
    fn render_value(
        &self,
        tenant_id: TenantId,
        key: &PropertyKey,
        value: Result<String, PropertyStoreError>,
    ) -> String {
        let Ok(value) = value else {
            return EMPTY_DISPLAY_VALUE.to_string();
        };
        if !key.is_tenant_config() {
            return value;
        }
        self.store
            .resolve_for_display(tenant_id, &value)
            .and_then(|document| document.to_pretty_json())
            .unwrap_or_else(|_| EMPTY_DISPLAY_VALUE.to_string())
    }

    /// Returns true when the caller may manage server configuration.
    fn has_capability(&self, principal: &Principal) -> bool {
        self.store
            .collaborators()
            .permissions
            .is_authorized(principal, Capability::ManageServerConfiguration)
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds the property store from configuration.
fn build_property_store(
    config: &TenantPolicyConfig,
) -> Result<Arc<dyn PropertyStore>, ServiceError> {
    match config.store.sqlite_config() {
        Some(sqlite_config) => {
            let store = SqlitePropertyStore::new(sqlite_config)
                .map_err(|err| ServiceError::Init(err.to_string()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryPropertyStore::new())),
    }
}

/// Builds the audit sink from configuration.
fn build_audit_sink(config: &TenantPolicyConfig) -> Result<Arc<dyn ConfigAuditSink>, ServiceError> {
    match config.audit.sink {
        AuditSinkType::Stderr => Ok(Arc::new(ConfigStderrAuditSink)),
        AuditSinkType::None => Ok(Arc::new(ConfigNoopAuditSink)),
        AuditSinkType::File => {
            let path = config.audit.path.as_ref().ok_or_else(|| {
                ServiceError::Config("file audit sink requires path".to_string())
            })?;
            let sink = ConfigFileAuditSink::new(path)
                .map_err(|err| ServiceError::Init(format!("audit log open failed: {err}")))?;
            Ok(Arc::new(sink))
        }
    }
}
