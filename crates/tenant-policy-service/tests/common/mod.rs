// crates/tenant-policy-service/tests/common/mod.rs
// ============================================================================
// Module: Common Service Fixtures
// Description: In-memory collaborators and a recording audit sink.
// Purpose: Build a fully wired service for integration tests.
// Dependencies: tenant-policy-core, tenant-policy-service
// ============================================================================

//! ## Overview
//! Tenant 101 is the default tenant; acme (102) owns messaging DEV (1) and
//! TST (2) plus DEV_CONNECT (1). `admin` acts for the default tenant and
//! `acme-admin` for acme; both hold the management capability.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use tenant_policy_core::AccessPolicy;
use tenant_policy_core::Capability;
use tenant_policy_core::Collaborators;
use tenant_policy_core::DEFAULT_TENANT_ID;
use tenant_policy_core::Domain;
use tenant_policy_core::Environment;
use tenant_policy_core::InMemoryEnvironmentDirectory;
use tenant_policy_core::InMemoryPropertyStore;
use tenant_policy_core::InMemoryTenantDirectory;
use tenant_policy_core::ListedProperty;
use tenant_policy_core::NoopMetadataNotifier;
use tenant_policy_core::Principal;
use tenant_policy_core::PropertyKey;
use tenant_policy_core::PropertyStore;
use tenant_policy_core::PropertyStoreError;
use tenant_policy_core::StoredProperty;
use tenant_policy_core::Tenant;
use tenant_policy_core::TenantConfigStore;
use tenant_policy_core::TenantId;
use tenant_policy_service::ConfigAuditEvent;
use tenant_policy_service::ConfigAuditSink;
use tenant_policy_service::ServerConfigService;
use tenant_policy_service::ServerPropertyHandle;
use tenant_policy_service::ServerPropertySnapshot;
use tenant_policy_service::StaticPermissionChecker;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tenant owning the acme environments.
pub const ACME: TenantId = TenantId::new(102);

// ============================================================================
// SECTION: Collaborators
// ============================================================================

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded events in call order.
    pub events: Mutex<Vec<ConfigAuditEvent>>,
}

impl RecordingAuditSink {
    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<ConfigAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ConfigAuditSink for RecordingAuditSink {
    fn record(&self, event: &ConfigAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Property store whose writes always fail.
pub struct FailingPropertyStore;

impl PropertyStore for FailingPropertyStore {
    fn read_property(
        &self,
        _tenant_id: TenantId,
        _key: &PropertyKey,
    ) -> Result<Option<StoredProperty>, PropertyStoreError> {
        Ok(None)
    }

    fn write_property(
        &self,
        _tenant_id: TenantId,
        _property: &StoredProperty,
    ) -> Result<(), PropertyStoreError> {
        Err(PropertyStoreError::Io("disk full".to_string()))
    }

    fn list_properties(
        &self,
        _tenant_id: TenantId,
    ) -> Result<Vec<ListedProperty>, PropertyStoreError> {
        Err(PropertyStoreError::Io("disk unreadable".to_string()))
    }
}

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Fully wired service fixture.
pub struct Fixture {
    /// Shared property store handle.
    pub properties: InMemoryPropertyStore,
    /// Audit recorder.
    pub audit: Arc<RecordingAuditSink>,
    /// Service under test.
    pub service: ServerConfigService,
}

/// Builds the fixture over an in-memory property store.
pub fn fixture() -> Fixture {
    let properties = InMemoryPropertyStore::new();
    let (audit, service) = wire(Arc::new(properties.clone()));
    Fixture {
        properties,
        audit,
        service,
    }
}

/// Builds a service over the given property store.
pub fn wire(
    properties: Arc<dyn PropertyStore>,
) -> (Arc<RecordingAuditSink>, ServerConfigService) {
    let environments = InMemoryEnvironmentDirectory::with_environments([
        Environment::new(ACME, Domain::Messaging, "1", "DEV"),
        Environment::new(ACME, Domain::Messaging, "2", "TST"),
        Environment::new(ACME, Domain::Connect, "1", "DEV_CONNECT"),
    ])
    .unwrap();
    let tenants = InMemoryTenantDirectory::with_tenants([
        Tenant {
            id: DEFAULT_TENANT_ID,
            name: "default".to_string(),
        },
        Tenant {
            id: ACME,
            name: "acme".to_string(),
        },
    ]);
    let mut permissions = StaticPermissionChecker::new();
    permissions.grant("admin", Capability::ManageServerConfiguration);
    permissions.grant("acme-admin", Capability::ManageServerConfiguration);
    let store = TenantConfigStore::new(
        Collaborators {
            tenants: Arc::new(tenants),
            environments: Arc::new(environments),
            properties,
            permissions: Arc::new(permissions),
            notifier: Arc::new(NoopMetadataNotifier),
        },
        AccessPolicy::default(),
    );
    let audit = Arc::new(RecordingAuditSink::default());
    let snapshot = ServerPropertySnapshot::build(
        &["server.".to_string()],
        [("server.port", "8080"), ("server.ssl.cert", "-----BEGIN CERTIFICATE-----")],
    );
    let service = ServerConfigService::new(
        store,
        audit.clone(),
        Arc::new(ServerPropertyHandle::new(snapshot)),
    );
    (audit, service)
}

/// Principal acting for the default tenant.
pub fn admin() -> Principal {
    Principal::new("admin")
}

/// Principal acting for acme.
pub fn acme_admin() -> Principal {
    Principal::new("acme-admin")
}

/// Acme configuration text in display form.
pub fn acme_config_json(topic_promotion: &[&str]) -> String {
    serde_json::json!({
        "tenantModel": {
            "tenantName": "acme",
            "baseSyncEnvironment": "DEV",
            "orderOfTopicPromotionEnvsList": topic_promotion,
        }
    })
    .to_string()
}
