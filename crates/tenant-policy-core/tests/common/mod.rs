// crates/tenant-policy-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared directories, permissions, and notifiers for core tests.
// Purpose: Build the "acme" tenant fixture used across integration tests.
// Dependencies: tenant-policy-core
// ============================================================================

//! ## Overview
//! The acme fixture has messaging environments DEV (id 1) and TST (id 2), a
//! connect cluster DEV_CONNECT (id 1), and a schema registry DEV_SCHEMA (id 1)
//! all owned by tenant 102. A second tenant (globex, 103) owns PRD.

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
use tenant_policy_core::EntityType;
use tenant_policy_core::Environment;
use tenant_policy_core::InMemoryEnvironmentDirectory;
use tenant_policy_core::InMemoryPropertyStore;
use tenant_policy_core::InMemoryTenantDirectory;
use tenant_policy_core::MetadataNotifier;
use tenant_policy_core::MetadataOperation;
use tenant_policy_core::NameFormConfiguration;
use tenant_policy_core::NameFormDocument;
use tenant_policy_core::PermissionChecker;
use tenant_policy_core::Principal;
use tenant_policy_core::Tenant;
use tenant_policy_core::TenantConfigStore;
use tenant_policy_core::TenantId;

// ============================================================================
// SECTION: Fixture Constants
// ============================================================================

/// Tenant owning the acme environments.
pub const ACME: TenantId = TenantId::new(102);
/// Second tenant, used for cross-tenant checks.
pub const GLOBEX: TenantId = TenantId::new(103);

// ============================================================================
// SECTION: Collaborators
// ============================================================================

/// Permission checker that authorizes a fixed set of subjects.
pub struct AllowList(pub Vec<String>);

impl PermissionChecker for AllowList {
    fn is_authorized(&self, principal: &Principal, _capability: Capability) -> bool {
        self.0.iter().any(|subject| subject == &principal.subject)
    }
}

/// Notifier that records every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    /// Recorded notifications in call order.
    pub events: Mutex<Vec<(TenantId, EntityType, MetadataOperation)>>,
}

impl RecordingNotifier {
    /// Returns the number of notifications received.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl MetadataNotifier for RecordingNotifier {
    fn notify_metadata_changed(
        &self,
        tenant_id: TenantId,
        entity: EntityType,
        operation: MetadataOperation,
    ) {
        self.events.lock().unwrap().push((tenant_id, entity, operation));
    }
}

/// Fully wired fixture.
pub struct Fixture {
    /// Shared environment directory handle.
    pub environments: InMemoryEnvironmentDirectory,
    /// Shared tenant directory handle.
    pub tenants: InMemoryTenantDirectory,
    /// Shared property store handle.
    pub properties: InMemoryPropertyStore,
    /// Notification recorder.
    pub notifier: Arc<RecordingNotifier>,
    /// Store under test.
    pub store: TenantConfigStore,
}

/// Builds the acme fixture; `admin` is authorized, everyone else is not.
pub fn fixture() -> Fixture {
    let environments = InMemoryEnvironmentDirectory::with_environments([
        Environment::new(ACME, Domain::Messaging, "1", "DEV"),
        Environment::new(ACME, Domain::Messaging, "2", "TST"),
        Environment::new(ACME, Domain::Connect, "1", "DEV_CONNECT"),
        Environment::new(ACME, Domain::SchemaRegistry, "1", "DEV_SCHEMA"),
        Environment::new(GLOBEX, Domain::Messaging, "3", "PRD"),
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
        Tenant {
            id: GLOBEX,
            name: "globex".to_string(),
        },
    ]);
    let properties = InMemoryPropertyStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let store = TenantConfigStore::new(
        Collaborators {
            tenants: Arc::new(tenants.clone()),
            environments: Arc::new(environments.clone()),
            properties: Arc::new(properties.clone()),
            permissions: Arc::new(AllowList(vec!["admin".to_string()])),
            notifier: notifier.clone(),
        },
        AccessPolicy::default(),
    );
    Fixture {
        environments,
        tenants,
        properties,
        notifier,
        store,
    }
}

/// Authorized principal.
pub fn admin() -> Principal {
    Principal::new("admin")
}

/// Builds an acme name-form document with the given topic promotion order.
pub fn acme_document(topic_promotion: &[&str]) -> NameFormDocument {
    let mut config = NameFormConfiguration::empty("acme");
    config.ordered_topic_promotion_envs =
        topic_promotion.iter().map(|name| (*name).into()).collect();
    NameFormDocument::new(config)
}
