// crates/tenant-policy-service/tests/service_operations.rs
// ============================================================================
// Module: Server Configuration Service Tests
// Description: Listing, update outcomes, and audit records of the service.
// Purpose: Validate gates, verbatim caller errors, and generic store failures.
// Dependencies: tenant-policy-core, tenant-policy-service
// ============================================================================
//! ## Overview
//! Covers the update path end to end: gates run before parsing, caller errors
//! are surfaced verbatim, store failures are surfaced generically, and every
//! outcome lands in the audit sink.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use tenant_policy_core::DEFAULT_CONFIG_DESCRIPTION;
use tenant_policy_core::DEFAULT_TENANT_ID;
use tenant_policy_core::IdFormDocument;
use tenant_policy_core::Principal;
use tenant_policy_core::PropertyKey;
use tenant_policy_core::PropertyStore;
use tenant_policy_core::StoredProperty;
use tenant_policy_core::TENANT_CONFIG_PROPERTY;
use tenant_policy_core::TenantConfigError;
use tenant_policy_service::ConfigAuditOutcome;
use tenant_policy_service::FAILURE_MESSAGE;
use tenant_policy_service::NOT_AUTHORIZED_MESSAGE;
use tenant_policy_service::SUCCESS_MESSAGE;

use crate::common::ACME;
use crate::common::FailingPropertyStore;
use crate::common::acme_admin;
use crate::common::acme_config_json;
use crate::common::admin;
use crate::common::fixture;
use crate::common::wire;

// ============================================================================
// SECTION: Updates
// ============================================================================

#[test]
fn tenant_config_update_is_resolved_and_audited() {
    let fixture = fixture();
    let raw = format!("  {}\n", acme_config_json(&["DEV", "TST"]));
    let outcome =
        fixture.service.update_configuration(ACME, &acme_admin(), TENANT_CONFIG_PROPERTY, &raw);
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.message, SUCCESS_MESSAGE);
    assert_eq!(outcome.accepted_key, Some(PropertyKey::tenant_config()));

    let record =
        fixture.properties.read_property(ACME, &PropertyKey::tenant_config()).unwrap().unwrap();
    let stored = IdFormDocument::from_json(&record.value).unwrap().tenant_model.unwrap();
    let ids: Vec<&str> = stored.ordered_topic_promotion_envs.iter().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    let events = fixture.audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, ConfigAuditOutcome::Accepted);
    assert_eq!(events[0].principal, "acme-admin");
    assert_eq!(events[0].key, TENANT_CONFIG_PROPERTY);
}

#[test]
fn unknown_environment_is_reported_verbatim() {
    let fixture = fixture();
    let outcome = fixture.service.update_configuration(
        ACME,
        &acme_admin(),
        TENANT_CONFIG_PROPERTY,
        &acme_config_json(&["DEV", "PRD"]),
    );
    assert!(!outcome.success);
    assert_eq!(outcome.message, "environment PRD does not exist for this tenant");
    assert_eq!(outcome.accepted_key, None);
    assert_eq!(
        fixture.properties.read_property(ACME, &PropertyKey::tenant_config()).unwrap(),
        None
    );

    let events = fixture.audit.events();
    assert_eq!(events[0].outcome, ConfigAuditOutcome::Rejected);
    assert_eq!(events[0].error_kind, Some("unknown_resource"));
}

#[test]
fn malformed_json_is_rejected() {
    let fixture = fixture();
    let outcome = fixture.service.update_configuration(
        ACME,
        &acme_admin(),
        TENANT_CONFIG_PROPERTY,
        "{\"tenantModel\": [",
    );
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("malformed configuration"), "{}", outcome.message);
    assert_eq!(fixture.audit.events()[0].error_kind, Some("malformed_configuration"));
}

#[test]
fn gates_run_before_parsing() {
    let fixture = fixture();
    let outcome = fixture.service.update_configuration(
        ACME,
        &Principal::new("mallory"),
        TENANT_CONFIG_PROPERTY,
        "not json",
    );
    assert!(!outcome.success);
    assert_eq!(outcome.message, NOT_AUTHORIZED_MESSAGE);
    assert_eq!(fixture.audit.events()[0].error_kind, Some("not_authorized"));
}

#[test]
fn non_default_tenant_cannot_update_other_keys() {
    let fixture = fixture();
    let outcome = fixture.service.update_configuration(ACME, &acme_admin(), "mail.host", "smtp");
    assert!(!outcome.success);
    assert_eq!(outcome.message, NOT_AUTHORIZED_MESSAGE);
    assert!(fixture.properties.list_properties(ACME).unwrap().is_empty());
}

#[test]
fn default_tenant_stores_other_keys_trimmed() {
    let fixture = fixture();
    let outcome = fixture.service.update_configuration(
        DEFAULT_TENANT_ID,
        &admin(),
        "mail.host",
        "  smtp.example.io ",
    );
    assert!(outcome.success);
    let record = fixture
        .properties
        .read_property(DEFAULT_TENANT_ID, &PropertyKey::new("mail.host"))
        .unwrap()
        .unwrap();
    assert_eq!(record.value, "smtp.example.io");
}

#[test]
fn empty_key_is_rejected() {
    let fixture = fixture();
    let outcome = fixture.service.update_configuration(DEFAULT_TENANT_ID, &admin(), " ", "x");
    assert!(!outcome.success);
    assert_eq!(outcome.message, "malformed configuration: property key is required");
}

#[test]
fn store_failure_is_generic_and_audited_with_detail() {
    let (audit, service) = wire(Arc::new(FailingPropertyStore));
    let outcome = service.update_configuration(
        ACME,
        &acme_admin(),
        TENANT_CONFIG_PROPERTY,
        &acme_config_json(&["DEV"]),
    );
    assert!(!outcome.success);
    assert_eq!(outcome.message, FAILURE_MESSAGE);
    let events = audit.events();
    assert_eq!(events[0].outcome, ConfigAuditOutcome::Failed);
    assert_eq!(events[0].error_kind, Some("persistence_failure"));
    assert!(events[0].detail.as_deref().unwrap_or_default().contains("disk full"));
}

// ============================================================================
// SECTION: Listing
// ============================================================================

#[test]
fn listing_requires_capability() {
    let fixture = fixture();
    let result = fixture.service.get_editable_configurations(ACME, &Principal::new("mallory"));
    assert!(matches!(result, Err(TenantConfigError::NotAuthorized)));
}

#[test]
fn listing_renders_names_and_hides_keys_from_non_default_tenants() {
    let fixture = fixture();
    fixture
        .properties
        .write_property(
            ACME,
            &StoredProperty {
                key: PropertyKey::new("mail.host"),
                value: "smtp".to_string(),
                description: "Mail host".to_string(),
            },
        )
        .unwrap();
    let outcome = fixture.service.update_configuration(
        ACME,
        &acme_admin(),
        TENANT_CONFIG_PROPERTY,
        &acme_config_json(&["TST"]),
    );
    assert!(outcome.success);

    let listed = fixture.service.get_editable_configurations(ACME, &acme_admin()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key, TENANT_CONFIG_PROPERTY);
    assert_eq!(listed[0].description, DEFAULT_CONFIG_DESCRIPTION);
    let shown: serde_json::Value = serde_json::from_str(&listed[0].display_value).unwrap();
    assert_eq!(shown["tenantModel"]["orderOfTopicPromotionEnvsList"][0], "TST");
    assert_eq!(shown["tenantModel"]["baseSyncEnvironment"], "DEV");
}

#[test]
fn default_tenant_sees_every_key_in_order() {
    let fixture = fixture();
    for key in ["z.last", "a.first"] {
        let outcome = fixture.service.update_configuration(DEFAULT_TENANT_ID, &admin(), key, "v");
        assert!(outcome.success);
    }
    let listed = fixture.service.get_editable_configurations(DEFAULT_TENANT_ID, &admin()).unwrap();
    let keys: Vec<&str> = listed.iter().map(|entry| entry.key.as_str()).collect();
    assert_eq!(keys, vec!["a.first", "z.last"]);
}

#[test]
fn unrenderable_config_is_listed_as_empty_object() {
    let fixture = fixture();
    fixture
        .properties
        .write_property(
            ACME,
            &StoredProperty {
                key: PropertyKey::tenant_config(),
                value: "{broken".to_string(),
                description: String::new(),
            },
        )
        .unwrap();
    let listed = fixture.service.get_editable_configurations(ACME, &acme_admin()).unwrap();
    assert_eq!(listed[0].display_value, "{}");
}

#[test]
fn listing_store_failure_is_persistence_failure() {
    let (_audit, service) = wire(Arc::new(FailingPropertyStore));
    let result = service.get_editable_configurations(ACME, &acme_admin());
    assert!(matches!(result, Err(TenantConfigError::PersistenceFailure(_))));
}
