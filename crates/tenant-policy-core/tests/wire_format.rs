// crates/tenant-policy-core/tests/wire_format.rs
// ============================================================================
// Module: Configuration Wire Format Tests
// Description: JSON field names and defaults of the configuration document.
// Purpose: Keep the public document shape stable.
// Dependencies: tenant-policy-core, serde_json
// ============================================================================
//! ## Overview
//! The document wraps the model in `tenantModel` and uses camelCase list
//! names. Missing fields default, explicit `null` lists read as empty, and
//! unknown fields are ignored.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use serde_json::json;
use tenant_policy_core::EnvironmentId;
use tenant_policy_core::EnvironmentName;
use tenant_policy_core::FormKind;
use tenant_policy_core::IdFormDocument;
use tenant_policy_core::NameFormDocument;
use tenant_policy_core::TenantConfigError;

#[test]
fn parses_public_field_names() {
    let text = json!({
        "tenantModel": {
            "tenantName": "acme",
            "baseSyncEnvironment": "DEV",
            "baseSyncKafkaConnectCluster": "DEV_CONNECT",
            "orderOfTopicPromotionEnvsList": ["DEV", "TST"],
            "orderOfConnectorsPromotionEnvsList": ["DEV_CONNECT"],
            "requestTopicsEnvironmentsList": ["TST"],
            "requestConnectorsEnvironmentsList": [],
            "requestSchemaEnvironmentsList": ["DEV_SCHEMA"],
            "unrelated": true
        }
    })
    .to_string();
    let model = NameFormDocument::from_json(&text).unwrap().tenant_model.unwrap();
    assert_eq!(model.form(), FormKind::ByName);
    assert_eq!(model.tenant_name, "acme");
    assert_eq!(model.base_sync_connect_cluster, Some(EnvironmentName::new("DEV_CONNECT")));
    assert_eq!(
        model.ordered_topic_promotion_envs,
        vec![EnvironmentName::new("DEV"), EnvironmentName::new("TST")]
    );
    assert!(model.requestable_connector_envs.is_empty());
}

#[test]
fn empty_object_is_an_empty_document() {
    let document = NameFormDocument::from_json("{}").unwrap();
    assert_eq!(document, NameFormDocument::default());
    assert_eq!(document.to_pretty_json().unwrap(), "{}");
}

#[test]
fn missing_lists_default_to_empty() {
    let document = NameFormDocument::from_json(r#"{"tenantModel":{"tenantName":"acme"}}"#).unwrap();
    let model = document.tenant_model.unwrap();
    assert!(model.ordered_topic_promotion_envs.is_empty());
    assert_eq!(model.base_sync_environment, None);
}

#[test]
fn null_lists_read_as_empty_in_name_form() {
    let text = json!({
        "tenantModel": {
            "tenantName": "acme",
            "baseSyncEnvironment": null,
            "orderOfTopicPromotionEnvsList": ["DEV", "TST"],
            "orderOfConnectorsPromotionEnvsList": null,
            "requestTopicsEnvironmentsList": null,
            "requestConnectorsEnvironmentsList": null,
            "requestSchemaEnvironmentsList": null
        }
    })
    .to_string();
    let model = NameFormDocument::from_json(&text).unwrap().tenant_model.unwrap();
    assert_eq!(model.ordered_topic_promotion_envs.len(), 2);
    assert!(model.ordered_connector_promotion_envs.is_empty());
    assert!(model.requestable_topic_envs.is_empty());
    assert!(model.requestable_connector_envs.is_empty());
    assert!(model.requestable_schema_envs.is_empty());
    assert_eq!(model.base_sync_environment, None);
}

#[test]
fn null_lists_read_as_empty_in_id_form() {
    let text = json!({
        "tenantModel": {
            "tenantName": "acme",
            "orderOfTopicPromotionEnvsList": ["1", "2"],
            "requestSchemaEnvironmentsList": null
        }
    })
    .to_string();
    let model = IdFormDocument::from_json(&text).unwrap().tenant_model.unwrap();
    assert_eq!(
        model.ordered_topic_promotion_envs,
        vec![EnvironmentId::new("1"), EnvironmentId::new("2")]
    );
    assert!(model.requestable_schema_envs.is_empty());
}

#[test]
fn null_tenant_name_reads_as_empty() {
    let document =
        NameFormDocument::from_json(r#"{"tenantModel":{"tenantName":null}}"#).unwrap();
    assert_eq!(document.tenant_model.unwrap().tenant_name, "");
}

#[test]
fn invalid_json_is_malformed() {
    assert!(matches!(
        NameFormDocument::from_json("[1, 2"),
        Err(TenantConfigError::MalformedConfiguration(_))
    ));
}

#[test]
fn canonical_form_sorts_keys_and_omits_absent_singulars() {
    let document = NameFormDocument::from_json(r#"{"tenantModel":{"tenantName":"acme"}}"#).unwrap();
    assert_eq!(
        document.to_canonical_json().unwrap(),
        concat!(
            r#"{"tenantModel":{"orderOfConnectorsPromotionEnvsList":[],"#,
            r#""orderOfTopicPromotionEnvsList":[],"requestConnectorsEnvironmentsList":[],"#,
            r#""requestSchemaEnvironmentsList":[],"requestTopicsEnvironmentsList":[],"#,
            r#""tenantName":"acme"}}"#
        )
    );
}
