// crates/tenant-policy-core/tests/validation.rs
// ============================================================================
// Module: Configuration Validator Tests
// Description: Ordering and fail-fast behavior of reference validation.
// Purpose: Ensure the first unknown reference in check order is reported.
// Dependencies: tenant-policy-core
// ============================================================================
//! ## Overview
//! Validation reports base sync problems before list problems, and lists in
//! a fixed order. Valid configurations resolve to the owning tenant.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;

use tenant_policy_core::ConfigurationValidator;
use tenant_policy_core::DirectoryError;
use tenant_policy_core::Domain;
use tenant_policy_core::Environment;
use tenant_policy_core::EnvironmentDirectory;
use tenant_policy_core::EnvironmentName;
use tenant_policy_core::NameFormConfiguration;
use tenant_policy_core::TenantConfigError;
use tenant_policy_core::TenantId;

use crate::common::ACME;
use crate::common::fixture;

fn validator() -> ConfigurationValidator {
    let fixture = fixture();
    ConfigurationValidator::new(Arc::new(fixture.tenants), Arc::new(fixture.environments))
}

fn names(values: &[&str]) -> Vec<EnvironmentName> {
    values.iter().map(|value| EnvironmentName::new(*value)).collect()
}

#[test]
fn valid_configuration_resolves_tenant() {
    let mut config = NameFormConfiguration::empty("acme");
    config.base_sync_environment = Some(EnvironmentName::new("DEV"));
    config.base_sync_connect_cluster = Some(EnvironmentName::new("DEV_CONNECT"));
    config.ordered_topic_promotion_envs = names(&["DEV", "TST"]);
    config.ordered_connector_promotion_envs = names(&["DEV_CONNECT"]);
    config.requestable_topic_envs = names(&["TST"]);
    config.requestable_connector_envs = names(&["DEV_CONNECT"]);
    config.requestable_schema_envs = names(&["DEV_SCHEMA"]);
    assert_eq!(validator().validate(&config), Ok(ACME));
}

#[test]
fn base_sync_is_checked_before_lists() {
    let mut config = NameFormConfiguration::empty("acme");
    config.base_sync_environment = Some(EnvironmentName::new("DEV_CONNECT"));
    config.ordered_topic_promotion_envs = names(&["NOPE"]);
    assert_eq!(
        validator().validate(&config),
        Err(TenantConfigError::InvalidBaseSyncEnvironment("DEV_CONNECT".to_string()))
    );
}

#[test]
fn connect_cluster_must_exist_in_connect_domain() {
    let mut config = NameFormConfiguration::empty("acme");
    config.base_sync_connect_cluster = Some(EnvironmentName::new("DEV"));
    assert_eq!(
        validator().validate(&config),
        Err(TenantConfigError::InvalidBaseSyncEnvironment("DEV".to_string()))
    );
}

#[test]
fn first_failing_list_in_check_order_is_reported() {
    let mut config = NameFormConfiguration::empty("acme");
    config.requestable_schema_envs = names(&["MISSING_SCHEMA"]);
    config.ordered_connector_promotion_envs = names(&["DEV_CONNECT", "MISSING_CONNECT"]);
    config.requestable_topic_envs = names(&["MISSING_TOPIC"]);
    assert_eq!(
        validator().validate(&config),
        Err(TenantConfigError::UnknownResource("MISSING_CONNECT".to_string()))
    );
}

#[test]
fn schema_list_is_validated() {
    let mut config = NameFormConfiguration::empty("acme");
    config.requestable_schema_envs = names(&["DEV"]);
    assert_eq!(
        validator().validate(&config),
        Err(TenantConfigError::UnknownResource("DEV".to_string()))
    );
}

#[test]
fn other_tenant_environments_do_not_validate() {
    let mut config = NameFormConfiguration::empty("acme");
    config.requestable_topic_envs = names(&["PRD"]);
    assert_eq!(
        validator().validate(&config),
        Err(TenantConfigError::UnknownResource("PRD".to_string()))
    );
}

struct BrokenDirectory;

impl EnvironmentDirectory for BrokenDirectory {
    fn list_environments(
        &self,
        _tenant_id: TenantId,
        _domain: Domain,
    ) -> Result<Vec<Environment>, DirectoryError> {
        Err(DirectoryError::Unavailable("offline".to_string()))
    }
}

#[test]
fn directory_outage_is_reported_as_unavailable() {
    let fixture = fixture();
    let validator =
        ConfigurationValidator::new(Arc::new(fixture.tenants), Arc::new(BrokenDirectory));
    assert_eq!(
        validator.validate(&NameFormConfiguration::empty("acme")),
        Err(TenantConfigError::DirectoryUnavailable("offline".to_string()))
    );
}
