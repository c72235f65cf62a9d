// crates/tenant-policy-service/tests/server_properties.rs
// ============================================================================
// Module: Server Property Snapshot Tests
// Description: Filtering, masking, wrapping, and refresh of server properties.
// Purpose: Ensure credentials and paths never appear in the listing.
// Dependencies: tenant-policy-service, proptest
// ============================================================================
//! ## Overview
//! Snapshot rules: prefix filter, key exclusions, value masking, wrapping at
//! 125 columns, first occurrence wins, sorted output. Listing is gated on the
//! management capability.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use tenant_policy_core::Principal;
use tenant_policy_service::MASKED_VALUE;
use tenant_policy_service::ServerPropertyHandle;
use tenant_policy_service::ServerPropertySnapshot;
use tenant_policy_service::WRAP_WIDTH;

use crate::common::admin;
use crate::common::fixture;

fn prefixes() -> Vec<String> {
    vec!["spring.".to_string(), "governance.".to_string()]
}

#[test]
fn only_allowed_prefixes_are_listed() {
    let snapshot = ServerPropertySnapshot::build(
        &prefixes(),
        [("spring.application.name", "gov"), ("java.home", "/usr"), ("governance.port", "9097")],
    );
    let keys: Vec<&str> = snapshot.entries().iter().map(|entry| entry.key.as_str()).collect();
    assert_eq!(keys, vec!["governance.port", "spring.application.name"]);
}

#[test]
fn sensitive_keys_are_excluded() {
    let snapshot = ServerPropertySnapshot::build(
        &prefixes(),
        [
            ("spring.ssl.trustStorePath", "/etc/ssl"),
            ("governance.aws.secretkey", "abc"),
            ("spring.datasource.password", "pw"),
            ("spring.datasource.username", "sa"),
        ],
    );
    assert!(snapshot.entries().is_empty());
}

#[test]
fn credential_like_values_are_masked() {
    let snapshot = ServerPropertySnapshot::build(
        &prefixes(),
        [
            ("governance.license.key", "LIC-123"),
            ("governance.db.pwd", "pw"),
            ("governance.ssl.cert", "pem"),
            ("governance.client.secret", "s3cr3t"),
            ("governance.mail.host", "smtp"),
        ],
    );
    for key in [
        "governance.license.key",
        "governance.db.pwd",
        "governance.ssl.cert",
        "governance.client.secret",
    ] {
        assert_eq!(snapshot.get(key), Some(MASKED_VALUE), "{key}");
    }
    assert_eq!(snapshot.get("governance.mail.host"), Some("smtp"));
}

#[test]
fn first_occurrence_wins() {
    let snapshot = ServerPropertySnapshot::build(
        &prefixes(),
        [("spring.profile", "first"), ("spring.profile", "second")],
    );
    assert_eq!(snapshot.entries().len(), 1);
    assert_eq!(snapshot.get("spring.profile"), Some("first"));
}

#[test]
fn long_values_are_wrapped() {
    let words = vec!["word"; 60].join(" ");
    let snapshot = ServerPropertySnapshot::build(&prefixes(), [("spring.banner", words.as_str())]);
    let value = snapshot.get("spring.banner").unwrap();
    assert!(value.contains('\n'));
    assert!(value.lines().all(|line| line.chars().count() <= WRAP_WIDTH));
    assert_eq!(value.replace('\n', " "), words);
}

#[test]
fn listing_requires_capability() {
    let fixture = fixture();
    assert!(fixture.service.get_server_properties(&Principal::new("mallory")).is_empty());
    let listed = fixture.service.get_server_properties(&admin());
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].key, "server.port");
    assert_eq!(listed[0].value, "8080");
    assert_eq!(listed[1].key, "server.ssl.cert");
    assert_eq!(listed[1].value, MASKED_VALUE);
}

#[test]
fn refresh_replaces_snapshot_for_all_readers() {
    let handle = Arc::new(ServerPropertyHandle::new(ServerPropertySnapshot::build(
        &prefixes(),
        [("spring.mode", "old")],
    )));
    let before = handle.current();
    handle.refresh(ServerPropertySnapshot::build(&prefixes(), [("spring.mode", "new")]));
    assert_eq!(before.get("spring.mode"), Some("old"));

    let readers: Vec<_> = (0 .. 4)
        .map(|_| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || handle.current().get("spring.mode").map(str::to_string))
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.join().unwrap().as_deref(), Some("new"));
    }
}

proptest! {
    #[test]
    fn unbroken_values_split_into_full_lines(value in "[a-z]{0,400}") {
        let snapshot =
            ServerPropertySnapshot::build(&prefixes(), [("spring.value", value.as_str())]);
        let wrapped = snapshot.get("spring.value").unwrap();
        prop_assert_eq!(wrapped.replace('\n', ""), value.clone());
        let lines: Vec<&str> = wrapped.split('\n').collect();
        for line in &lines[.. lines.len() - 1] {
            prop_assert_eq!(line.chars().count(), WRAP_WIDTH);
        }
    }
}
