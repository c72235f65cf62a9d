// crates/tenant-policy-service/src/permissions.rs
// ============================================================================
// Module: Static Permissions
// Description: Capability grants loaded from principal configuration.
// Purpose: Provide a fail-closed permission checker for the service layer.
// Dependencies: tenant-policy-core, tenant-policy-config
// ============================================================================

//! Capability grants keyed by principal subject. Unknown subjects hold no
//! capabilities.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tenant_policy_config::PrincipalConfig;
use tenant_policy_core::Capability;
use tenant_policy_core::PermissionChecker;
use tenant_policy_core::Principal;

/// Permission checker backed by a static grant table.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissionChecker {
    /// Capabilities granted per subject.
    grants: BTreeMap<String, BTreeSet<Capability>>,
}

impl StaticPermissionChecker {
    /// Creates a checker with no grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a checker from configured principals.
    #[must_use]
    pub fn from_principals(principals: &[PrincipalConfig]) -> Self {
        let mut checker = Self::new();
        for principal in principals {
            for capability in &principal.capabilities {
                checker.grant(&principal.subject, *capability);
            }
        }
        checker
    }

    /// Grants a capability to a subject.
    pub fn grant(&mut self, subject: &str, capability: Capability) {
        self.grants.entry(subject.to_string()).or_default().insert(capability);
    }
}

impl PermissionChecker for StaticPermissionChecker {
    fn is_authorized(&self, principal: &Principal, capability: Capability) -> bool {
        self.grants.get(&principal.subject).is_some_and(|granted| granted.contains(&capability))
    }
}
