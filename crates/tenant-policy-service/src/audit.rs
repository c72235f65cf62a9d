// crates/tenant-policy-service/src/audit.rs
// ============================================================================
// Module: Configuration Audit Logging
// Description: Structured audit events for configuration updates.
// Purpose: Record every update outcome as one JSON line.
// Dependencies: tenant-policy-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Each configuration update, accepted or not, produces one
//! [`ConfigAuditEvent`]. Sinks render events as JSON lines to stderr or an
//! append-only file; the no-op sink discards them. Raw values are never
//! recorded, only the key and the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use tenant_policy_core::TenantConfigError;
use tenant_policy_core::TenantId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome classification for an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigAuditOutcome {
    /// The value was persisted.
    Accepted,
    /// The caller was rejected by a gate or by validation.
    Rejected,
    /// The directory or the store failed.
    Failed,
}

impl ConfigAuditOutcome {
    /// Classifies a core error.
    #[must_use]
    pub const fn for_error(error: &TenantConfigError) -> Self {
        if error.is_caller_error() { Self::Rejected } else { Self::Failed }
    }
}

/// Configuration update audit payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Tenant the update was applied to.
    pub tenant_id: TenantId,
    /// Caller subject.
    pub principal: String,
    /// Property key being updated.
    pub key: String,
    /// Update outcome.
    pub outcome: ConfigAuditOutcome,
    /// Stable error label when the update did not succeed.
    pub error_kind: Option<&'static str>,
    /// Error detail when the update did not succeed.
    pub detail: Option<String>,
}

/// Inputs for constructing a configuration audit event.
pub struct ConfigAuditEventParams {
    /// Tenant the update was applied to.
    pub tenant_id: TenantId,
    /// Caller subject.
    pub principal: String,
    /// Property key being updated.
    pub key: String,
    /// Update outcome.
    pub outcome: ConfigAuditOutcome,
    /// Stable error label when the update did not succeed.
    pub error_kind: Option<&'static str>,
    /// Error detail when the update did not succeed.
    pub detail: Option<String>,
}

impl ConfigAuditEventParams {
    /// Builds parameters for an accepted update.
    #[must_use]
    pub fn accepted(tenant_id: TenantId, principal: &str, key: &str) -> Self {
        Self {
            tenant_id,
            principal: principal.to_string(),
            key: key.to_string(),
            outcome: ConfigAuditOutcome::Accepted,
            error_kind: None,
            detail: None,
        }
    }

    /// Builds parameters for an update that returned `error`.
    #[must_use]
    pub fn from_error(
        tenant_id: TenantId,
        principal: &str,
        key: &str,
        error: &TenantConfigError,
    ) -> Self {
        Self {
            tenant_id,
            principal: principal.to_string(),
            key: key.to_string(),
            outcome: ConfigAuditOutcome::for_error(error),
            error_kind: Some(error.kind()),
            detail: Some(error.to_string()),
        }
    }
}

impl ConfigAuditEvent {
    /// Creates a configuration update audit event.
    #[must_use]
    pub fn new(params: ConfigAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "config_update",
            timestamp_ms,
            tenant_id: params.tenant_id,
            principal: params.principal,
            key: params.key,
            outcome: params.outcome,
            error_kind: params.error_kind,
            detail: params.detail,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for configuration update events.
pub trait ConfigAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ConfigAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct ConfigStderrAuditSink;

impl ConfigAuditSink for ConfigStderrAuditSink {
    fn record(&self, event: &ConfigAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct ConfigFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl ConfigFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ConfigAuditSink for ConfigFileAuditSink {
    fn record(&self, event: &ConfigAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct ConfigNoopAuditSink;

impl ConfigAuditSink for ConfigNoopAuditSink {
    fn record(&self, _event: &ConfigAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use std::fs;

    use super::*;

    #[test]
    fn caller_errors_are_rejections() {
        let error = TenantConfigError::UnknownResource("PRD".to_string());
        let params = ConfigAuditEventParams::from_error(TenantId::new(102), "alice", "k", &error);
        assert_eq!(params.outcome, ConfigAuditOutcome::Rejected);
        assert_eq!(params.error_kind, Some("unknown_resource"));
    }

    #[test]
    fn store_errors_are_failures() {
        let error = TenantConfigError::PersistenceFailure("disk".to_string());
        assert_eq!(ConfigAuditOutcome::for_error(&error), ConfigAuditOutcome::Failed);
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = ConfigFileAuditSink::new(&path).unwrap();
        for key in ["a", "b"] {
            sink.record(&ConfigAuditEvent::new(ConfigAuditEventParams::accepted(
                TenantId::new(101),
                "admin",
                key,
            )));
        }
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "config_update");
        assert_eq!(first["tenant_id"], 101);
        assert_eq!(first["outcome"], "accepted");
        assert_eq!(first["key"], "a");
    }
}
