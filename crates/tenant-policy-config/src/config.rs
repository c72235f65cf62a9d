// crates/tenant-policy-config/src/config.rs
// ============================================================================
// Module: Tenant Policy Configuration
// Description: Configuration loading and validation for tenant policy services.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: tenant-policy-core, tenant-policy-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file seeds the static tenant and environment directories, the access
//! policy, principal capabilities, the property store backend, the audit sink,
//! and the server property listing. Invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tenant_policy_core::AccessPolicy;
use tenant_policy_core::Capability;
use tenant_policy_core::DEFAULT_TENANT_ID;
use tenant_policy_core::Domain;
use tenant_policy_core::Environment;
use tenant_policy_core::InMemoryEnvironmentDirectory;
use tenant_policy_core::InMemoryTenantDirectory;
use tenant_policy_core::TENANT_CONFIG_PROPERTY;
use tenant_policy_core::Tenant;
use tenant_policy_core::TenantId;
use tenant_policy_store_sqlite::SqliteStoreConfig;
use tenant_policy_store_sqlite::SqliteStoreMode;
use tenant_policy_store_sqlite::SqliteSyncMode;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "tenant-policy.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TENANT_POLICY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured tenants.
pub(crate) const MAX_TENANTS: usize = 1024;
/// Maximum number of environments per tenant.
pub(crate) const MAX_ENVIRONMENTS_PER_TENANT: usize = 512;
/// Maximum number of configured principals.
pub(crate) const MAX_PRINCIPALS: usize = 1024;
/// Maximum number of admin-editable keys.
pub(crate) const MAX_ADMIN_EDITABLE_KEYS: usize = 256;
/// Maximum number of server property entries.
pub(crate) const MAX_SERVER_PROPERTIES: usize = 4096;
/// Maximum length of names, keys, and subjects.
pub(crate) const MAX_NAME_LENGTH: usize = 255;
/// Default busy timeout for the `SQLite` store (ms).
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Tenant policy service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantPolicyConfig {
    /// Access policy configuration.
    #[serde(default)]
    pub access: AccessConfig,
    /// Property store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Server property listing configuration.
    #[serde(default)]
    pub server_properties: ServerPropertiesConfig,
    /// Static tenant directory seed.
    #[serde(default)]
    pub tenants: Vec<TenantConfig>,
    /// Principal capability bindings.
    #[serde(default)]
    pub principals: Vec<PrincipalConfig>,
}

impl TenantPolicyConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.access.validate()?;
        self.store.validate()?;
        self.audit.validate()?;
        self.server_properties.validate()?;
        self.validate_tenants()?;
        self.validate_principals()?;
        Ok(())
    }

    /// Builds the key allow-list policy.
    #[must_use]
    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(
            TenantId::new(self.access.default_tenant_id),
            self.access.admin_editable_keys.iter().cloned(),
        )
    }

    /// Builds the static tenant directory.
    #[must_use]
    pub fn tenant_directory(&self) -> InMemoryTenantDirectory {
        InMemoryTenantDirectory::with_tenants(self.tenants.iter().map(|tenant| Tenant {
            id: TenantId::new(tenant.id),
            name: tenant.name.clone(),
        }))
    }

    /// Builds the static environment directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when two environments collide.
    pub fn environment_directory(&self) -> Result<InMemoryEnvironmentDirectory, ConfigError> {
        let entries = self.tenants.iter().flat_map(|tenant| {
            tenant.environments.iter().map(|env| {
                Environment::new(
                    TenantId::new(tenant.id),
                    env.domain,
                    env.id.clone(),
                    env.name.clone(),
                )
            })
        });
        InMemoryEnvironmentDirectory::with_environments(entries)
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Returns the principal binding for a subject.
    #[must_use]
    pub fn principal(&self, subject: &str) -> Option<&PrincipalConfig> {
        self.principals.iter().find(|principal| principal.subject == subject)
    }

    /// Validates tenant and environment entries.
    fn validate_tenants(&self) -> Result<(), ConfigError> {
        if self.tenants.len() > MAX_TENANTS {
            return Err(ConfigError::Invalid(format!("too many tenants (max {MAX_TENANTS})")));
        }
        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for tenant in &self.tenants {
            validate_name("tenants.name", &tenant.name)?;
            if !ids.insert(tenant.id) {
                return Err(ConfigError::Invalid(format!("duplicate tenant id: {}", tenant.id)));
            }
            if !names.insert(tenant.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate tenant name: {}",
                    tenant.name
                )));
            }
            tenant.validate()?;
        }
        Ok(())
    }

    /// Validates principal bindings.
    fn validate_principals(&self) -> Result<(), ConfigError> {
        if self.principals.len() > MAX_PRINCIPALS {
            return Err(ConfigError::Invalid(format!(
                "too many principals (max {MAX_PRINCIPALS})"
            )));
        }
        let mut subjects = BTreeSet::new();
        for principal in &self.principals {
            validate_name("principals.subject", &principal.subject)?;
            if !subjects.insert(principal.subject.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate principal subject: {}",
                    principal.subject
                )));
            }
            let known_tenant = principal.tenant_id == self.access.default_tenant_id
                || self.tenants.iter().any(|tenant| tenant.id == principal.tenant_id);
            if !known_tenant {
                return Err(ConfigError::Invalid(format!(
                    "principal {} references unknown tenant {}",
                    principal.subject, principal.tenant_id
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Access
// ============================================================================

/// Access policy configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Tenant allowed to edit every key.
    #[serde(default = "default_tenant_id")]
    pub default_tenant_id: u32,
    /// Keys editable by non-default tenants.
    #[serde(default = "default_admin_editable_keys")]
    pub admin_editable_keys: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            default_tenant_id: default_tenant_id(),
            admin_editable_keys: default_admin_editable_keys(),
        }
    }
}

impl AccessConfig {
    /// Validates access configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_editable_keys.len() > MAX_ADMIN_EDITABLE_KEYS {
            return Err(ConfigError::Invalid(format!(
                "access.admin_editable_keys exceeds max entries ({MAX_ADMIN_EDITABLE_KEYS})"
            )));
        }
        for key in &self.admin_editable_keys {
            validate_name("access.admin_editable_keys", key)?;
        }
        Ok(())
    }
}

/// Returns the default tenant identifier.
const fn default_tenant_id() -> u32 {
    DEFAULT_TENANT_ID.get()
}

/// Returns the default admin allow-list.
fn default_admin_editable_keys() -> Vec<String> {
    vec![TENANT_CONFIG_PROPERTY.to_string()]
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Property store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Property store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory store must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path_string("store.path", &path.to_string_lossy())
            }
        }
    }

    /// Returns the `SQLite` store configuration when the sqlite backend is selected.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => {
                let mut config = SqliteStoreConfig::new(path.clone());
                config.busy_timeout_ms = self.busy_timeout_ms;
                config.journal_mode = self.journal_mode;
                config.sync_mode = self.sync_mode;
                Some(config)
            }
            _ => None,
        }
    }
}

/// Returns the default store busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// Append-only JSON lines file.
    File,
    /// Discard audit events.
    None,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink type.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkType::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (AuditSinkType::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires path".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Server Properties
// ============================================================================

/// Server property listing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerPropertiesConfig {
    /// Key prefixes eligible for listing.
    #[serde(default = "default_allowed_prefixes")]
    pub allowed_prefixes: Vec<String>,
    /// Property entries in source order.
    #[serde(default)]
    pub entries: Vec<ServerPropertyEntry>,
}

impl Default for ServerPropertiesConfig {
    fn default() -> Self {
        Self {
            allowed_prefixes: default_allowed_prefixes(),
            entries: Vec::new(),
        }
    }
}

impl ServerPropertiesConfig {
    /// Validates server property configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.len() > MAX_SERVER_PROPERTIES {
            return Err(ConfigError::Invalid(format!(
                "server_properties.entries exceeds max entries ({MAX_SERVER_PROPERTIES})"
            )));
        }
        for prefix in &self.allowed_prefixes {
            validate_name("server_properties.allowed_prefixes", prefix)?;
        }
        for entry in &self.entries {
            validate_name("server_properties.entries.key", &entry.key)?;
        }
        Ok(())
    }
}

/// Single server property.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerPropertyEntry {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: String,
}

/// Returns the default listable prefixes.
fn default_allowed_prefixes() -> Vec<String> {
    ["governance.", "server.", "spring.", "tenant."].into_iter().map(str::to_string).collect()
}

// ============================================================================
// SECTION: Tenants
// ============================================================================

/// Static tenant entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantConfig {
    /// Tenant identifier.
    pub id: u32,
    /// Tenant name.
    pub name: String,
    /// Environments owned by the tenant.
    #[serde(default)]
    pub environments: Vec<EnvironmentConfig>,
}

impl TenantConfig {
    /// Validates environment uniqueness within the tenant.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.environments.len() > MAX_ENVIRONMENTS_PER_TENANT {
            return Err(ConfigError::Invalid(format!(
                "tenant {} exceeds max environments ({MAX_ENVIRONMENTS_PER_TENANT})",
                self.name
            )));
        }
        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();
        for env in &self.environments {
            validate_name("tenants.environments.id", &env.id)?;
            validate_name("tenants.environments.name", &env.name)?;
            if !ids.insert((env.domain, env.id.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "tenant {} has duplicate {} environment id {}",
                    self.name,
                    env.domain.as_str(),
                    env.id
                )));
            }
            if !names.insert((env.domain, env.name.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "tenant {} has duplicate {} environment name {}",
                    self.name,
                    env.domain.as_str(),
                    env.name
                )));
            }
        }
        Ok(())
    }
}

/// Static environment entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Stable environment identifier.
    pub id: String,
    /// Current environment name.
    pub name: String,
    /// Resource domain.
    pub domain: Domain,
}

// ============================================================================
// SECTION: Principals
// ============================================================================

/// Principal capability binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrincipalConfig {
    /// Subject identifier.
    pub subject: String,
    /// Tenant the principal acts for.
    pub tenant_id: u32,
    /// Granted capabilities.
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a name, key, or subject string.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_rejects_blank() {
        assert!(validate_name("field", "  ").is_err());
        assert!(validate_name("field", "ok").is_ok());
    }

    #[test]
    fn validate_path_string_rejects_long_component() {
        let component = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        let result = validate_path_string("store.path", &component);
        assert!(result.is_err(), "overlong component should fail");
    }

    #[test]
    fn default_config_is_valid() {
        let config = TenantPolicyConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.access_policy().is_default_tenant(DEFAULT_TENANT_ID));
    }
}
