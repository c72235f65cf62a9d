// crates/tenant-policy-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Property Store
// Description: Durable PropertyStore backed by SQLite WAL.
// Purpose: Persist per-tenant properties with integrity digests.
// Dependencies: tenant-policy-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! One row per `(tenant, key)`. Writes replace the row inside a transaction,
//! so concurrent writers leave exactly one complete value (last writer wins).
//! Each row stores a digest of its value; loads recompute it and reject rows
//! that no longer match.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use tenant_policy_core::DEFAULT_HASH_ALGORITHM;
use tenant_policy_core::HashAlgorithm;
use tenant_policy_core::ListedProperty;
use tenant_policy_core::PropertyKey;
use tenant_policy_core::PropertyStore;
use tenant_policy_core::PropertyStoreError;
use tenant_policy_core::StoredProperty;
use tenant_policy_core::TenantId;
use tenant_policy_core::hash_bytes;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum property value size accepted by the store.
pub const MAX_VALUE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` property store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `max_value_bytes` is greater than zero and at most [`MAX_VALUE_BYTES`].
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Maximum property value size in bytes.
    #[serde(default = "default_max_value_bytes")]
    pub max_value_bytes: usize,
}

impl SqliteStoreConfig {
    /// Builds a configuration with defaults for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_value_bytes: MAX_VALUE_BYTES,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default value size limit.
const fn default_max_value_bytes() -> usize {
    MAX_VALUE_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw property values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Value exceeded the configured size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for PropertyStoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) | SqliteStoreError::VersionMismatch(message) => {
                Self::Store(message)
            }
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "property value exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed property store with WAL support.
///
/// # Invariants
/// - Property loads verify stored hashes before returning values.
/// - `SQLite` connection access is serialized through a mutex.
#[derive(Clone)]
pub struct SqlitePropertyStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePropertyStore {
    /// Opens an `SQLite`-backed property store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        if config.max_value_bytes == 0 || config.max_value_bytes > MAX_VALUE_BYTES {
            return Err(SqliteStoreError::Invalid(format!(
                "max_value_bytes out of range: {} (max {MAX_VALUE_BYTES})",
                config.max_value_bytes
            )));
        }
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Loads a property and verifies its digest.
    fn load_property(
        &self,
        tenant_id: TenantId,
        key: &PropertyKey,
    ) -> Result<Option<StoredProperty>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))?;
        let row: Option<PropertyRow> = guard
            .query_row(
                "SELECT property_key, value, description, value_hash, hash_algorithm
                 FROM properties WHERE tenant_id = ?1 AND property_key = ?2",
                params![i64::from(tenant_id.get()), key.as_str()],
                PropertyRow::from_row,
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        row.map(|row| row.verify(tenant_id)).transpose()
    }

    /// Lists every property of the tenant ordered by key, verifying each row.
    fn load_properties(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<ListedProperty>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))?;
        let mut stmt = guard
            .prepare(
                "SELECT property_key, value, description, value_hash, hash_algorithm
                 FROM properties WHERE tenant_id = ?1 ORDER BY property_key",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = stmt
            .query_map(params![i64::from(tenant_id.get())], PropertyRow::from_row)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut results = Vec::new();
        for row in rows {
            let row = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            results.push(row.into_listed(tenant_id));
        }
        drop(stmt);
        drop(guard);
        Ok(results)
    }

    /// Replaces a property row.
    fn store_property(
        &self,
        tenant_id: TenantId,
        property: &StoredProperty,
    ) -> Result<(), SqliteStoreError> {
        let actual_bytes = property.value.len();
        if actual_bytes > self.config.max_value_bytes {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: self.config.max_value_bytes,
                actual_bytes,
            });
        }
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, property.value.as_bytes());
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.execute(
            "INSERT INTO properties (tenant_id, property_key, value, description, value_hash, \
             hash_algorithm, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (tenant_id, property_key) DO UPDATE SET
                 value = excluded.value,
                 description = excluded.description,
                 value_hash = excluded.value_hash,
                 hash_algorithm = excluded.hash_algorithm,
                 updated_at = excluded.updated_at",
            params![
                i64::from(tenant_id.get()),
                property.key.as_str(),
                property.value,
                property.description,
                digest.value,
                digest.algorithm.label(),
                unix_millis(),
            ],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }

    /// Verifies the store can execute a simple SQL statement.
    fn check_connection(&self) -> Result<(), SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))?;
        guard
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

impl PropertyStore for SqlitePropertyStore {
    fn read_property(
        &self,
        tenant_id: TenantId,
        key: &PropertyKey,
    ) -> Result<Option<StoredProperty>, PropertyStoreError> {
        self.load_property(tenant_id, key).map_err(PropertyStoreError::from)
    }

    fn write_property(
        &self,
        tenant_id: TenantId,
        property: &StoredProperty,
    ) -> Result<(), PropertyStoreError> {
        self.store_property(tenant_id, property).map_err(PropertyStoreError::from)
    }

    fn list_properties(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<ListedProperty>, PropertyStoreError> {
        self.load_properties(tenant_id).map_err(PropertyStoreError::from)
    }

    fn readiness(&self) -> Result<(), PropertyStoreError> {
        self.check_connection().map_err(PropertyStoreError::from)
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Raw property row as read from the database.
struct PropertyRow {
    /// Property key.
    key: String,
    /// Stored value.
    value: String,
    /// Stored description.
    description: String,
    /// Stored value digest.
    value_hash: String,
    /// Stored digest algorithm label.
    hash_algorithm: String,
}

impl PropertyRow {
    /// Maps a query row.
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            value: row.get(1)?,
            description: row.get(2)?,
            value_hash: row.get(3)?,
            hash_algorithm: row.get(4)?,
        })
    }

    /// Checks the stored digest against the value.
    fn check_digest(&self, tenant_id: TenantId) -> Result<(), SqliteStoreError> {
        let algorithm = parse_hash_algorithm(&self.hash_algorithm)?;
        let expected = hash_bytes(algorithm, self.value.as_bytes());
        if expected.value != self.value_hash {
            return Err(SqliteStoreError::Corrupt(format!(
                "hash mismatch for property {} of tenant {tenant_id}",
                self.key
            )));
        }
        Ok(())
    }

    /// Checks the digest and converts the row into a property.
    fn verify(self, tenant_id: TenantId) -> Result<StoredProperty, SqliteStoreError> {
        self.check_digest(tenant_id)?;
        Ok(StoredProperty {
            key: PropertyKey::new(self.key),
            value: self.value,
            description: self.description,
        })
    }

    /// Converts the row into a listing entry; a failed digest stays on the row.
    fn into_listed(self, tenant_id: TenantId) -> ListedProperty {
        let value = self
            .check_digest(tenant_id)
            .map(|()| self.value)
            .map_err(PropertyStoreError::from);
        ListedProperty {
            key: PropertyKey::new(self.key),
            description: self.description,
            value,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS properties (
                    tenant_id INTEGER NOT NULL,
                    property_key TEXT NOT NULL,
                    value TEXT NOT NULL,
                    description TEXT NOT NULL,
                    value_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    updated_at INTEGER NOT NULL,
                    PRIMARY KEY (tenant_id, property_key)
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Parses a hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    HashAlgorithm::from_label(label)
        .ok_or_else(|| SqliteStoreError::Invalid(format!("unsupported hash algorithm: {label}")))
}
