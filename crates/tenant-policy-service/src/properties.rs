// crates/tenant-policy-service/src/properties.rs
// ============================================================================
// Module: Server Property Snapshot
// Description: Masked, filtered listing of server properties.
// Purpose: Expose server settings without leaking credentials or paths.
// Dependencies: tenant-policy-config, serde
// ============================================================================

//! ## Overview
//! A [`ServerPropertySnapshot`] is built once from a key/value source and is
//! immutable afterwards. Building applies, in order:
//! - keys must start with an allowed prefix
//! - keys mentioning paths, secret keys, passwords, or user names are dropped
//! - credential-like values are replaced by [`MASKED_VALUE`]
//! - remaining values are wrapped at [`WRAP_WIDTH`] columns
//!
//! The first occurrence of a key wins and entries are sorted by key.
//! [`ServerPropertyHandle`] holds the current snapshot and swaps it on refresh.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use serde::Serialize;
use tenant_policy_config::ServerPropertiesConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Replacement text for credential-like values.
pub const MASKED_VALUE: &str = "*******";
/// Column at which long values are wrapped.
pub const WRAP_WIDTH: usize = 125;
/// Key fragments that exclude a property from the listing.
const EXCLUDED_FRAGMENTS: [&str; 3] = ["secretkey", "password", "username"];
/// Key fragments whose values are masked.
const MASKED_FRAGMENTS: [&str; 5] = ["password", "license", "pwd", "cert", "secret"];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Listed server property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerProperty {
    /// Property key.
    pub key: String,
    /// Masked or wrapped value.
    pub value: String,
}

/// Immutable listing of server properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerPropertySnapshot {
    /// Entries sorted by key.
    entries: Vec<ServerProperty>,
}

impl ServerPropertySnapshot {
    /// Builds a snapshot from `(key, value)` pairs in source order.
    #[must_use]
    pub fn build<'a, I>(allowed_prefixes: &[String], source: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut listed: BTreeMap<&str, String> = BTreeMap::new();
        for (key, value) in source {
            if listed.contains_key(key) || is_excluded(key) {
                continue;
            }
            if !allowed_prefixes.iter().any(|prefix| key.starts_with(prefix.as_str())) {
                continue;
            }
            let rendered = if is_masked(key) {
                MASKED_VALUE.to_string()
            } else {
                wrap_value(value, WRAP_WIDTH)
            };
            listed.insert(key, rendered);
        }
        let entries = listed
            .into_iter()
            .map(|(key, value)| ServerProperty {
                key: key.to_string(),
                value,
            })
            .collect();
        Self {
            entries,
        }
    }

    /// Builds a snapshot from the configuration section.
    #[must_use]
    pub fn from_config(config: &ServerPropertiesConfig) -> Self {
        Self::build(
            &config.allowed_prefixes,
            config.entries.iter().map(|entry| (entry.key.as_str(), entry.value.as_str())),
        )
    }

    /// Returns the listed entries sorted by key.
    #[must_use]
    pub fn entries(&self) -> &[ServerProperty] {
        &self.entries
    }

    /// Returns the listed value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .binary_search_by(|entry| entry.key.as_str().cmp(key))
            .ok()
            .map(|index| self.entries[index].value.as_str())
    }
}

/// Shared holder of the current snapshot.
#[derive(Debug, Default)]
pub struct ServerPropertyHandle {
    /// Current snapshot; replaced whole on refresh.
    current: RwLock<Arc<ServerPropertySnapshot>>,
}

impl ServerPropertyHandle {
    /// Creates a handle holding `snapshot`.
    #[must_use]
    pub fn new(snapshot: ServerPropertySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<ServerPropertySnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the current snapshot.
    pub fn refresh(&self, snapshot: ServerPropertySnapshot) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the key must not be listed.
fn is_excluded(key: &str) -> bool {
    key.to_lowercase().contains("path")
        || EXCLUDED_FRAGMENTS.iter().any(|fragment| key.contains(fragment))
}

/// Returns true when the value must be masked.
fn is_masked(key: &str) -> bool {
    MASKED_FRAGMENTS.iter().any(|fragment| key.contains(fragment))
}

/// Wraps `value` at `width` columns, breaking on spaces and splitting words
/// longer than a line.
fn wrap_value(value: &str, width: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut wrapped = String::with_capacity(value.len());
    let mut offset = 0;
    while chars.len() - offset > width {
        if chars[offset] == ' ' {
            offset += 1;
            continue;
        }
        let space = (offset ..= offset + width).rev().find(|index| chars[*index] == ' ');
        let end = space.unwrap_or(offset + width);
        wrapped.extend(&chars[offset .. end]);
        wrapped.push('\n');
        offset = space.map_or(end, |index| index + 1);
    }
    wrapped.extend(&chars[offset ..]);
    wrapped
}

// ============================================================================
// SECTION: Tests
// ============================================================================
