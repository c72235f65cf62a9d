// crates/tenant-policy-core/src/core/configuration.rs
// ============================================================================
// Module: Tenant Configuration Model
// Description: Tenant policy document parameterized by reference form.
// Purpose: Make the id-form / name-form distinction a compile-time property.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A tenant configuration references environments either by stable identifier
//! (stored form) or by display name (display form). Both shapes share one
//! generic type, [`TenantConfiguration`], parameterized by a [`ReferenceForm`]
//! marker. Resolution between the two forms is the only way to move a
//! configuration from one shape to the other, so a name-form document can
//! never be persisted by accident.
//!
//! The wire format wraps the model in a `tenantModel` object and uses the
//! camelCase field names of the public API. Unknown fields are ignored, and
//! an explicit `null` list or tenant name reads as empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::TenantConfigError;
use crate::core::hashing::canonical_json_bytes;
use crate::core::identifiers::EnvironmentId;
use crate::core::identifiers::EnvironmentName;

// ============================================================================
// SECTION: Reference Forms
// ============================================================================

/// Runtime tag naming the form of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// References hold environment identifiers.
    ById,
    /// References hold environment names.
    ByName,
}

/// Seals [`ReferenceForm`] to the two forms defined here.
mod sealed {
    /// Marker implemented only by [`super::ById`] and [`super::ByName`].
    pub trait Sealed {}
    impl Sealed for super::ById {}
    impl Sealed for super::ByName {}
}

/// Reference representation carried by a [`TenantConfiguration`].
pub trait ReferenceForm:
    sealed::Sealed + fmt::Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static
{
    /// Type of a single environment reference in this form.
    type Ref: fmt::Debug + Clone + PartialEq + Eq + Serialize + DeserializeOwned + Send + Sync;

    /// Runtime tag for this form.
    const KIND: FormKind;
}

/// Identifier form used for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ById;

impl ReferenceForm for ById {
    type Ref = EnvironmentId;

    const KIND: FormKind = FormKind::ById;
}

/// Name form used for display and input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByName;

impl ReferenceForm for ByName {
    type Ref = EnvironmentName;

    const KIND: FormKind = FormKind::ByName;
}

// ============================================================================
// SECTION: Tenant Configuration
// ============================================================================

/// Per-tenant policy document.
///
/// # Invariants
/// - Every reference is in the form named by `F`; forms are never mixed.
/// - List order is preserved; promotion lists are ordered pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TenantConfiguration<F: ReferenceForm> {
    /// Name of the tenant owning this configuration.
    #[serde(default, rename = "tenantName", deserialize_with = "null_as_default")]
    pub tenant_name: String,
    /// Base environment for topic synchronization (messaging domain).
    #[serde(default, rename = "baseSyncEnvironment", skip_serializing_if = "Option::is_none")]
    pub base_sync_environment: Option<F::Ref>,
    /// Base cluster for connector synchronization (connect domain).
    #[serde(
        default,
        rename = "baseSyncKafkaConnectCluster",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_sync_connect_cluster: Option<F::Ref>,
    /// Topic promotion pipeline, in stage order (messaging domain).
    #[serde(
        default,
        rename = "orderOfTopicPromotionEnvsList",
        deserialize_with = "null_as_default"
    )]
    pub ordered_topic_promotion_envs: Vec<F::Ref>,
    /// Connector promotion pipeline, in stage order (connect domain).
    #[serde(
        default,
        rename = "orderOfConnectorsPromotionEnvsList",
        deserialize_with = "null_as_default"
    )]
    pub ordered_connector_promotion_envs: Vec<F::Ref>,
    /// Environments accepting topic requests (messaging domain).
    #[serde(
        default,
        rename = "requestTopicsEnvironmentsList",
        deserialize_with = "null_as_default"
    )]
    pub requestable_topic_envs: Vec<F::Ref>,
    /// Environments accepting connector requests (connect domain).
    #[serde(
        default,
        rename = "requestConnectorsEnvironmentsList",
        deserialize_with = "null_as_default"
    )]
    pub requestable_connector_envs: Vec<F::Ref>,
    /// Environments accepting schema requests (schema registry domain).
    #[serde(
        default,
        rename = "requestSchemaEnvironmentsList",
        deserialize_with = "null_as_default"
    )]
    pub requestable_schema_envs: Vec<F::Ref>,
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl<F: ReferenceForm> TenantConfiguration<F> {
    /// Creates an empty configuration for the named tenant.
    #[must_use]
    pub fn empty(tenant_name: impl Into<String>) -> Self {
        Self {
            tenant_name: tenant_name.into(),
            base_sync_environment: None,
            base_sync_connect_cluster: None,
            ordered_topic_promotion_envs: Vec::new(),
            ordered_connector_promotion_envs: Vec::new(),
            requestable_topic_envs: Vec::new(),
            requestable_connector_envs: Vec::new(),
            requestable_schema_envs: Vec::new(),
        }
    }

    /// Returns the form tag of this configuration.
    #[must_use]
    pub const fn form(&self) -> FormKind {
        F::KIND
    }
}

/// Configuration as persisted (identifier references).
pub type IdFormConfiguration = TenantConfiguration<ById>;
/// Configuration as displayed and submitted (name references).
pub type NameFormConfiguration = TenantConfiguration<ByName>;

// ============================================================================
// SECTION: Configuration Document
// ============================================================================

/// Wire document wrapping a tenant configuration.
///
/// # Invariants
/// - A missing `tenantModel` is a valid, empty document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TenantConfigDocument<F: ReferenceForm> {
    /// Wrapped configuration, when present.
    #[serde(default, rename = "tenantModel", skip_serializing_if = "Option::is_none")]
    pub tenant_model: Option<TenantConfiguration<F>>,
}

impl<F: ReferenceForm> Default for TenantConfigDocument<F> {
    fn default() -> Self {
        Self {
            tenant_model: None,
        }
    }
}

impl<F: ReferenceForm> TenantConfigDocument<F> {
    /// Wraps a configuration into a document.
    #[must_use]
    pub fn new(model: TenantConfiguration<F>) -> Self {
        Self {
            tenant_model: Some(model),
        }
    }

    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError::MalformedConfiguration`] when the text is
    /// not a valid document.
    pub fn from_json(text: &str) -> Result<Self, TenantConfigError> {
        serde_json::from_str(text)
            .map_err(|err| TenantConfigError::MalformedConfiguration(err.to_string()))
    }

    /// Serializes the document as RFC 8785 canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError::MalformedConfiguration`] when serialization fails.
    pub fn to_canonical_json(&self) -> Result<String, TenantConfigError> {
        let bytes = canonical_json_bytes(self)
            .map_err(|err| TenantConfigError::MalformedConfiguration(err.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|err| TenantConfigError::MalformedConfiguration(err.to_string()))
    }

    /// Serializes the document as indented JSON for display.
    ///
    /// # Errors
    ///
    /// Returns [`TenantConfigError::MalformedConfiguration`] when serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, TenantConfigError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| TenantConfigError::MalformedConfiguration(err.to_string()))
    }
}

/// Stored document (identifier references).
pub type IdFormDocument = TenantConfigDocument<ById>;
/// Display document (name references).
pub type NameFormDocument = TenantConfigDocument<ByName>;
