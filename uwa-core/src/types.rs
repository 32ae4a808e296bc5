//! Core types for UWA synthesis.
//!
//! These types model the entity types, the closed raw field vocabulary and the
//! records held by the identity record store.
//!
//! With the `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs for consistency with the questionnaire frontend.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Version of the [`FieldName`] vocabulary. Bumped whenever a field is added or removed.
pub const FIELD_SET_VERSION: u32 = 1;

/// Errors raised while interpreting caller-supplied names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Field name outside the closed vocabulary
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Entity type name that matches no known entity type
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),
}

/// Category of identity subject a token is generated for.
///
/// The entity type selects both the default inclusion profile and the
/// extraction scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A natural person
    Human,
    /// Virtual machine or cloud instance
    VirtualMachine,
    /// Physical machine (server, workstation, device)
    PhysicalMachine,
    /// API client
    Api,
    /// Third-party organization
    ThirdParty,
    /// Owner of a business
    BusinessOwner,
    /// Interactive user account
    UserAccount,
    /// Non-interactive service account
    ServiceAccount,
    /// Virtual persona
    Avatar,
}

impl EntityType {
    /// All entity types in declaration order.
    pub const ALL: [EntityType; 9] = [
        Self::Human,
        Self::VirtualMachine,
        Self::PhysicalMachine,
        Self::Api,
        Self::ThirdParty,
        Self::BusinessOwner,
        Self::UserAccount,
        Self::ServiceAccount,
        Self::Avatar,
    ];

    /// Canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::VirtualMachine => "virtual_machine",
            Self::PhysicalMachine => "physical_machine",
            Self::Api => "api",
            Self::ThirdParty => "third_party",
            Self::BusinessOwner => "business_owner",
            Self::UserAccount => "user_account",
            Self::ServiceAccount => "service_account",
            Self::Avatar => "avatar",
        }
    }

    /// Whether this entity type describes a machine.
    pub fn is_machine(&self) -> bool {
        matches!(self, Self::VirtualMachine | Self::PhysicalMachine)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let entity = match normalized.as_str() {
            "human" => Self::Human,
            "virtual_machine" | "machine_vm" | "vm" => Self::VirtualMachine,
            "physical_machine" | "machine_physical" | "physical" => Self::PhysicalMachine,
            "api" | "api_client" => Self::Api,
            "third_party" => Self::ThirdParty,
            "business_owner" => Self::BusinessOwner,
            "user_account" => Self::UserAccount,
            "service_account" => Self::ServiceAccount,
            "avatar" => Self::Avatar,
            _ => return Err(FieldError::UnknownEntityType(s.to_string())),
        };
        Ok(entity)
    }
}

/// Closed vocabulary of raw field names accepted from callers.
///
/// Wire names are camelCase (`instanceUuid`, `osName`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    InstanceUuid,
    Environment,
    OsName,
    Address,
    SerialNumber,
    MacAddress,
    IpAddress,
    ServerId,
    Name,
    DateOfBirth,
    Birthplace,
    PhoneEinSsn,
    DriverLicensePassport,
    PrimaryAuthDeviceImei,
    MakeModelOs,
    DateOfManufacture,
    VinNumber,
    Email,
    BusinessName,
    Ein,
    ClientId,
    ApiKeyId,
    AccountId,
    AvatarHandle,
    Platform,
    OrganizationId,
    IntermediaryId,
    GeoLocation,
}

impl FieldName {
    /// Every field in the current vocabulary.
    pub const ALL: [FieldName; 28] = [
        Self::InstanceUuid,
        Self::Environment,
        Self::OsName,
        Self::Address,
        Self::SerialNumber,
        Self::MacAddress,
        Self::IpAddress,
        Self::ServerId,
        Self::Name,
        Self::DateOfBirth,
        Self::Birthplace,
        Self::PhoneEinSsn,
        Self::DriverLicensePassport,
        Self::PrimaryAuthDeviceImei,
        Self::MakeModelOs,
        Self::DateOfManufacture,
        Self::VinNumber,
        Self::Email,
        Self::BusinessName,
        Self::Ein,
        Self::ClientId,
        Self::ApiKeyId,
        Self::AccountId,
        Self::AvatarHandle,
        Self::Platform,
        Self::OrganizationId,
        Self::IntermediaryId,
        Self::GeoLocation,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstanceUuid => "instanceUuid",
            Self::Environment => "environment",
            Self::OsName => "osName",
            Self::Address => "address",
            Self::SerialNumber => "serialNumber",
            Self::MacAddress => "macAddress",
            Self::IpAddress => "ipAddress",
            Self::ServerId => "serverId",
            Self::Name => "name",
            Self::DateOfBirth => "dateOfBirth",
            Self::Birthplace => "birthplace",
            Self::PhoneEinSsn => "phoneEinSsn",
            Self::DriverLicensePassport => "driverLicensePassport",
            Self::PrimaryAuthDeviceImei => "primaryAuthDeviceImei",
            Self::MakeModelOs => "makeModelOs",
            Self::DateOfManufacture => "dateOfManufacture",
            Self::VinNumber => "vinNumber",
            Self::Email => "email",
            Self::BusinessName => "businessName",
            Self::Ein => "ein",
            Self::ClientId => "clientId",
            Self::ApiKeyId => "apiKeyId",
            Self::AccountId => "accountId",
            Self::AvatarHandle => "avatarHandle",
            Self::Platform => "platform",
            Self::OrganizationId => "organizationId",
            Self::IntermediaryId => "intermediaryId",
            Self::GeoLocation => "geoLocation",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// What to do with field names outside the [`FieldName`] vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Fail with [`FieldError::UnknownField`]
    #[default]
    Reject,
    /// Drop the field and continue
    Ignore,
}

/// Caller-supplied raw identity attributes.
///
/// Blank values are treated as absent: [`RawFieldSet::get`] never returns an
/// empty or whitespace-only string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFieldSet {
    values: BTreeMap<FieldName, String>,
}

impl RawFieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a field value.
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field value, replacing any previous one.
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Remove a field.
    pub fn remove(&mut self, field: FieldName) -> Option<String> {
        self.values.remove(&field)
    }

    /// Get a non-blank value.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values
            .get(&field)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Whether the field carries a non-blank value.
    pub fn has(&self, field: FieldName) -> bool {
        self.get(field).is_some()
    }

    /// Iterate over non-blank values in field order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (*k, v.as_str()))
    }

    /// Build a field set from string-keyed pairs, applying the unknown-field policy.
    pub fn from_pairs<K, V>(
        pairs: impl IntoIterator<Item = (K, V)>,
        policy: UnknownFieldPolicy,
    ) -> Result<Self, FieldError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (key, value) in pairs {
            match key.as_ref().parse::<FieldName>() {
                Ok(field) => set.set(field, value),
                Err(err) => match policy {
                    UnknownFieldPolicy::Reject => return Err(err),
                    UnknownFieldPolicy::Ignore => {
                        tracing::debug!(field = %key.as_ref(), "Ignoring unknown field");
                    }
                },
            }
        }
        Ok(set)
    }
}

/// A generated token together with the inputs it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UwaRecord {
    /// Process-local, monotonic identifier
    pub id: u64,
    /// Synthesized token (unchunked)
    pub token: String,
    /// Entity type the token was synthesized for
    pub entity_type: EntityType,
    /// Raw fields the token was synthesized from
    #[cfg_attr(feature = "typescript", ts(type = "Record<string, string>"))]
    pub fields: RawFieldSet,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last regenerated
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the record is active
    pub active: bool,
    /// Fingerprint of the inclusion profile that validated the fields
    pub profile_fingerprint: String,
}
