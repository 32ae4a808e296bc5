//! Identity component catalog.
//!
//! The catalog is the immutable list of identity components a profile may
//! reference. It is built once per process and shared by every matrix and
//! synthesizer.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Serialize;

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::FieldName;

/// Error types for catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Component id not present in the catalog
    #[error("Component not found: {0}")]
    NotFound(String),
}

/// Broad grouping of identity components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    Personal,
    Security,
    Device,
    Server,
    Network,
    Identity,
    Business,
    Vehicle,
    Api,
    Biometric,
    Location,
    Organizational,
    Intermediate,
}

/// A named attribute of an identity subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct IdentityComponent {
    /// Stable identifier
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
    /// Category
    pub category: ComponentCategory,
    /// Whether the component may be included in a token profile at all
    pub eligible_for_token: bool,
    /// Raw field that carries this component's value, if any
    pub source_field: Option<FieldName>,
}

const fn component(
    id: &'static str,
    label: &'static str,
    category: ComponentCategory,
    eligible_for_token: bool,
    source_field: Option<FieldName>,
) -> IdentityComponent {
    IdentityComponent {
        id,
        label,
        category,
        eligible_for_token,
        source_field,
    }
}

use ComponentCategory as C;
use FieldName as F;

const STANDARD_COMPONENTS: [IdentityComponent; 31] = [
    // Personal
    component("name", "Name", C::Personal, true, Some(F::Name)),
    component("address", "Address", C::Personal, true, Some(F::Address)),
    component("birthplace", "Birthplace", C::Personal, true, Some(F::Birthplace)),
    component("dateOfBirth", "Date of Birth", C::Personal, true, Some(F::DateOfBirth)),
    component("email", "Email", C::Personal, true, Some(F::Email)),
    component("phoneEinSsnBvn", "Phone / EIN / SSN / BVN", C::Identity, true, Some(F::PhoneEinSsn)),
    component(
        "driverLicensePassport",
        "Driver License / Passport",
        C::Identity,
        true,
        Some(F::DriverLicensePassport),
    ),
    // Security
    component("pin", "PIN", C::Security, false, None),
    component("password", "Password", C::Security, false, None),
    // Device
    component("snImei", "Serial Number / IMEI", C::Device, true, Some(F::SerialNumber)),
    component("makeModelOs", "Make / Model / OS", C::Device, true, Some(F::MakeModelOs)),
    component(
        "dateOfManufacture",
        "Date of Manufacture",
        C::Device,
        true,
        Some(F::DateOfManufacture),
    ),
    component(
        "primaryAuthDeviceImei",
        "Primary Auth Device IMEI",
        C::Device,
        true,
        Some(F::PrimaryAuthDeviceImei),
    ),
    // Server
    component("ec2DoIdMacSn", "EC2 / DO Id / MAC / SN", C::Server, true, Some(F::InstanceUuid)),
    component("uuid", "Instance UUID", C::Server, true, Some(F::InstanceUuid)),
    component("os", "Operating System", C::Server, true, Some(F::OsName)),
    component("serverId", "Server Id", C::Server, true, Some(F::ServerId)),
    component("environment", "Environment", C::Server, true, Some(F::Environment)),
    // Network
    component("ipAddress", "IP Address", C::Network, true, Some(F::IpAddress)),
    component("macAddress", "MAC Address", C::Network, true, Some(F::MacAddress)),
    // Identity
    component("accountId", "Account Id", C::Identity, true, Some(F::AccountId)),
    component("avatarHandle", "Avatar Handle", C::Identity, true, Some(F::AvatarHandle)),
    // Business
    component("businessName", "Business Name", C::Business, true, Some(F::BusinessName)),
    component("ein", "Employer Identification Number", C::Business, true, Some(F::Ein)),
    // Vehicle
    component("vinNumber", "VIN Number", C::Vehicle, true, Some(F::VinNumber)),
    // API
    component("apiClientId", "API Client Id", C::Api, true, Some(F::ClientId)),
    component("apiKeyId", "API Key Id", C::Api, true, Some(F::ApiKeyId)),
    // Biometric data is never tokenized
    component("biometricTemplate", "Biometric Template", C::Biometric, false, None),
    // Location
    component("geoLocation", "Geo Location", C::Location, true, Some(F::GeoLocation)),
    // Organizational / intermediate
    component(
        "organizationId",
        "Organization Id",
        C::Organizational,
        true,
        Some(F::OrganizationId),
    ),
    component(
        "intermediaryId",
        "Intermediary Id",
        C::Intermediate,
        true,
        Some(F::IntermediaryId),
    ),
];

/// Registry of identity components, in stable insertion order.
#[derive(Debug)]
pub struct ComponentCatalog {
    components: Vec<IdentityComponent>,
    index: HashMap<&'static str, usize>,
}

impl ComponentCatalog {
    /// Build a catalog from a list of components.
    ///
    /// Later duplicates of an id are ignored.
    pub fn from_components(components: impl IntoIterator<Item = IdentityComponent>) -> Self {
        let mut list = Vec::new();
        let mut index = HashMap::new();
        for c in components {
            if index.contains_key(c.id) {
                tracing::warn!(component_id = %c.id, "Duplicate catalog component ignored");
                continue;
            }
            index.insert(c.id, list.len());
            list.push(c);
        }
        Self {
            components: list,
            index,
        }
    }

    /// The standard catalog shipped with the system, built on first use.
    pub fn standard() -> &'static ComponentCatalog {
        static CATALOG: OnceLock<ComponentCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| Self::from_components(STANDARD_COMPONENTS))
    }

    /// All components in insertion order.
    pub fn list(&self) -> &[IdentityComponent] {
        &self.components
    }

    /// Look up a component by id.
    pub fn get(&self, id: &str) -> Result<&IdentityComponent, CatalogError> {
        self.index
            .get(id)
            .map(|&i| &self.components[i])
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Whether the catalog contains `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a component in catalog order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Components that may appear in a token profile.
    pub fn eligible(&self) -> impl Iterator<Item = &IdentityComponent> {
        self.components.iter().filter(|c| c.eligible_for_token)
    }

    /// Components in a category.
    pub fn by_category(
        &self,
        category: ComponentCategory,
    ) -> impl Iterator<Item = &IdentityComponent> {
        self.components
            .iter()
            .filter(move |c| c.category == category)
    }

    /// Components sourced from a raw field.
    pub fn for_field(&self, field: FieldName) -> impl Iterator<Item = &IdentityComponent> {
        self.components
            .iter()
            .filter(move |c| c.source_field == Some(field))
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = ComponentCatalog::standard();
        assert_eq!(catalog.len(), 31);

        let ids: Vec<&str> = catalog.list().iter().map(|c| c.id).collect();
        let again: Vec<&str> = catalog.list().iter().map(|c| c.id).collect();
        assert_eq!(ids, again);
        assert_eq!(ids[0], "name");
    }

    #[test]
    fn test_lookup() {
        let catalog = ComponentCatalog::standard();
        assert_eq!(catalog.get("uuid").unwrap().category, ComponentCategory::Server);
        assert_eq!(
            catalog.get("nope").unwrap_err(),
            CatalogError::NotFound("nope".to_string())
        );
    }

    #[test]
    fn test_pin_is_ineligible() {
        let catalog = ComponentCatalog::standard();
        let pin = catalog.get("pin").unwrap();
        assert!(!pin.eligible_for_token);
        assert!(catalog.eligible().all(|c| c.id != "pin"));
    }

    #[test]
    fn test_for_field() {
        let catalog = ComponentCatalog::standard();
        let ids: Vec<&str> = catalog.for_field(FieldName::InstanceUuid).map(|c| c.id).collect();
        assert_eq!(ids, vec!["ec2DoIdMacSn", "uuid"]);
    }

    #[test]
    fn test_duplicates_ignored() {
        let catalog = ComponentCatalog::from_components([
            component("a", "A", C::Personal, true, None),
            component("a", "A again", C::Device, false, None),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a").unwrap().label, "A");
    }
}
