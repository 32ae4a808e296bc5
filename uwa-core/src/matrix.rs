//! Inclusion matrix: which identity components each entity type requires.
//!
//! Profiles are plain values. Editing a profile returns a new profile, and
//! callers pass the profile they want into every synthesis call. Loading and
//! saving overrides is the caller's concern.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::catalog::ComponentCatalog;
use crate::schemes::scheme_for;
use crate::types::EntityType;

/// Error types for inclusion matrix edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Component is not in the catalog
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// Component exists but may never be part of a token
    #[error("Component is not eligible for token inclusion: {0}")]
    IneligibleComponent(String),
}

/// Per-entity-type inclusion set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct EntityTypeProfile {
    /// Entity type the profile applies to
    pub entity_type: EntityType,
    /// Component id -> included
    pub inclusion: BTreeMap<String, bool>,
}

impl EntityTypeProfile {
    /// Whether a component is included. Absent components are excluded.
    pub fn is_included(&self, component_id: &str) -> bool {
        self.inclusion.get(component_id).copied().unwrap_or(false)
    }

    /// Included component ids, in catalog order.
    pub fn included_components<'a>(&'a self, catalog: &'a ComponentCatalog) -> Vec<&'a str> {
        catalog
            .list()
            .iter()
            .map(|c| c.id)
            .filter(|id| self.is_included(id))
            .collect()
    }

    /// SHA-256 fingerprint of the entity type and its included components.
    ///
    /// Two profiles with the same included set share a fingerprint regardless
    /// of how many components are explicitly marked excluded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.entity_type.as_str().as_bytes());
        for (id, included) in &self.inclusion {
            if *included {
                hasher.update(b"\n");
                hasher.update(id.as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}

/// Organization-level overrides: entity type -> component id -> included.
pub type OrganizationOverrides = HashMap<EntityType, BTreeMap<String, bool>>;

/// Builds and edits profiles against a component catalog.
#[derive(Debug, Clone, Copy)]
pub struct InclusionMatrix {
    catalog: &'static ComponentCatalog,
}

impl InclusionMatrix {
    /// Create a matrix over a catalog.
    pub fn new(catalog: &'static ComponentCatalog) -> Self {
        Self { catalog }
    }

    /// Create a matrix over the standard catalog.
    pub fn standard() -> Self {
        Self::new(ComponentCatalog::standard())
    }

    /// The catalog backing this matrix.
    pub fn catalog(&self) -> &'static ComponentCatalog {
        self.catalog
    }

    /// Baseline profile shipped for an entity type.
    ///
    /// Every eligible component appears as a key; the scheme's defaults are
    /// marked included.
    pub fn default_profile(&self, entity_type: EntityType) -> EntityTypeProfile {
        let defaults = scheme_for(entity_type).default_components();
        let inclusion = self
            .catalog
            .eligible()
            .map(|c| (c.id.to_string(), defaults.contains(&c.id)))
            .collect();

        EntityTypeProfile {
            entity_type,
            inclusion,
        }
    }

    /// Return a copy of `profile` with one component toggled.
    pub fn set_inclusion(
        &self,
        profile: &EntityTypeProfile,
        component_id: &str,
        included: bool,
    ) -> Result<EntityTypeProfile, MatrixError> {
        let component = self
            .catalog
            .get(component_id)
            .map_err(|_| MatrixError::UnknownComponent(component_id.to_string()))?;

        if !component.eligible_for_token {
            return Err(MatrixError::IneligibleComponent(component_id.to_string()));
        }

        let mut updated = profile.clone();
        updated.inclusion.insert(component_id.to_string(), included);
        Ok(updated)
    }

    /// Whether a component is included in a profile.
    pub fn is_included(&self, profile: &EntityTypeProfile, component_id: &str) -> bool {
        profile.is_included(component_id)
    }

    /// Default profile with organization overrides applied on top.
    pub fn profile_for(
        &self,
        entity_type: EntityType,
        overrides: &OrganizationOverrides,
    ) -> Result<EntityTypeProfile, MatrixError> {
        let mut profile = self.default_profile(entity_type);
        if let Some(entries) = overrides.get(&entity_type) {
            for (component_id, included) in entries {
                profile = self.set_inclusion(&profile, component_id, *included)?;
            }
            tracing::debug!(
                entity_type = %entity_type,
                overrides = entries.len(),
                "Applied organization overrides"
            );
        }
        Ok(profile)
    }

    /// Resolve a profile for every entity type.
    pub fn resolve_all(&self, overrides: &OrganizationOverrides) -> Result<ProfileSet, MatrixError> {
        let mut profiles = HashMap::new();
        for entity_type in EntityType::ALL {
            profiles.insert(entity_type, self.profile_for(entity_type, overrides)?);
        }
        Ok(ProfileSet { profiles })
    }

    /// Check the profile invariant: every key is a known, eligible component.
    pub fn validate(&self, profile: &EntityTypeProfile) -> Result<(), MatrixError> {
        for component_id in profile.inclusion.keys() {
            let component = self
                .catalog
                .get(component_id)
                .map_err(|_| MatrixError::UnknownComponent(component_id.clone()))?;
            if !component.eligible_for_token {
                return Err(MatrixError::IneligibleComponent(component_id.clone()));
            }
        }
        Ok(())
    }
}

impl Default for InclusionMatrix {
    fn default() -> Self {
        Self::standard()
    }
}

/// One resolved profile per entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSet {
    profiles: HashMap<EntityType, EntityTypeProfile>,
}

impl ProfileSet {
    /// Default profiles for every entity type.
    pub fn defaults(matrix: &InclusionMatrix) -> Self {
        let profiles = EntityType::ALL
            .into_iter()
            .map(|e| (e, matrix.default_profile(e)))
            .collect();
        Self { profiles }
    }

    /// Profile for an entity type.
    pub fn get(&self, entity_type: EntityType) -> Option<&EntityTypeProfile> {
        self.profiles.get(&entity_type)
    }

    /// Replace the profile for its entity type.
    pub fn insert(&mut self, profile: EntityTypeProfile) {
        self.profiles.insert(profile.entity_type, profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vm_defaults() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::VirtualMachine);

        for id in [
            "snImei",
            "makeModelOs",
            "dateOfManufacture",
            "ec2DoIdMacSn",
            "os",
            "uuid",
            "serverId",
            "environment",
            "ipAddress",
            "macAddress",
        ] {
            assert!(profile.is_included(id), "{id} should be included");
        }
        assert!(!profile.is_included("name"));
        assert!(!profile.is_included("pin"));
    }

    #[test]
    fn test_pin_never_in_defaults() {
        let matrix = InclusionMatrix::standard();
        for entity in EntityType::ALL {
            let profile = matrix.default_profile(entity);
            assert!(!profile.inclusion.contains_key("pin"));
            assert!(matrix.validate(&profile).is_ok());
        }
    }

    #[test]
    fn test_set_inclusion_is_pure() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::Human);
        let updated = matrix.set_inclusion(&profile, "vinNumber", true).unwrap();

        assert!(!profile.is_included("vinNumber"));
        assert!(matrix.is_included(&updated, "vinNumber"));
    }

    #[test]
    fn test_set_inclusion_errors() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::Human);

        assert_eq!(
            matrix.set_inclusion(&profile, "pin", true).unwrap_err(),
            MatrixError::IneligibleComponent("pin".to_string())
        );
        assert_eq!(
            matrix.set_inclusion(&profile, "pin", false).unwrap_err(),
            MatrixError::IneligibleComponent("pin".to_string())
        );
        assert_eq!(
            matrix.set_inclusion(&profile, "shoeSize", true).unwrap_err(),
            MatrixError::UnknownComponent("shoeSize".to_string())
        );
    }

    #[test]
    fn test_overrides() {
        let matrix = InclusionMatrix::standard();
        let mut overrides = OrganizationOverrides::new();
        overrides.insert(
            EntityType::VirtualMachine,
            BTreeMap::from([("serverId".to_string(), false), ("geoLocation".to_string(), true)]),
        );

        let profile = matrix
            .profile_for(EntityType::VirtualMachine, &overrides)
            .unwrap();
        assert!(!profile.is_included("serverId"));
        assert!(profile.is_included("geoLocation"));

        overrides.insert(
            EntityType::Human,
            BTreeMap::from([("biometricTemplate".to_string(), true)]),
        );
        assert_eq!(
            matrix.resolve_all(&overrides).unwrap_err(),
            MatrixError::IneligibleComponent("biometricTemplate".to_string())
        );
    }

    #[test]
    fn test_fingerprint_tracks_included_set() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::Human);
        let same = matrix.set_inclusion(&profile, "vinNumber", false).unwrap();
        let different = matrix.set_inclusion(&profile, "vinNumber", true).unwrap();

        assert_eq!(profile.fingerprint(), same.fingerprint());
        assert_ne!(profile.fingerprint(), different.fingerprint());
        assert_eq!(profile.fingerprint().len(), 64);
    }

    #[test]
    fn test_included_components_in_catalog_order() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::Avatar);
        assert_eq!(
            profile.included_components(matrix.catalog()),
            vec!["name", "avatarHandle", "geoLocation"]
        );
    }
}
