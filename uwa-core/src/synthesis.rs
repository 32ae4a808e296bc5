//! UWA synthesis engine.
//!
//! Synthesis validates the raw fields against the caller's profile, runs the
//! entity type's extraction scheme and concatenates the fragments behind the
//! namespace prefix. The result is the raw token; display chunking lives in
//! [`crate::format`].

use crate::catalog::ComponentCatalog;
use crate::matrix::{EntityTypeProfile, InclusionMatrix, MatrixError};
use crate::schemes::{extract, field_content, scheme_for};
use crate::types::{EntityType, FieldName, RawFieldSet};

/// Default namespace tag leading every token.
pub const DEFAULT_PREFIX: &str = "UWA";

/// Error types for token synthesis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// A field the extraction scheme cannot do without is blank
    #[error("Missing required field {field} for {entity_type}")]
    MissingField {
        entity_type: EntityType,
        field: FieldName,
    },

    /// Components included by the profile have no value
    #[error("Incomplete components for {entity_type}: {}", .missing.join(", "))]
    IncompleteComponents {
        entity_type: EntityType,
        missing: Vec<String>,
    },

    /// The profile was built for another entity type
    #[error("Profile for {actual} used to synthesize {expected}")]
    ProfileMismatch {
        expected: EntityType,
        actual: EntityType,
    },

    /// The profile names a component that is unknown or never tokenized
    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] MatrixError),
}

/// Stateless token synthesizer.
#[derive(Debug, Clone)]
pub struct UwaSynthesizer {
    prefix: String,
    catalog: &'static ComponentCatalog,
}

impl UwaSynthesizer {
    /// Create a synthesizer with the default prefix and standard catalog.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Create a synthesizer with a custom namespace prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            catalog: ComponentCatalog::standard(),
        }
    }

    /// Builder: use a different catalog.
    pub fn with_catalog(mut self, catalog: &'static ComponentCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// The namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Validate the fields against `profile`, then derive the token.
    pub fn synthesize(
        &self,
        entity_type: EntityType,
        fields: &RawFieldSet,
        profile: &EntityTypeProfile,
    ) -> Result<String, SynthesisError> {
        self.validate(entity_type, fields, profile)?;
        self.derive(entity_type, fields)
    }

    /// Check the profile against the catalog, then check that every
    /// included, non-optional component has a value.
    ///
    /// A value made only of whitespace and `-` separators counts as blank.
    pub fn validate(
        &self,
        entity_type: EntityType,
        fields: &RawFieldSet,
        profile: &EntityTypeProfile,
    ) -> Result<(), SynthesisError> {
        if profile.entity_type != entity_type {
            return Err(SynthesisError::ProfileMismatch {
                expected: entity_type,
                actual: profile.entity_type,
            });
        }
        InclusionMatrix::new(self.catalog).validate(profile)?;

        let scheme = scheme_for(entity_type);
        let missing: Vec<String> = self
            .catalog
            .list()
            .iter()
            .filter(|c| profile.is_included(c.id) && !scheme.is_optional(c.id))
            .filter(|c| {
                c.source_field
                    .is_some_and(|f| field_content(fields, f).is_none())
            })
            .map(|c| c.id.to_string())
            .collect();

        if !missing.is_empty() {
            tracing::debug!(
                entity_type = %entity_type,
                missing = ?missing,
                "Included components have no value"
            );
            return Err(SynthesisError::IncompleteComponents {
                entity_type,
                missing,
            });
        }

        Ok(())
    }

    /// Derive the token from the fields alone, without profile validation.
    ///
    /// Used to check that a stored token still matches its inputs.
    pub fn derive(
        &self,
        entity_type: EntityType,
        fields: &RawFieldSet,
    ) -> Result<String, SynthesisError> {
        let fragments = extract(entity_type, fields)?;
        let mut token = String::with_capacity(
            self.prefix.len() + fragments.iter().map(String::len).sum::<usize>(),
        );
        token.push_str(&self.prefix);
        for fragment in &fragments {
            token.push_str(fragment);
        }
        Ok(token)
    }
}

impl Default for UwaSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vm_fields() -> RawFieldSet {
        RawFieldSet::new()
            .with(FieldName::InstanceUuid, "1c-49ca-47ae-bebe-4087c52abbf4")
            .with(FieldName::Environment, "PR")
            .with(FieldName::Address, "2X57+XH+")
            .with(FieldName::OsName, "centosl")
    }

    #[test]
    fn test_vm_scenario() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::VirtualMachine);
        let synthesizer = UwaSynthesizer::new();

        let token = synthesizer
            .synthesize(EntityType::VirtualMachine, &vm_fields(), &profile)
            .unwrap();

        // prefix, environment, four uuid fragments, address, os
        assert_eq!(token, "UWAPRebebe407c5abb2X57+XHcentosl");
        assert!(token.starts_with("UWAPR"));
    }

    #[test]
    fn test_determinism() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::VirtualMachine);
        let synthesizer = UwaSynthesizer::new();

        let a = synthesizer
            .synthesize(EntityType::VirtualMachine, &vm_fields(), &profile)
            .unwrap();
        let b = UwaSynthesizer::new()
            .synthesize(EntityType::VirtualMachine, &vm_fields(), &profile.clone())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_incomplete_components() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::VirtualMachine);
        let mut fields = vm_fields();
        fields.remove(FieldName::OsName);

        let err = UwaSynthesizer::new()
            .synthesize(EntityType::VirtualMachine, &fields, &profile)
            .unwrap_err();
        assert_eq!(
            err,
            SynthesisError::IncompleteComponents {
                entity_type: EntityType::VirtualMachine,
                missing: vec!["os".to_string()],
            }
        );

        // Excluding the component makes the OS fragment optional again.
        let relaxed = matrix.set_inclusion(&profile, "os", false).unwrap();
        let token = UwaSynthesizer::new()
            .synthesize(EntityType::VirtualMachine, &fields, &relaxed)
            .unwrap();
        assert_eq!(token, "UWAPRebebe407c5abb2X57+XH");
    }

    #[test]
    fn test_optional_components_tolerated() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::VirtualMachine);
        assert!(profile.is_included("serverId"));
        assert!(!vm_fields().has(FieldName::ServerId));

        assert!(UwaSynthesizer::new()
            .validate(EntityType::VirtualMachine, &vm_fields(), &profile)
            .is_ok());
    }

    #[test]
    fn test_profile_mismatch() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::Human);

        let err = UwaSynthesizer::new()
            .synthesize(EntityType::VirtualMachine, &vm_fields(), &profile)
            .unwrap_err();
        assert_eq!(
            err,
            SynthesisError::ProfileMismatch {
                expected: EntityType::VirtualMachine,
                actual: EntityType::Human,
            }
        );
    }

    #[test]
    fn test_missing_field_when_profile_allows_it() {
        let matrix = InclusionMatrix::standard();
        let mut profile = matrix.default_profile(EntityType::VirtualMachine);
        for id in ["uuid", "ec2DoIdMacSn"] {
            profile = matrix.set_inclusion(&profile, id, false).unwrap();
        }
        let mut fields = vm_fields();
        fields.remove(FieldName::InstanceUuid);

        let err = UwaSynthesizer::new()
            .synthesize(EntityType::VirtualMachine, &fields, &profile)
            .unwrap_err();
        assert_eq!(
            err,
            SynthesisError::MissingField {
                entity_type: EntityType::VirtualMachine,
                field: FieldName::InstanceUuid,
            }
        );
    }

    #[test]
    fn test_physical_marker_and_custom_prefix() {
        let matrix = InclusionMatrix::standard();
        let profile = matrix.default_profile(EntityType::PhysicalMachine);
        let fields = RawFieldSet::new()
            .with(FieldName::Environment, "PR")
            .with(FieldName::SerialNumber, "C02XK1234567")
            .with(FieldName::OsName, "macOS")
            .with(FieldName::Address, "Berlin");

        let token = UwaSynthesizer::with_prefix("ACM")
            .synthesize(EntityType::PhysicalMachine, &fields, &profile)
            .unwrap();
        assert_eq!(token, "ACMPRK123PM4567BerlimacOS");
    }

    #[test]
    fn test_separator_only_values_are_incomplete() {
        let profile = InclusionMatrix::standard().default_profile(EntityType::VirtualMachine);
        let fields = RawFieldSet::new()
            .with(FieldName::Environment, "-")
            .with(FieldName::InstanceUuid, "----")
            .with(FieldName::OsName, "centosl");

        let err = UwaSynthesizer::new()
            .synthesize(EntityType::VirtualMachine, &fields, &profile)
            .unwrap_err();
        assert_eq!(
            err,
            SynthesisError::IncompleteComponents {
                entity_type: EntityType::VirtualMachine,
                missing: vec![
                    "ec2DoIdMacSn".to_string(),
                    "uuid".to_string(),
                    "environment".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_profile_with_ineligible_or_unknown_component() {
        let matrix = InclusionMatrix::standard();
        let synthesizer = UwaSynthesizer::new();

        let mut with_pin = matrix.default_profile(EntityType::VirtualMachine);
        with_pin.inclusion.insert("pin".to_string(), true);
        assert_eq!(
            synthesizer
                .synthesize(EntityType::VirtualMachine, &vm_fields(), &with_pin)
                .unwrap_err(),
            SynthesisError::InvalidProfile(MatrixError::IneligibleComponent("pin".to_string()))
        );

        let mut with_unknown = matrix.default_profile(EntityType::VirtualMachine);
        with_unknown.inclusion.insert("shoeSize".to_string(), true);
        assert_eq!(
            synthesizer
                .validate(EntityType::VirtualMachine, &vm_fields(), &with_unknown)
                .unwrap_err(),
            SynthesisError::InvalidProfile(MatrixError::UnknownComponent("shoeSize".to_string()))
        );
    }
}
