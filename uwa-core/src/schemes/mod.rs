//! Per-entity-type field extraction schemes.
//!
//! Each entity type provides an ordered list of extraction steps plus the
//! baseline inclusion set shipped with the system. The schemes govern how a
//! token is encoded; the inclusion matrix only governs which components must
//! be present.

pub mod account;
pub mod api;
pub mod avatar;
pub mod business;
pub mod human;
pub mod machine;

pub use account::{ServiceAccountScheme, UserAccountScheme};
pub use api::ApiScheme;
pub use avatar::AvatarScheme;
pub use business::{BusinessOwnerScheme, ThirdPartyScheme};
pub use human::HumanScheme;
pub use machine::{PhysicalMachineScheme, VirtualMachineScheme};

use crate::extract::{compact, ExtractionRule};
use crate::synthesis::SynthesisError;
use crate::types::{EntityType, FieldName, RawFieldSet};

/// One step of an extraction scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeStep {
    /// Cut a fragment from a raw field
    Field {
        field: FieldName,
        rule: ExtractionRule,
        required: bool,
    },
    /// Insert a fixed marker
    Literal(&'static str),
}

/// Required field step with a head rule.
pub(crate) const fn head_req(field: FieldName, len: usize) -> SchemeStep {
    SchemeStep::Field {
        field,
        rule: ExtractionRule::Head { len },
        required: true,
    }
}

/// Optional field step with a head rule.
pub(crate) const fn head_opt(field: FieldName, len: usize) -> SchemeStep {
    SchemeStep::Field {
        field,
        rule: ExtractionRule::Head { len },
        required: false,
    }
}

/// Required field step with a tail rule.
pub(crate) const fn tail_req(field: FieldName, offset: usize, len: usize) -> SchemeStep {
    SchemeStep::Field {
        field,
        rule: ExtractionRule::Tail { offset, len },
        required: true,
    }
}

/// Optional field step with a tail rule.
pub(crate) const fn tail_opt(field: FieldName, offset: usize, len: usize) -> SchemeStep {
    SchemeStep::Field {
        field,
        rule: ExtractionRule::Tail { offset, len },
        required: false,
    }
}

/// Trait for entity-type-specific extraction schemes.
pub trait SchemeProvider: Send + Sync {
    /// Get the entity type this scheme handles
    fn entity_type(&self) -> EntityType;

    /// Ordered extraction steps
    fn steps(&self) -> &'static [SchemeStep];

    /// Components included by the default profile
    fn default_components(&self) -> &'static [&'static str];

    /// Included components that may be left blank without failing validation
    fn optional_components(&self) -> &'static [&'static str];

    /// Whether a component may be left blank for this entity type.
    fn is_optional(&self, component_id: &str) -> bool {
        self.optional_components().contains(&component_id)
    }

    /// Fields the scheme cannot encode without.
    fn required_fields(&self) -> Vec<FieldName> {
        let mut fields = Vec::new();
        for step in self.steps() {
            if let SchemeStep::Field {
                field,
                required: true,
                ..
            } = step
            {
                if !fields.contains(field) {
                    fields.push(*field);
                }
            }
        }
        fields
    }
}

/// Get the scheme for an entity type.
pub fn scheme_for(entity_type: EntityType) -> &'static dyn SchemeProvider {
    match entity_type {
        EntityType::Human => &HumanScheme,
        EntityType::VirtualMachine => &VirtualMachineScheme,
        EntityType::PhysicalMachine => &PhysicalMachineScheme,
        EntityType::Api => &ApiScheme,
        EntityType::ThirdParty => &ThirdPartyScheme,
        EntityType::BusinessOwner => &BusinessOwnerScheme,
        EntityType::UserAccount => &UserAccountScheme,
        EntityType::ServiceAccount => &ServiceAccountScheme,
        EntityType::Avatar => &AvatarScheme,
    }
}

/// Compacted value of a field, or `None` when nothing survives compaction.
pub(crate) fn field_content(fields: &RawFieldSet, field: FieldName) -> Option<String> {
    fields
        .get(field)
        .map(compact)
        .filter(|value| !value.is_empty())
}

/// Extract the ordered fragments for an entity type.
///
/// Literal steps yield their marker; optional fields with no value yield an
/// empty fragment. A value made only of separators counts as no value. The
/// first missing required field fails the extraction.
pub fn extract(entity_type: EntityType, fields: &RawFieldSet) -> Result<Vec<String>, SynthesisError> {
    let scheme = scheme_for(entity_type);
    let mut fragments = Vec::with_capacity(scheme.steps().len());

    for step in scheme.steps() {
        match *step {
            SchemeStep::Literal(marker) => fragments.push(marker.to_string()),
            SchemeStep::Field {
                field,
                rule,
                required,
            } => match field_content(fields, field) {
                Some(value) => fragments.push(rule.apply(&value)),
                None if required => {
                    return Err(SynthesisError::MissingField { entity_type, field });
                }
                None => fragments.push(String::new()),
            },
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentCatalog;

    #[test]
    fn test_every_entity_has_a_scheme() {
        for entity in EntityType::ALL {
            let scheme = scheme_for(entity);
            assert_eq!(scheme.entity_type(), entity);
            assert!(!scheme.steps().is_empty());
            assert!(!scheme.required_fields().is_empty());
        }
    }

    #[test]
    fn test_defaults_reference_eligible_components() {
        let catalog = ComponentCatalog::standard();
        for entity in EntityType::ALL {
            let scheme = scheme_for(entity);
            for id in scheme
                .default_components()
                .iter()
                .chain(scheme.optional_components())
            {
                let component = catalog.get(id).unwrap();
                assert!(component.eligible_for_token, "{entity}: {id} is ineligible");
            }
            assert!(!scheme.default_components().contains(&"pin"));
        }
    }

    #[test]
    fn test_missing_required_field() {
        let fields = RawFieldSet::new().with(FieldName::Environment, "PR");
        let err = extract(EntityType::VirtualMachine, &fields).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::MissingField {
                entity_type: EntityType::VirtualMachine,
                field: FieldName::InstanceUuid,
            }
        );
    }

    #[test]
    fn test_separator_only_value_is_missing() {
        let fields = RawFieldSet::new()
            .with(FieldName::Environment, "-")
            .with(FieldName::InstanceUuid, "----")
            .with(FieldName::OsName, "centosl");
        assert_eq!(
            extract(EntityType::VirtualMachine, &fields).unwrap_err(),
            SynthesisError::MissingField {
                entity_type: EntityType::VirtualMachine,
                field: FieldName::Environment,
            }
        );

        let fields = fields
            .with(FieldName::Environment, "PR")
            .with(FieldName::MacAddress, " - ");
        let fragments = extract(EntityType::VirtualMachine, &fields);
        assert_eq!(
            fragments.unwrap_err(),
            SynthesisError::MissingField {
                entity_type: EntityType::VirtualMachine,
                field: FieldName::InstanceUuid,
            }
        );
    }

    #[test]
    fn test_short_values_extract_without_panicking() {
        for entity in EntityType::ALL {
            let mut fields = RawFieldSet::new();
            for field in FieldName::ALL {
                fields.set(field, "x");
            }
            let fragments = extract(entity, &fields).unwrap();
            assert_eq!(fragments.len(), scheme_for(entity).steps().len());
        }
    }
}
