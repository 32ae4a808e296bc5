//! Human scheme.
//!
//! Humans are anchored on name, date of birth and the last digits of a
//! government or phone identifier. Supporting documents and devices add
//! optional fragments.

use crate::schemes::{head_opt, head_req, tail_opt, tail_req, SchemeProvider, SchemeStep};
use crate::types::{EntityType, FieldName as F};

/// Scheme for natural persons.
pub struct HumanScheme;

const HUMAN_STEPS: [SchemeStep; 8] = [
    SchemeStep::Literal("H"),
    head_req(F::Name, 4),
    head_req(F::DateOfBirth, 8),
    tail_req(F::PhoneEinSsn, 4, 4),
    head_opt(F::Birthplace, 3),
    head_opt(F::Address, 5),
    tail_opt(F::DriverLicensePassport, 4, 4),
    tail_opt(F::PrimaryAuthDeviceImei, 4, 4),
];

impl SchemeProvider for HumanScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::Human
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &HUMAN_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &[
            "name",
            "address",
            "birthplace",
            "dateOfBirth",
            "snImei",
            "phoneEinSsnBvn",
            "driverLicensePassport",
            "primaryAuthDeviceImei",
            "makeModelOs",
        ]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &[
            "birthplace",
            "snImei",
            "driverLicensePassport",
            "primaryAuthDeviceImei",
            "makeModelOs",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::extract;
    use crate::types::RawFieldSet;

    #[test]
    fn test_human_fragments() {
        let fields = RawFieldSet::new()
            .with(F::Name, "Grace Hopper")
            .with(F::DateOfBirth, "1906-12-09")
            .with(F::PhoneEinSsn, "+1 555 010 4477")
            .with(F::Address, "New York");

        let fragments = extract(EntityType::Human, &fields).unwrap();
        assert_eq!(
            fragments,
            vec!["H", "Grac", "19061209", "4477", "", "NewYo", "", ""]
        );
    }
}
