//! Business schemes: third parties and business owners.

use crate::schemes::{head_opt, head_req, tail_opt, tail_req, SchemeProvider, SchemeStep};
use crate::types::{EntityType, FieldName as F};

/// Scheme for third-party organizations.
pub struct ThirdPartyScheme;

const THIRD_PARTY_STEPS: [SchemeStep; 5] = [
    SchemeStep::Literal("TP"),
    head_req(F::BusinessName, 5),
    tail_req(F::Ein, 4, 4),
    head_opt(F::Address, 5),
    tail_opt(F::IntermediaryId, 4, 4),
];

impl SchemeProvider for ThirdPartyScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::ThirdParty
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &THIRD_PARTY_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &["businessName", "ein", "address", "intermediaryId", "email"]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &["intermediaryId", "email"]
    }
}

/// Scheme for business owners.
pub struct BusinessOwnerScheme;

const BUSINESS_OWNER_STEPS: [SchemeStep; 5] = [
    SchemeStep::Literal("BO"),
    head_req(F::Name, 4),
    head_req(F::BusinessName, 4),
    tail_req(F::PhoneEinSsn, 4, 4),
    head_opt(F::DateOfBirth, 8),
];

impl SchemeProvider for BusinessOwnerScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::BusinessOwner
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &BUSINESS_OWNER_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &["name", "businessName", "phoneEinSsnBvn", "dateOfBirth", "address"]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &["dateOfBirth", "address"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::extract;
    use crate::types::RawFieldSet;

    #[test]
    fn test_third_party_fragments() {
        let fields = RawFieldSet::new()
            .with(F::BusinessName, "Acme Logistics")
            .with(F::Ein, "12-3456789");

        let fragments = extract(EntityType::ThirdParty, &fields).unwrap();
        assert_eq!(fragments, vec!["TP", "AcmeL", "6789", "", ""]);
    }
}
