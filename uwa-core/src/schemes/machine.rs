//! Machine schemes: virtual and physical.

use crate::schemes::{head_opt, head_req, tail_opt, tail_req, SchemeProvider, SchemeStep};
use crate::types::{EntityType, FieldName as F};

/// Marker separating the two serial fragments of a physical machine token.
pub const PHYSICAL_MARKER: &str = "PM";

/// Scheme for virtual machines and cloud instances.
///
/// Environment code, four fragments walking toward the end of the instance
/// identifier, the MAC tail, then location and OS prefixes.
pub struct VirtualMachineScheme;

const VM_STEPS: [SchemeStep; 8] = [
    head_req(F::Environment, 2),
    tail_req(F::InstanceUuid, 17, 4),
    tail_req(F::InstanceUuid, 13, 3),
    tail_req(F::InstanceUuid, 9, 3),
    tail_req(F::InstanceUuid, 5, 3),
    tail_opt(F::MacAddress, 6, 6),
    head_opt(F::Address, 7),
    head_opt(F::OsName, 7),
];

impl SchemeProvider for VirtualMachineScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::VirtualMachine
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &VM_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &[
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
        ]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &[
            "snImei",
            "makeModelOs",
            "dateOfManufacture",
            "serverId",
            "ipAddress",
            "macAddress",
        ]
    }
}

/// Scheme for physical machines.
pub struct PhysicalMachineScheme;

const PHYSICAL_STEPS: [SchemeStep; 6] = [
    head_req(F::Environment, 2),
    tail_req(F::SerialNumber, 8, 4),
    SchemeStep::Literal(PHYSICAL_MARKER),
    tail_req(F::SerialNumber, 4, 4),
    head_opt(F::Address, 5),
    head_opt(F::OsName, 5),
];

impl SchemeProvider for PhysicalMachineScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::PhysicalMachine
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &PHYSICAL_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &[
            "snImei",
            "makeModelOs",
            "dateOfManufacture",
            "os",
            "environment",
            "ipAddress",
            "macAddress",
        ]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &["makeModelOs", "dateOfManufacture", "ipAddress", "macAddress"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::extract;
    use crate::types::RawFieldSet;

    #[test]
    fn test_physical_fragments() {
        let fields = RawFieldSet::new()
            .with(F::Environment, "DEV")
            .with(F::SerialNumber, "SN-00-1234-5678")
            .with(F::Address, "Lagos Island")
            .with(F::OsName, "ubuntu");

        let fragments = extract(EntityType::PhysicalMachine, &fields).unwrap();
        assert_eq!(fragments, vec!["DE", "1234", "PM", "5678", "Lagos", "ubunt"]);
    }

    #[test]
    fn test_vm_optional_fields_are_empty() {
        let fields = RawFieldSet::new()
            .with(F::Environment, "QA")
            .with(F::InstanceUuid, "abc");

        let fragments = extract(EntityType::VirtualMachine, &fields).unwrap();
        assert_eq!(fragments, vec!["QA", "abc", "abc", "abc", "abc", "", "", ""]);
    }
}
