//! Avatar scheme.

use crate::schemes::{head_opt, head_req, SchemeProvider, SchemeStep};
use crate::types::{EntityType, FieldName as F};

/// Scheme for virtual personas.
pub struct AvatarScheme;

const AVATAR_STEPS: [SchemeStep; 4] = [
    SchemeStep::Literal("AV"),
    head_req(F::AvatarHandle, 8),
    head_opt(F::Platform, 4),
    head_opt(F::Name, 4),
];

impl SchemeProvider for AvatarScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::Avatar
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &AVATAR_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &["avatarHandle", "name", "geoLocation"]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &["name", "geoLocation"]
    }
}
