//! API client scheme.

use crate::schemes::{head_opt, tail_opt, tail_req, SchemeProvider, SchemeStep};
use crate::types::{EntityType, FieldName as F};

/// Scheme for API clients.
pub struct ApiScheme;

const API_STEPS: [SchemeStep; 5] = [
    SchemeStep::Literal("API"),
    tail_req(F::ClientId, 8, 8),
    head_opt(F::Environment, 2),
    tail_opt(F::ApiKeyId, 4, 4),
    tail_opt(F::ServerId, 4, 4),
];

impl SchemeProvider for ApiScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::Api
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &API_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &["apiClientId", "apiKeyId", "environment", "serverId", "ipAddress"]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &["apiKeyId", "serverId", "ipAddress"]
    }
}
