//! Account schemes: user and service accounts.

use crate::schemes::{head_opt, tail_opt, tail_req, SchemeProvider, SchemeStep};
use crate::types::{EntityType, FieldName as F};

/// Scheme for interactive user accounts.
pub struct UserAccountScheme;

const USER_ACCOUNT_STEPS: [SchemeStep; 4] = [
    SchemeStep::Literal("UA"),
    tail_req(F::AccountId, 8, 8),
    head_opt(F::Name, 4),
    tail_opt(F::OrganizationId, 4, 4),
];

impl SchemeProvider for UserAccountScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::UserAccount
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &USER_ACCOUNT_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &["accountId", "name", "email", "organizationId"]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &["name", "email", "organizationId"]
    }
}

/// Scheme for service accounts.
pub struct ServiceAccountScheme;

const SERVICE_ACCOUNT_STEPS: [SchemeStep; 4] = [
    SchemeStep::Literal("SA"),
    tail_req(F::AccountId, 8, 8),
    tail_opt(F::ServerId, 4, 4),
    head_opt(F::Environment, 2),
];

impl SchemeProvider for ServiceAccountScheme {
    fn entity_type(&self) -> EntityType {
        EntityType::ServiceAccount
    }

    fn steps(&self) -> &'static [SchemeStep] {
        &SERVICE_ACCOUNT_STEPS
    }

    fn default_components(&self) -> &'static [&'static str] {
        &["accountId", "serverId", "environment", "organizationId"]
    }

    fn optional_components(&self) -> &'static [&'static str] {
        &["serverId", "organizationId"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_and_service_accounts_differ() {
        assert_ne!(
            UserAccountScheme.steps()[0],
            ServiceAccountScheme.steps()[0]
        );
        assert_eq!(UserAccountScheme.required_fields(), vec![F::AccountId]);
        assert_eq!(ServiceAccountScheme.required_fields(), vec![F::AccountId]);
    }
}
