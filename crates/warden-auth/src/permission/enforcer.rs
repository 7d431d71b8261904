//! Enforcement point turning evaluator decisions into errors.

use tracing::{debug, warn};

use warden_core::error::AppError;
use warden_entity::permission::{AccessRequirement, Principal};

use super::evaluator::{self, Evaluation};
use super::registry::RequirementRegistry;

/// Rejects principals that do not satisfy an access requirement.
///
/// Denials carry a generic message; the failing dimension is only logged.
#[derive(Debug, Clone, Default)]
pub struct PermissionEnforcer {
    registry: RequirementRegistry,
}

impl PermissionEnforcer {
    /// Creates an enforcer over the given endpoint registry.
    pub fn new(registry: RequirementRegistry) -> Self {
        Self { registry }
    }

    /// Evaluates `requirement` for `principal`.
    pub fn check(&self, requirement: &AccessRequirement, principal: &Principal) -> Evaluation {
        let evaluation = evaluator::evaluate_detailed(
            requirement,
            principal.roles(),
            principal.resource_permissions(),
        );
        debug!(
            user_id = %principal.user_id,
            roles = ?evaluation.roles,
            resources = ?evaluation.resources,
            granted = evaluation.granted,
            "Evaluated access requirement"
        );
        evaluation
    }

    /// Returns `Ok(())` if allowed, or `PERMISSION_DENIED` if not.
    pub fn require(
        &self,
        requirement: &AccessRequirement,
        principal: &Principal,
    ) -> Result<(), AppError> {
        let evaluation = self.check(requirement, principal);
        if evaluation.granted {
            return Ok(());
        }
        warn!(
            user_id = %principal.user_id,
            session_id = %principal.session_id,
            roles = ?evaluation.roles,
            resources = ?evaluation.resources,
            "Access denied"
        );
        Err(AppError::permission_denied("Access denied"))
    }

    /// Checks the requirement registered for an endpoint.
    ///
    /// Unregistered endpoints are allowed.
    pub fn require_endpoint(
        &self,
        method: &str,
        path: &str,
        principal: &Principal,
    ) -> Result<(), AppError> {
        match self.registry.requirement_for(method, path) {
            Some(requirement) => self.require(requirement, principal),
            None => Ok(()),
        }
    }

    /// Returns a reference to the endpoint registry.
    pub fn registry(&self) -> &RequirementRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use warden_core::ErrorKind;
    use warden_entity::permission::PermissionSet;

    fn principal(roles: &[&str], resources: &[&str]) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            permissions: PermissionSet::new(roles.iter().copied(), resources.iter().copied()),
        }
    }

    #[test]
    fn test_denial_is_generic() {
        let enforcer = PermissionEnforcer::default();
        let req = AccessRequirement::new().all_resources(["user:delete"]);
        let err = enforcer
            .require(&req, &principal(&["viewer"], &["user:read"]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PermissionDenied);
        assert!(!err.message.contains("user:delete"));
        assert_eq!(err.public_message(), "Access denied");
    }

    #[test]
    fn test_endpoint_registry() {
        let registry = RequirementRegistry::new().with(
            "DELETE",
            "/users/{id}",
            AccessRequirement::new().any_role(["admin"]),
        );
        let enforcer = PermissionEnforcer::new(registry);
        let viewer = principal(&["viewer"], &[]);

        assert!(enforcer.require_endpoint("GET", "/users", &viewer).is_ok());
        assert!(enforcer.require_endpoint("DELETE", "/users/{id}", &viewer).is_err());
        assert!(enforcer
            .require_endpoint("DELETE", "/users/{id}", &principal(&["admin"], &[]))
            .is_ok());
    }
}
