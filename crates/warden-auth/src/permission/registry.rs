//! Access requirements registered per endpoint.

use std::collections::HashMap;

use warden_entity::permission::AccessRequirement;

/// Maps `"{METHOD} {path}"` endpoint keys to their access requirement.
///
/// Endpoints that were never registered carry no requirement.
#[derive(Debug, Clone, Default)]
pub struct RequirementRegistry {
    requirements: HashMap<String, AccessRequirement>,
}

impl RequirementRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint key for `method` and `path`, e.g. `GET /users`.
    pub fn endpoint_key(method: &str, path: &str) -> String {
        format!("{} {path}", method.to_ascii_uppercase())
    }

    /// Register `requirement` for an endpoint, returning any it replaced.
    pub fn register(
        &mut self,
        method: &str,
        path: &str,
        requirement: AccessRequirement,
    ) -> Option<AccessRequirement> {
        self.requirements
            .insert(Self::endpoint_key(method, path), requirement)
    }

    /// Builder form of [`Self::register`].
    pub fn with(mut self, method: &str, path: &str, requirement: AccessRequirement) -> Self {
        self.register(method, path, requirement);
        self
    }

    /// The requirement declared for an endpoint, if any.
    pub fn requirement_for(&self, method: &str, path: &str) -> Option<&AccessRequirement> {
        self.requirements.get(&Self::endpoint_key(method, path))
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}
