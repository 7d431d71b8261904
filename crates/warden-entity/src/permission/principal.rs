//! Authenticated principal and its resolved permissions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles and resource permissions granted to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// Role codes, e.g. `admin`.
    pub roles: BTreeSet<String>,
    /// Resource permission codes, e.g. `user:read`.
    pub resource_permissions: BTreeSet<String>,
}

impl PermissionSet {
    /// Build a permission set from role and resource codes.
    pub fn new<R, P>(roles: R, resource_permissions: P) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            resource_permissions: resource_permissions.into_iter().map(Into::into).collect(),
        }
    }
}

/// The authenticated identity behind a session plus its permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The session the request was made with.
    pub session_id: Uuid,
    /// Resolved roles and resource permissions.
    #[serde(flatten)]
    pub permissions: PermissionSet,
}

impl Principal {
    /// Role codes held by the principal.
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.permissions.roles
    }

    /// Resource permission codes held by the principal.
    pub fn resource_permissions(&self) -> &BTreeSet<String> {
        &self.permissions.resource_permissions
    }
}
