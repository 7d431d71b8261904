//! Declarative access requirement attached to a protected endpoint.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Role and resource constraints an endpoint declares.
///
/// Each dimension is a set of codes plus an all/any flag; an empty
/// dimension places no constraint. `both_required` joins the two
/// dimensions with AND (true) or OR (false).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequirement {
    /// When false the requirement is always satisfied.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Required role codes.
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// Whether every role is required (true) or any one suffices (false).
    #[serde(default)]
    pub all_roles_required: bool,
    /// Required resource permission codes.
    #[serde(default)]
    pub resources: BTreeSet<String>,
    /// Whether every resource is required (true) or any one suffices (false).
    #[serde(default)]
    pub all_resources_required: bool,
    /// AND (true) or OR (false) between the two dimensions.
    #[serde(default = "default_true")]
    pub both_required: bool,
}

impl Default for AccessRequirement {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessRequirement {
    /// An enabled requirement with no constraints yet.
    pub fn new() -> Self {
        Self {
            enabled: true,
            roles: BTreeSet::new(),
            all_roles_required: false,
            resources: BTreeSet::new(),
            all_resources_required: false,
            both_required: true,
        }
    }

    /// Satisfied when the principal holds any of `roles`.
    pub fn any_role<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self.all_roles_required = false;
        self
    }

    /// Satisfied when the principal holds every one of `roles`.
    pub fn all_roles<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self.all_roles_required = true;
        self
    }

    /// Satisfied when the principal holds any of `codes`.
    pub fn any_resource<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.resources = codes.into_iter().map(Into::into).collect();
        self.all_resources_required = false;
        self
    }

    /// Satisfied when the principal holds every one of `codes`.
    pub fn all_resources<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.resources = codes.into_iter().map(Into::into).collect();
        self.all_resources_required = true;
        self
    }

    /// Either dimension suffices when both are declared.
    pub fn either(mut self) -> Self {
        self.both_required = false;
        self
    }

    /// Turn the requirement off; it is then always satisfied.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether any dimension is declared.
    pub fn is_constrained(&self) -> bool {
        self.enabled && !(self.roles.is_empty() && self.resources.is_empty())
    }
}

fn default_true() -> bool {
    true
}
