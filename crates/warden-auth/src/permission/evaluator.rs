//! Pure decision function over access requirements.
//!
//! A requirement has a role dimension and a resource dimension. A
//! dimension with no codes is unconstrained and takes no part in the
//! combination: if only one dimension is declared the result is that
//! dimension alone, if neither is declared access is granted. When both
//! are declared `both_required` joins them with AND, otherwise OR.

use std::collections::BTreeSet;

use warden_entity::permission::AccessRequirement;

/// Outcome of one requirement dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionOutcome {
    /// No codes were declared for this dimension.
    Unconstrained,
    /// The held codes satisfy the declared ones.
    Satisfied,
    /// The held codes do not satisfy the declared ones.
    Unsatisfied,
}

impl DimensionOutcome {
    /// Whether codes were declared for this dimension.
    pub fn is_declared(self) -> bool {
        self != Self::Unconstrained
    }

    /// Whether the dimension passed, counting unconstrained as passed.
    pub fn is_satisfied(self) -> bool {
        self != Self::Unsatisfied
    }
}

/// Per-dimension outcomes plus the combined decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Role dimension outcome.
    pub roles: DimensionOutcome,
    /// Resource dimension outcome.
    pub resources: DimensionOutcome,
    /// Final decision.
    pub granted: bool,
}

/// Evaluate one dimension: every code (`all_required`) or any code.
pub fn evaluate_dimension(
    required: &BTreeSet<String>,
    all_required: bool,
    held: &BTreeSet<String>,
) -> DimensionOutcome {
    if required.is_empty() {
        return DimensionOutcome::Unconstrained;
    }
    let satisfied = if all_required {
        required.is_subset(held)
    } else {
        !required.is_disjoint(held)
    };
    if satisfied {
        DimensionOutcome::Satisfied
    } else {
        DimensionOutcome::Unsatisfied
    }
}

/// Evaluate `requirement` against held roles and resource permissions,
/// reporting both dimensions. Both are always computed.
pub fn evaluate_detailed(
    requirement: &AccessRequirement,
    roles: &BTreeSet<String>,
    resource_permissions: &BTreeSet<String>,
) -> Evaluation {
    if !requirement.enabled {
        return Evaluation {
            roles: DimensionOutcome::Unconstrained,
            resources: DimensionOutcome::Unconstrained,
            granted: true,
        };
    }

    let role_outcome = evaluate_dimension(&requirement.roles, requirement.all_roles_required, roles);
    let resource_outcome = evaluate_dimension(
        &requirement.resources,
        requirement.all_resources_required,
        resource_permissions,
    );

    let granted = match (role_outcome.is_declared(), resource_outcome.is_declared()) {
        (false, false) => true,
        (true, false) => role_outcome.is_satisfied(),
        (false, true) => resource_outcome.is_satisfied(),
        (true, true) if requirement.both_required => {
            role_outcome.is_satisfied() && resource_outcome.is_satisfied()
        }
        (true, true) => role_outcome.is_satisfied() || resource_outcome.is_satisfied(),
    };

    Evaluation {
        roles: role_outcome,
        resources: resource_outcome,
        granted,
    }
}

/// Whether `requirement` is satisfied by the held roles and resource permissions.
pub fn evaluate(
    requirement: &AccessRequirement,
    roles: &BTreeSet<String>,
    resource_permissions: &BTreeSet<String>,
) -> bool {
    evaluate_detailed(requirement, roles, resource_permissions).granted
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_any_role_and_all_resources() {
        let req = AccessRequirement::new()
            .any_role(["admin", "ops"])
            .all_resources(["user:read"]);
        assert!(evaluate(&req, &set(&["admin"]), &set(&["user:read"])));
    }

    #[test]
    fn test_or_with_unsatisfiable_resources() {
        let req = AccessRequirement::new()
            .any_role(["admin", "ops"])
            .all_resources(["user:read", "user:delete"])
            .either();
        let eval = evaluate_detailed(&req, &set(&["admin"]), &set(&["user:read"]));
        assert!(eval.granted);
        assert_eq!(eval.roles, DimensionOutcome::Satisfied);
        assert_eq!(eval.resources, DimensionOutcome::Unsatisfied);
    }

    #[test]
    fn test_and_requires_both() {
        let req = AccessRequirement::new()
            .any_role(["admin"])
            .any_resource(["user:delete"]);
        assert!(!evaluate(&req, &set(&["admin"]), &set(&["user:read"])));
    }

    #[test]
    fn test_empty_dimension_does_not_satisfy_or() {
        let req = AccessRequirement::new().all_roles(["admin", "ops"]).either();
        let eval = evaluate_detailed(&req, &set(&["admin"]), &set(&["anything"]));
        assert_eq!(eval.resources, DimensionOutcome::Unconstrained);
        assert!(!eval.granted);
    }

    #[test]
    fn test_disabled_and_empty_requirements_grant() {
        let none = BTreeSet::new();
        assert!(evaluate(&AccessRequirement::new(), &none, &none));
        let disabled = AccessRequirement::new().all_roles(["root"]).disabled();
        assert!(evaluate(&disabled, &none, &none));
    }

    fn codes() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set("[a-e]", 0..4)
    }

    fn requirement() -> impl Strategy<Value = AccessRequirement> {
        (codes(), any::<bool>(), codes(), any::<bool>(), any::<bool>()).prop_map(
            |(roles, all_roles, resources, all_resources, both)| AccessRequirement {
                enabled: true,
                roles,
                all_roles_required: all_roles,
                resources,
                all_resources_required: all_resources,
                both_required: both,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_more_grants_never_deny(
            req in requirement(),
            roles in codes(),
            perms in codes(),
            extra_roles in codes(),
            extra_perms in codes(),
        ) {
            let wider_roles: BTreeSet<String> = roles.union(&extra_roles).cloned().collect();
            let wider_perms: BTreeSet<String> = perms.union(&extra_perms).cloned().collect();
            if evaluate(&req, &roles, &perms) {
                prop_assert!(evaluate(&req, &wider_roles, &wider_perms));
            }
        }

        #[test]
        fn prop_and_implies_or(req in requirement(), roles in codes(), perms in codes()) {
            let and = AccessRequirement { both_required: true, ..req.clone() };
            let or = AccessRequirement { both_required: false, ..req };
            if evaluate(&and, &roles, &perms) {
                prop_assert!(evaluate(&or, &roles, &perms));
            }
        }

        #[test]
        fn prop_all_implies_any(req in requirement(), roles in codes(), perms in codes()) {
            let all = AccessRequirement {
                all_roles_required: true,
                all_resources_required: true,
                ..req.clone()
            };
            let any = AccessRequirement {
                all_roles_required: false,
                all_resources_required: false,
                ..req
            };
            if evaluate(&all, &roles, &perms) {
                prop_assert!(evaluate(&any, &roles, &perms));
            }
        }

        #[test]
        fn prop_disabled_always_grants(req in requirement(), roles in codes(), perms in codes()) {
            prop_assert!(evaluate(&req.disabled(), &roles, &perms));
        }
    }
}
