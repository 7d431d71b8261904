//! Permission evaluation, principal resolution and enforcement.

pub mod enforcer;
pub mod evaluator;
pub mod registry;
pub mod resolver;

pub use enforcer::PermissionEnforcer;
pub use evaluator::{DimensionOutcome, Evaluation, evaluate, evaluate_detailed};
pub use registry::RequirementRegistry;
pub use resolver::PrincipalResolver;
