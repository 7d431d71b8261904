//! # warden-auth
//!
//! The authorization and session-control core.
//!
//! ## Modules
//!
//! - `lock`: named leases on the shared key-value store
//! - `session`: session issue, refresh, invalidation and expiry sweeps
//! - `permission`: access requirement evaluation and enforcement
//! - `resource`: reconciliation of the resource catalogue against introspected endpoints

pub mod lock;
pub mod permission;
pub mod resource;
pub mod session;

pub use lock::{DistributedLockManager, LockFailPolicy, LockHandle};
pub use permission::{PermissionEnforcer, PrincipalResolver, RequirementRegistry};
pub use resource::{EndpointIntrospector, ManifestIntrospector, ReconcileSummary, ResourceReconciler};
pub use session::{SessionManager, SessionSweeper};
