//! Resource catalogue reconciliation.

pub mod introspector;
pub mod reconciler;

pub use introspector::{EndpointDeclaration, EndpointIntrospector, EndpointManifest, ManifestIntrospector};
pub use reconciler::{ReconcileSummary, ResourceReconciler};
