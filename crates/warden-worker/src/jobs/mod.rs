//! Job implementations run by the scheduler.

pub mod reconcile;

pub use reconcile::ReconcileJob;
