//! PostgreSQL repository implementations.

pub mod authorization;
pub mod resource;
pub mod session;

pub use authorization::PgAuthorizationSource;
pub use resource::PgResourceRepository;
pub use session::PgSessionRepository;

use warden_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error with a short description of the failed operation.
pub(crate) fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}
