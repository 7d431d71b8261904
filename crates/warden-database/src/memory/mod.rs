//! In-memory repository implementations for single-node runs and tests.

pub mod authorization;
pub mod resource;
pub mod session;

pub use authorization::MemoryAuthorizationSource;
pub use resource::MemoryResourceRepository;
pub use session::MemorySessionRepository;
