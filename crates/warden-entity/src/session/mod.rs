//! Session domain entities.

pub mod model;
pub mod token;

pub use model::{SessionRecord, SessionStatus};
pub use token::TokenPair;
