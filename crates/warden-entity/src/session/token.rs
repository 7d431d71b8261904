//! Opaque session token pair.

use serde::{Deserialize, Serialize};

/// Access and refresh tokens issued together on login or refresh.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Bearer token presented on every request.
    pub session_token: String,
    /// Single-use token exchanged for a new pair.
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("session_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
