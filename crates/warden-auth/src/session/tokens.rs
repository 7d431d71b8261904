//! Opaque session and refresh token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use warden_entity::session::TokenPair;

/// Random bytes per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Generate one URL-safe random token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a fresh, unrelated session/refresh token pair.
pub fn generate_pair() -> TokenPair {
    TokenPair {
        session_token: generate_token(),
        refresh_token: generate_token(),
    }
}
