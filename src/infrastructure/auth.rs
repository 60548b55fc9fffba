use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Random bytes in a freshly issued bearer token.
const TOKEN_BYTES: usize = 32;

/// Generate a new bearer token value. Shown to the caller once; only the
/// hash is persisted.
pub fn generate_token() -> String {
    let bytes = rand::random::<[u8; TOKEN_BYTES]>();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a token value for storage and lookup.
pub fn hash_token(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}
