//! Test utilities shared by the unit tests of this crate

use std::sync::Once;

use crate::token::{MIN_KEY_LEN, SigningKey, TokenCodec};

/// Load `.env_test` (falling back to `.env`) once per test binary.
pub(crate) fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

/// Deterministic key; distinct seeds give distinct keys.
pub(crate) fn test_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(vec![seed; MIN_KEY_LEN]).expect("test key has the minimum length")
}

/// Codec with the library defaults: one hour TTL, no leeway.
pub(crate) fn test_codec() -> TokenCodec {
    init_test_environment();
    TokenCodec::new(test_key(0))
}
