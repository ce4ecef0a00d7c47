use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::config::{ConfigError, SESSION_TOKEN_SECRET_ENV};
use crate::utils::gen_random_bytes;

pub(super) type HmacSha256 = Hmac<Sha256>;

/// Shortest secret accepted for HS256, matching the hash output size.
pub const MIN_KEY_LEN: usize = 32;

/// The process-wide HMAC secret.
///
/// Only the owning [`TokenCodec`](crate::TokenCodec) can use the bytes; they are
/// never exposed, printed or cloned, and are overwritten on drop.
pub struct SigningKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        // Wrapped first so a rejected secret is wiped too
        let bytes = Zeroizing::new(bytes.into());
        if bytes.len() < MIN_KEY_LEN {
            return Err(ConfigError::SecretTooShort {
                len: bytes.len(),
                min: MIN_KEY_LEN,
            });
        }
        Ok(Self { bytes })
    }

    /// Load the secret from `SESSION_TOKEN_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_var(SESSION_TOKEN_SECRET_ENV)
    }

    pub fn from_env_var(name: &str) -> Result<Self, ConfigError> {
        let secret = std::env::var(name)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingSecret(name.to_string()))?;
        tracing::debug!("Loaded signing secret from {name}");
        Self::from_bytes(secret.into_bytes())
    }

    /// Random secret for a single process lifetime. Tokens signed with it
    /// stop verifying after a restart.
    pub fn generate() -> Result<Self, ConfigError> {
        let bytes =
            gen_random_bytes(MIN_KEY_LEN).map_err(|e| ConfigError::Crypto(e.to_string()))?;
        tracing::debug!("Generated ephemeral signing secret");
        Self::from_bytes(bytes)
    }

    pub(super) fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.bytes).expect("HMAC can take key of any size")
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(**redacted**)")
    }
}
