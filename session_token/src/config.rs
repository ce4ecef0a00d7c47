//! Central configuration for the session_token crate
//!
//! Every value is read from the environment once, on first use. Invalid values
//! fall back to their defaults with a warning, except the signing secret, which
//! has no default at all.

use std::str::FromStr;
use std::sync::LazyLock;

use thiserror::Error;

use crate::cookie::SameSite;

/// Environment variable holding the HMAC signing secret.
pub const SESSION_TOKEN_SECRET_ENV: &str = "SESSION_TOKEN_SECRET";

pub(crate) const DEFAULT_COOKIE_NAME: &str = "__Host-SessionToken";
pub(crate) const DEFAULT_COOKIE_MAX_AGE: i64 = 3600;
pub(crate) const DEFAULT_TOKEN_TTL: u64 = 3600;
pub(crate) const DEFAULT_TOKEN_LEEWAY: u64 = 2;

/// Name of the cookie carrying the session token.
///
/// Default: "__Host-SessionToken"
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string())
});

/// Max-Age of the session cookie in seconds. Default: 3600
pub static SESSION_COOKIE_MAX_AGE: LazyLock<i64> = LazyLock::new(|| {
    parse_or_default(
        "SESSION_COOKIE_MAX_AGE",
        std::env::var("SESSION_COOKIE_MAX_AGE").ok(),
        DEFAULT_COOKIE_MAX_AGE,
    )
});

/// Whether the session cookie carries the `Secure` attribute. Default: true
pub static SESSION_COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    parse_or_default(
        "SESSION_COOKIE_SECURE",
        std::env::var("SESSION_COOKIE_SECURE").ok(),
        true,
    )
});

/// SameSite policy of the session cookie. Default: Lax
pub static SESSION_COOKIE_SAMESITE: LazyLock<SameSite> = LazyLock::new(|| {
    parse_or_default(
        "SESSION_COOKIE_SAMESITE",
        std::env::var("SESSION_COOKIE_SAMESITE").ok(),
        SameSite::Lax,
    )
});

/// Token lifetime in seconds. `0` issues tokens without an `exp` claim.
pub static SESSION_TOKEN_TTL: LazyLock<u64> = LazyLock::new(|| {
    parse_or_default(
        "SESSION_TOKEN_TTL",
        std::env::var("SESSION_TOKEN_TTL").ok(),
        DEFAULT_TOKEN_TTL,
    )
});

/// Clock skew tolerated when checking `exp`, `nbf` and `iat`. Default: 2
pub static SESSION_TOKEN_LEEWAY: LazyLock<u64> = LazyLock::new(|| {
    parse_or_default(
        "SESSION_TOKEN_LEEWAY",
        std::env::var("SESSION_TOKEN_LEEWAY").ok(),
        DEFAULT_TOKEN_LEEWAY,
    )
});

fn parse_or_default<T: FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid value for {name}, using default");
                default
            }
        },
    }
}

/// Errors raised while loading configuration at startup.
///
/// These are fatal: a server that cannot load its signing key must not start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Signing secret missing: set {0}")]
    MissingSecret(String),

    #[error("Signing secret too short: {len} bytes, need at least {min}")]
    SecretTooShort { len: usize, min: usize },

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("{name}={seconds} is out of range for a token lifetime")]
    InvalidDuration { name: String, seconds: u64 },
}
