use thiserror::Error;

use crate::utils::UtilError;

/// Errors returned while issuing, transporting or verifying a session token.
///
/// Messages never contain key material or the raw token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token does not have the `header.payload.signature` structure,
    /// or one of its segments cannot be decoded
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// The signature does not match: the token was tampered with or signed
    /// with another key
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The header declares an algorithm other than the configured one
    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token expired")]
    Expired,

    /// `nbf` or `iat` lies in the future
    #[error("Token not yet valid")]
    NotYetValid,

    /// No session cookie was presented with the request
    #[error("Session cookie missing")]
    MissingCookie,

    /// The claims handed to `issue` cannot be signed
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl TokenError {
    /// True for failures caused by what the client presented, as opposed to
    /// server-side misuse.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            TokenError::MalformedToken(_)
                | TokenError::InvalidSignature
                | TokenError::UnsupportedAlgorithm(_)
                | TokenError::Expired
                | TokenError::NotYetValid
                | TokenError::MissingCookie
                | TokenError::Cookie(_)
        )
    }
}
