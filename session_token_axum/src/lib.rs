//! session_token_axum - Axum integration for signed cookie sessions
//!
//! Provides the shared [`SessionState`], the [`AuthSession`] extractor and the
//! [`require_session`] route layer on top of the `session_token` crate.

mod error;
mod middleware;
mod session;
mod state;

#[cfg(test)]
mod test_utils;

pub use error::IntoResponseError;
pub use middleware::require_session;
pub use session::{AuthRejection, AuthSession};
pub use state::SessionState;

// Re-export the core types handlers need
pub use session_token::{ClaimValue, Claims, CookieOptions, SameSite, TokenError};
