//! session_token - Signed, stateless session tokens carried in cookies
//!
//! The crate has two layers:
//! - [`TokenCodec`] signs [`Claims`] into an HS256 token and verifies untrusted
//!   token strings back into claims or a typed [`TokenError`].
//! - The cookie adapter ([`to_set_cookie`], [`from_request_cookies`]) moves
//!   tokens in and out of `Set-Cookie` / `Cookie` headers.
//!
//! No session state is kept on the server; the signing key is the only secret.
//!
//! ```
//! use session_token::{Claims, CookieOptions, SigningKey, TokenCodec};
//! use session_token::{from_request_cookies, to_set_cookie};
//!
//! let codec = TokenCodec::new(SigningKey::generate().unwrap());
//! let options = CookieOptions::default().name("session");
//!
//! let token = codec.issue(&Claims::new("u1")).unwrap();
//! let set_cookie = to_set_cookie(&token, &options).to_string();
//! assert!(set_cookie.contains("HttpOnly"));
//!
//! let presented = from_request_cookies(&format!("session={}", token.as_str()), "session");
//! let claims = codec.verify(presented.unwrap().as_str()).unwrap();
//! assert_eq!(claims.subject(), Some("u1"));
//! ```

mod config;
mod cookie;
mod session;
mod token;
mod utils;

#[cfg(test)]
mod test_utils;

pub use config::{
    ConfigError, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SESSION_COOKIE_SAMESITE,
    SESSION_COOKIE_SECURE, SESSION_TOKEN_LEEWAY, SESSION_TOKEN_SECRET_ENV, SESSION_TOKEN_TTL,
};

pub use cookie::{
    CookieDirective, CookieOptions, SameSite, clear_cookie, from_request_cookies, to_set_cookie,
    token_from_headers,
};

pub use session::{get_claims_from_headers, prepare_logout_headers, prepare_session_headers};

pub use token::{ClaimValue, Claims, MIN_KEY_LEN, SigningKey, Token, TokenCodec, TokenError};

pub use utils::UtilError;
