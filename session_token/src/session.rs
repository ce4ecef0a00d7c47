//! Header-level helpers for the HTTP layer
//!
//! Establishing a session is `issue` then `to_set_cookie`; authenticating a
//! request is `token_from_headers` then `verify`. These functions perform
//! both steps over `http::HeaderMap` so a web framework only has to copy
//! headers in and out.

use http::HeaderMap;
use http::header::SET_COOKIE;

use crate::cookie::{CookieOptions, clear_cookie, to_set_cookie, token_from_headers};
use crate::token::{Claims, TokenCodec, TokenError};

/// Sign `claims` and return the `Set-Cookie` header carrying the token.
pub fn prepare_session_headers(
    codec: &TokenCodec,
    claims: &Claims,
    options: &CookieOptions,
) -> Result<HeaderMap, TokenError> {
    let token = codec.issue(claims)?;
    let directive = to_set_cookie(&token, options);

    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, directive.to_header_value()?);

    tracing::debug!(
        "Created session cookie {} for subject {:?}",
        directive.name(),
        claims.subject()
    );
    Ok(headers)
}

/// Verify the session cookie of a request and return its claims.
pub fn get_claims_from_headers(
    codec: &TokenCodec,
    headers: &HeaderMap,
    options: &CookieOptions,
) -> Result<Claims, TokenError> {
    let token = token_from_headers(headers, options.cookie_name())?;
    codec.verify(token.as_str())
}

/// Headers that remove the session cookie from the browser.
///
/// Tokens are stateless, so a copy captured before logout stays valid until
/// its `exp`.
pub fn prepare_logout_headers(options: &CookieOptions) -> Result<HeaderMap, TokenError> {
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, clear_cookie(options).to_header_value()?);
    Ok(headers)
}
