use http::header::{COOKIE, HeaderMap};

use crate::token::{Token, TokenError};

/// Find the cookie `name` in a raw `Cookie` request header.
///
/// The value is returned as presented; validating it is the codec's job.
/// An empty value counts as absent.
pub fn from_request_cookies(raw_cookie_header: &str, name: &str) -> Option<Token> {
    raw_cookie_header
        .split(';')
        .map(|s| s.trim())
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            if key.trim() != name {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some(value)
        })
        .filter(|value| !value.is_empty())
        .map(Token::from)
}

/// Extract the session token from every `Cookie` header of a request.
pub fn token_from_headers(headers: &HeaderMap, name: &str) -> Result<Token, TokenError> {
    for cookie_header in headers.get_all(COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|e| {
            tracing::debug!("Invalid cookie header: {}", e);
            TokenError::Cookie("Invalid cookie header".to_string())
        })?;

        if let Some(token) = from_request_cookies(cookie_str, name) {
            return Ok(token);
        }
    }

    tracing::debug!("No session cookie '{}' found in cookies", name);
    Err(TokenError::MissingCookie)
}
