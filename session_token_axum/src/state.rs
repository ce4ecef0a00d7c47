use std::sync::Arc;

use http::HeaderMap;
use session_token::{
    Claims, ConfigError, CookieOptions, TokenCodec, TokenError, get_claims_from_headers,
    prepare_logout_headers, prepare_session_headers,
};

/// Codec and cookie settings shared by every handler.
///
/// Build it once at startup and hand it to the router with `with_state`
/// (or expose it through `FromRef` from a larger application state).
#[derive(Clone, Debug)]
pub struct SessionState {
    codec: Arc<TokenCodec>,
    cookie: CookieOptions,
}

impl SessionState {
    pub fn new(codec: TokenCodec, cookie: CookieOptions) -> Self {
        Self {
            codec: Arc::new(codec),
            cookie,
        }
    }

    /// Load the signing secret, token policy and cookie defaults from the
    /// environment. Fails when the secret is missing or too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        let codec = TokenCodec::from_env()?;
        Ok(Self::new(codec, CookieOptions::from_env()))
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn cookie_options(&self) -> &CookieOptions {
        &self.cookie
    }

    /// `Set-Cookie` headers establishing a session for `claims`.
    pub fn login_headers(&self, claims: &Claims) -> Result<HeaderMap, TokenError> {
        prepare_session_headers(&self.codec, claims, &self.cookie)
    }

    /// `Set-Cookie` headers clearing the session cookie.
    pub fn logout_headers(&self) -> Result<HeaderMap, TokenError> {
        prepare_logout_headers(&self.cookie)
    }

    pub(crate) fn verify_headers(&self, headers: &HeaderMap) -> Result<Claims, TokenError> {
        get_claims_from_headers(&self.codec, headers, &self.cookie)
    }
}
