use http::header::{COOKIE, SET_COOKIE};
use http::{Request, request::Parts};
use session_token::{Claims, CookieOptions, SigningKey, TokenCodec};

use crate::SessionState;

pub(crate) fn test_state() -> SessionState {
    let key = SigningKey::from_bytes(vec![0u8; 32]).expect("test key has the minimum length");
    SessionState::new(TokenCodec::new(key), CookieOptions::default().name("sid"))
}

/// `name=token` pair a browser would send after logging in with `claims`.
pub(crate) fn session_cookie(state: &SessionState, claims: &Claims) -> String {
    let headers = state.login_headers(claims).unwrap();
    let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

pub(crate) fn request_parts(cookie: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/read");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(()).unwrap().into_parts().0
}
