mod directive;
mod parse;

pub use directive::{CookieDirective, CookieOptions, SameSite, clear_cookie, to_set_cookie};
pub use parse::{from_request_cookies, token_from_headers};
