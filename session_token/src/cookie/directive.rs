use std::fmt;
use std::str::FromStr;

use http::HeaderValue;

use crate::config::{
    DEFAULT_COOKIE_NAME, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SESSION_COOKIE_SAMESITE,
    SESSION_COOKIE_SECURE,
};
use crate::token::Token;
use crate::utils::UtilError;

/// Cross-site inclusion policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        f.write_str(value)
    }
}

impl FromStr for SameSite {
    type Err = UtilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            _ => Err(UtilError::Format(format!("Unknown SameSite policy: {s}"))),
        }
    }
}

/// Transport attributes applied to the session cookie.
///
/// `HttpOnly` is on by default and stays on unless
/// [`CookieOptions::allow_script_access`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    name: String,
    http_only: bool,
    secure: bool,
    same_site: SameSite,
    max_age: Option<i64>,
    path: String,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
            max_age: None,
            path: "/".to_string(),
        }
    }
}

impl CookieOptions {
    /// Options from `SESSION_COOKIE_NAME`, `SESSION_COOKIE_SECURE`,
    /// `SESSION_COOKIE_SAMESITE` and `SESSION_COOKIE_MAX_AGE`.
    pub fn from_env() -> Self {
        Self::default()
            .name(SESSION_COOKIE_NAME.as_str())
            .secure(*SESSION_COOKIE_SECURE)
            .same_site(*SESSION_COOKIE_SAMESITE)
            .max_age(*SESSION_COOKIE_MAX_AGE)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Drop the `HttpOnly` attribute, exposing the token to page scripts.
    pub fn allow_script_access(mut self) -> Self {
        tracing::warn!("HttpOnly disabled for cookie {}", self.name);
        self.http_only = false;
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.name
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }
}

/// A rendered-on-demand `Set-Cookie` directive.
#[derive(Clone, PartialEq, Eq)]
pub struct CookieDirective {
    name: String,
    value: String,
    http_only: bool,
    secure: bool,
    same_site: SameSite,
    max_age: Option<i64>,
    path: String,
}

impl CookieDirective {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn http_only(&self) -> bool {
        self.http_only
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn same_site(&self) -> SameSite {
        self.same_site
    }

    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Render as a header value, refusing a name or path that would smuggle
    /// extra attributes into the directive.
    pub fn to_header_value(&self) -> Result<HeaderValue, UtilError> {
        if !is_cookie_name(&self.name) {
            return Err(UtilError::Cookie(format!(
                "Invalid cookie name {:?}",
                self.name
            )));
        }
        if !is_attribute_value(&self.path) {
            return Err(UtilError::Cookie(format!(
                "Invalid cookie path {:?}",
                self.path
            )));
        }
        HeaderValue::from_str(&self.to_string())
            .map_err(|_| UtilError::Cookie("Invalid Set-Cookie value".to_string()))
    }
}

impl fmt::Display for CookieDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        write!(f, "; SameSite={}; Path={}", self.same_site, self.path)?;
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CookieDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieDirective")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("http_only", &self.http_only)
            .field("secure", &self.secure)
            .field("same_site", &self.same_site)
            .field("max_age", &self.max_age)
            .field("path", &self.path)
            .finish()
    }
}

/// RFC 6265 cookie-name: visible ASCII without separators.
fn is_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}

/// RFC 6265 attribute value: no control characters and no `;`.
fn is_attribute_value(value: &str) -> bool {
    value.bytes().all(|b| (b.is_ascii_graphic() || b == b' ') && b != b';')
}

/// Wrap a token into the session `Set-Cookie` directive.
pub fn to_set_cookie(token: &Token, options: &CookieOptions) -> CookieDirective {
    build_directive(token.as_str().to_string(), options, options.max_age)
}

/// Directive that makes the browser drop the session cookie.
pub fn clear_cookie(options: &CookieOptions) -> CookieDirective {
    build_directive(String::new(), options, Some(0))
}

fn build_directive(value: String, options: &CookieOptions, max_age: Option<i64>) -> CookieDirective {
    let mut secure = options.secure;

    // Browsers drop SameSite=None and prefixed cookies that lack Secure
    if !secure && options.same_site == SameSite::None {
        tracing::warn!("SameSite=None requires Secure; enabling it");
        secure = true;
    }
    if !secure && (options.name.starts_with("__Host-") || options.name.starts_with("__Secure-")) {
        tracing::warn!("Cookie {} requires Secure; enabling it", options.name);
        secure = true;
    }

    CookieDirective {
        name: options.name.clone(),
        value,
        http_only: options.http_only,
        secure,
        same_site: options.same_site,
        max_age,
        path: options.path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Token {
        Token::from("aGVhZGVy.cGF5bG9hZA.c2ln")
    }

    #[test]
    fn test_default_options_render() {
        let directive = to_set_cookie(&token(), &CookieOptions::default());
        assert_eq!(
            directive.to_string(),
            "__Host-SessionToken=aGVhZGVy.cGF5bG9hZA.c2ln; HttpOnly; Secure; SameSite=Lax; Path=/"
        );
    }

    #[test]
    fn test_http_only_survives_other_overrides() {
        let options = CookieOptions::default()
            .name("sid")
            .secure(false)
            .same_site(SameSite::Strict)
            .max_age(60)
            .path("/app");
        let directive = to_set_cookie(&token(), &options);

        assert!(directive.http_only());
        assert_eq!(
            directive.to_string(),
            "sid=aGVhZGVy.cGF5bG9hZA.c2ln; HttpOnly; SameSite=Strict; Path=/app; Max-Age=60"
        );
    }

    #[test]
    fn test_http_only_disabled_explicitly() {
        let options = CookieOptions::default().allow_script_access();
        let directive = to_set_cookie(&token(), &options);
        assert!(!directive.http_only());
        assert!(!directive.to_string().contains("HttpOnly"));
    }

    #[test]
    fn test_same_site_none_forces_secure() {
        let options = CookieOptions::default()
            .name("sid")
            .secure(false)
            .same_site(SameSite::None);
        let directive = to_set_cookie(&token(), &options);
        assert!(directive.secure());
        assert!(directive.to_string().contains("; Secure; SameSite=None"));
    }

    #[test]
    fn test_host_prefix_forces_secure() {
        let options = CookieOptions::default().secure(false);
        assert!(to_set_cookie(&token(), &options).secure());

        let options = CookieOptions::default().name("__Secure-sid").secure(false);
        assert!(to_set_cookie(&token(), &options).secure());

        let options = CookieOptions::default().name("sid").secure(false);
        assert!(!to_set_cookie(&token(), &options).secure());
    }

    #[test]
    fn test_clear_cookie() {
        let options = CookieOptions::default().max_age(3600);
        let directive = clear_cookie(&options);
        assert_eq!(directive.value(), "");
        assert_eq!(directive.max_age(), Some(0));
        assert_eq!(
            directive.to_string(),
            "__Host-SessionToken=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0"
        );
    }

    #[test]
    fn test_to_header_value() {
        let directive = to_set_cookie(&token(), &CookieOptions::default());
        let value = directive.to_header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), directive.to_string());

        let bad = to_set_cookie(&token(), &CookieOptions::default().name("bad\nname"));
        assert!(matches!(bad.to_header_value(), Err(UtilError::Cookie(_))));
    }

    #[test]
    fn test_to_header_value_refuses_attribute_injection() {
        let injected_path = CookieOptions::default().path("/; Domain=evil.example");
        let injected_name = CookieOptions::default().name("sid; Domain=evil.example");
        for options in [
            injected_path,
            injected_name,
            CookieOptions::default().name("a=b"),
            CookieOptions::default().name("my sid"),
            CookieOptions::default().name(""),
        ] {
            let directive = to_set_cookie(&token(), &options);
            assert!(
                matches!(directive.to_header_value(), Err(UtilError::Cookie(_))),
                "{options:?} should be refused"
            );
            assert!(matches!(
                clear_cookie(&options).to_header_value(),
                Err(UtilError::Cookie(_))
            ));
        }

        // Ordinary paths and prefixed names still render
        let options = CookieOptions::default().path("/app/v1");
        assert!(to_set_cookie(&token(), &options).to_header_value().is_ok());
    }

    #[test]
    fn test_debug_redacts_value() {
        let directive = to_set_cookie(&token(), &CookieOptions::default());
        let debug = format!("{directive:?}");
        assert!(!debug.contains("cGF5bG9hZA"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_same_site_parse_and_display() {
        assert_eq!("Strict".parse::<SameSite>().unwrap(), SameSite::Strict);
        assert_eq!("LAX".parse::<SameSite>().unwrap(), SameSite::Lax);
        assert_eq!("none".parse::<SameSite>().unwrap(), SameSite::None);
        assert!("sometimes".parse::<SameSite>().is_err());

        assert_eq!(SameSite::Strict.to_string(), "Strict");
        assert_eq!(SameSite::default(), SameSite::Lax);
    }
}
