//! Signing and verification of session tokens
//!
//! Tokens are compact HS256 JWTs: `base64url(header).base64url(payload).base64url(mac)`.
//! The expected algorithm is fixed; a token that declares any other algorithm is
//! refused before its signature is looked at.

use chrono::{DateTime, Duration, Utc};
use hmac::Mac;
use subtle::ConstantTimeEq;

use crate::config::{ConfigError, DEFAULT_TOKEN_TTL, SESSION_TOKEN_LEEWAY, SESSION_TOKEN_TTL};
use crate::utils::{base64url_decode, base64url_encode};

use super::errors::TokenError;
use super::key::SigningKey;
use super::types::{ClaimValue, Claims, EXPIRES_AT, Header, ISSUED_AT, NOT_BEFORE, Token};

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Browsers cap a cookie at roughly 4KB; anything longer was not issued here.
const MAX_TOKEN_LEN: usize = 4096;

/// Issues and verifies signed session tokens.
///
/// The codec owns the [`SigningKey`]; build it once at startup and share it
/// (e.g. behind an `Arc`). Both operations take `&self` and do no I/O.
///
/// # Example
///
/// ```
/// use session_token::{Claims, SigningKey, TokenCodec};
///
/// let codec = TokenCodec::new(SigningKey::generate().unwrap());
/// let token = codec.issue(&Claims::new("u1")).unwrap();
/// let claims = codec.verify(token.as_str()).unwrap();
/// assert_eq!(claims.subject(), Some("u1"));
/// ```
#[derive(Debug)]
pub struct TokenCodec {
    key: SigningKey,
    ttl: Option<Duration>,
    leeway: Duration,
}

impl TokenCodec {
    /// Codec with the default one hour token lifetime and no clock leeway.
    pub fn new(key: SigningKey) -> Self {
        Self {
            key,
            ttl: Some(Duration::seconds(DEFAULT_TOKEN_TTL as i64)),
            leeway: Duration::zero(),
        }
    }

    /// Codec configured from the environment: `SESSION_TOKEN_SECRET`,
    /// `SESSION_TOKEN_TTL` and `SESSION_TOKEN_LEEWAY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = SigningKey::from_env()?;
        let leeway = duration_setting("SESSION_TOKEN_LEEWAY", *SESSION_TOKEN_LEEWAY)?;
        let codec = Self::new(key).with_leeway(leeway);
        let codec = match *SESSION_TOKEN_TTL {
            0 => codec.without_expiry(),
            ttl => codec.with_ttl(duration_setting("SESSION_TOKEN_TTL", ttl)?),
        };
        tracing::info!(
            "Token codec ready: ttl={:?}, leeway={}s",
            codec.ttl.map(|ttl| ttl.num_seconds()),
            codec.leeway.num_seconds()
        );
        Ok(codec)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Issue tokens without `iat`/`exp`. Such tokens stay valid for as long
    /// as the key does.
    pub fn without_expiry(mut self) -> Self {
        self.ttl = None;
        self
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn leeway(&self) -> Duration {
        self.leeway
    }

    /// Sign `claims` into a token, stamping `iat`/`exp` when the codec has a
    /// lifetime policy.
    pub fn issue(&self, claims: &Claims) -> Result<Token, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// Same as [`TokenCodec::issue`] with an explicit clock.
    ///
    /// Caller-supplied `iat`/`exp` are kept as given.
    pub fn issue_at(&self, claims: &Claims, now: DateTime<Utc>) -> Result<Token, TokenError> {
        let mut claims = claims.clone();

        if claims.subject().is_none() {
            return Err(TokenError::InvalidClaims(
                "a string subject (sub) is required".to_string(),
            ));
        }
        if let Some((key, _)) = claims
            .iter()
            .find(|(_, v)| matches!(v, ClaimValue::Float(f) if !f.is_finite()))
        {
            return Err(TokenError::InvalidClaims(format!(
                "claim {key} is not a finite number"
            )));
        }
        // Registered timestamps must be integers to verify later
        for name in [ISSUED_AT, EXPIRES_AT, NOT_BEFORE] {
            if claims.get(name).is_some_and(|v| v.as_i64().is_none()) {
                return Err(TokenError::InvalidClaims(format!(
                    "{name} must be an integer timestamp"
                )));
            }
        }

        if let Some(ttl) = self.ttl {
            if !claims.contains_key(ISSUED_AT) {
                claims.insert(ISSUED_AT, now.timestamp());
            }
            if !claims.contains_key(EXPIRES_AT) {
                let exp = now.checked_add_signed(ttl).ok_or_else(|| {
                    TokenError::InvalidClaims("token lifetime is out of range".to_string())
                })?;
                claims.insert(EXPIRES_AT, exp.timestamp());
            }
        }

        let header = encoded_header()?;
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| TokenError::InvalidClaims(e.to_string()))?;
        let signing_input = format!("{header}.{}", base64url_encode(&payload));
        let signature = self.sign(signing_input.as_bytes());

        tracing::debug!("Issued session token for subject {:?}", claims.subject());
        Ok(Token::from(format!("{signing_input}.{signature}")))
    }

    /// Verify an untrusted token string and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Same as [`TokenCodec::verify`] with an explicit clock.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::MalformedToken("token too long".to_string()));
        }

        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::MalformedToken(
                "expected three dot-separated segments".to_string(),
            ));
        };
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TokenError::MalformedToken("empty segment".to_string()));
        }

        check_header(header)?;

        let signing_input = &token[..header.len() + 1 + payload.len()];
        let expected = self.sign(signing_input.as_bytes());
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            tracing::warn!("Rejected session token: signature mismatch");
            return Err(TokenError::InvalidSignature);
        }

        let payload = base64url_decode(payload)
            .map_err(|_| TokenError::MalformedToken("payload is not base64url".to_string()))?;
        let claims: Claims = serde_json::from_slice(&payload)
            .map_err(|_| TokenError::MalformedToken("payload is not a claims object".to_string()))?;
        if claims.subject().is_none() {
            return Err(TokenError::MalformedToken("missing subject".to_string()));
        }

        self.check_validity_window(&claims, now)?;

        tracing::debug!("Verified session token for subject {:?}", claims.subject());
        Ok(claims)
    }

    fn check_validity_window(&self, claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
        let now = now.timestamp();
        let leeway = self.leeway.num_seconds();

        if let Some(exp) = timestamp_claim(claims, EXPIRES_AT)? {
            if now >= exp.saturating_add(leeway) {
                tracing::debug!("Rejected session token: expired at {exp}");
                return Err(TokenError::Expired);
            }
        }
        for name in [NOT_BEFORE, ISSUED_AT] {
            if let Some(ts) = timestamp_claim(claims, name)? {
                if ts > now.saturating_add(leeway) {
                    tracing::debug!("Rejected session token: {name} {ts} is in the future");
                    return Err(TokenError::NotYetValid);
                }
            }
        }
        Ok(())
    }

    fn sign(&self, signing_input: &[u8]) -> String {
        let mut mac = self.key.mac();
        mac.update(signing_input);
        base64url_encode(&mac.finalize().into_bytes())
    }
}

/// A lifetime setting in seconds, accepted only if the current time can be
/// moved forward by it.
fn duration_setting(name: &str, seconds: u64) -> Result<Duration, ConfigError> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .filter(|duration| Utc::now().checked_add_signed(*duration).is_some())
        .ok_or_else(|| ConfigError::InvalidDuration {
            name: name.to_string(),
            seconds,
        })
}

fn encoded_header() -> Result<String, TokenError> {
    let header = Header {
        alg: ALGORITHM.to_string(),
        typ: Some(TOKEN_TYPE.to_string()),
    };
    let json = serde_json::to_vec(&header).map_err(|e| TokenError::InvalidClaims(e.to_string()))?;
    Ok(base64url_encode(&json))
}

fn check_header(encoded: &str) -> Result<(), TokenError> {
    let raw = base64url_decode(encoded)
        .map_err(|_| TokenError::MalformedToken("header is not base64url".to_string()))?;
    let header: Header = serde_json::from_slice(&raw)
        .map_err(|_| TokenError::MalformedToken("header is not valid JSON".to_string()))?;

    if header.alg != ALGORITHM {
        tracing::warn!("Rejected session token: algorithm {:?}", header.alg);
        return Err(TokenError::UnsupportedAlgorithm(header.alg));
    }
    if let Some(typ) = header.typ {
        if !typ.eq_ignore_ascii_case(TOKEN_TYPE) {
            return Err(TokenError::MalformedToken(format!("unexpected type {typ}")));
        }
    }
    Ok(())
}

fn timestamp_claim(claims: &Claims, name: &str) -> Result<Option<i64>, TokenError> {
    match claims.get(name) {
        None => Ok(None),
        Some(ClaimValue::Integer(ts)) => Ok(Some(*ts)),
        Some(_) => Err(TokenError::MalformedToken(format!(
            "{name} must be an integer timestamp"
        ))),
    }
}
