use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};
use session_token::{Claims, TokenError};

use super::state::SessionState;

/// Rejection for requests without a valid session token.
///
/// Always answers `401 Unauthorized`; the reason is logged, not returned.
#[derive(Debug)]
pub struct AuthRejection {
    reason: TokenError,
}

impl AuthRejection {
    pub fn reason(&self) -> &TokenError {
        &self.reason
    }
}

impl From<TokenError> for AuthRejection {
    fn from(reason: TokenError) -> Self {
        Self { reason }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        tracing::debug!("Unauthorized: {}", self.reason);
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

/// Verified session claims, available as an Axum extractor
///
/// Extraction reads the session cookie, verifies its token and yields the
/// claims. Any failure rejects the request with `401`. Use
/// `Option<AuthSession>` for pages that also serve anonymous visitors: it is
/// `None` only when no session cookie was sent at all, while a forged or
/// expired token is still rejected.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get};
/// use session_token_axum::{AuthSession, SessionState};
///
/// async fn protected(session: AuthSession) -> String {
///     format!("Hello, {}!", session.subject())
/// }
///
/// let state = SessionState::from_env().expect("SESSION_TOKEN_SECRET must be set");
/// let app: Router = Router::new()
///     .route("/protected", get(protected))
///     .with_state(state);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSession {
    claims: Claims,
}

impl AuthSession {
    pub fn subject(&self) -> &str {
        // Verification guarantees a string subject
        self.claims.subject().unwrap_or_default()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

pub(crate) fn authenticate(
    state: &SessionState,
    parts: &Parts,
) -> Result<AuthSession, AuthRejection> {
    let claims = state.verify_headers(&parts.headers)?;
    Ok(AuthSession { claims })
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already verified by the require_session middleware
        if let Some(session) = parts.extensions.get::<AuthSession>() {
            return Ok(session.clone());
        }

        let state = SessionState::from_ref(state);
        authenticate(&state, parts)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <AuthSession as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(session) => Ok(Some(session)),
            Err(rejection) if rejection.reason == TokenError::MissingCookie => Ok(None),
            Err(rejection) => Err(rejection),
        }
    }
}
