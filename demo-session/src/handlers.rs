use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use session_token_axum::{AuthSession, Claims, IntoResponseError, SessionState};

const DEMO_EMAIL: &str = "demo@example.com";

#[derive(Debug, Deserialize)]
pub(crate) struct LoginParams {
    email: Option<String>,
}

/// Issue a session token for the given (or demo) email and set it as a cookie.
pub(crate) async fn index(
    State(state): State<SessionState>,
    Query(params): Query<LoginParams>,
) -> Result<(HeaderMap, &'static str), (StatusCode, String)> {
    let email = params.email.unwrap_or_else(|| DEMO_EMAIL.to_string());
    let claims = Claims::new(email.clone()).with("email", email);

    let headers = state.login_headers(&claims).into_response_error()?;
    Ok((headers, "Token has been set as a cookie!"))
}

/// Verify the session cookie and return its claims.
pub(crate) async fn read(session: AuthSession) -> impl IntoResponse {
    tracing::info!("Decoded session claims: {:?}", session.claims());
    Json(session.into_claims())
}

/// Behind `require_session`; the extractor reuses the session the layer verified.
pub(crate) async fn whoami(session: AuthSession) -> String {
    format!("Signed in as {}", session.subject())
}

pub(crate) async fn logout(
    State(state): State<SessionState>,
) -> Result<(HeaderMap, &'static str), (StatusCode, String)> {
    let headers = state.logout_headers().into_response_error()?;
    Ok((headers, "Session cookie cleared"))
}
