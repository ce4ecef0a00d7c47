use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::session::authenticate;
use super::state::SessionState;

/// Route layer that rejects requests without a valid session with `401`.
///
/// The verified [`AuthSession`](crate::AuthSession) is stored in the request
/// extensions, so handlers behind it can extract it without verifying again.
///
/// ```no_run
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use session_token_axum::{SessionState, require_session};
///
/// let state = SessionState::from_env().expect("SESSION_TOKEN_SECRET must be set");
/// let app: Router = Router::new()
///     .route("/private", get(|| async { "ok" }))
///     .route_layer(from_fn_with_state(state.clone(), require_session))
///     .with_state(state);
/// ```
pub async fn require_session(
    State(state): State<SessionState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    match authenticate(&state, &parts) {
        Ok(session) => {
            tracing::trace!("Session verified for subject {}", session.subject());
            parts.extensions.insert(session);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
