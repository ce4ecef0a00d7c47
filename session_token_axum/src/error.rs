use http::StatusCode;
use session_token::TokenError;

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Authentication failures become 401 with a generic message so the client
/// cannot tell a forged token from an expired one.
impl<T> IntoResponseError<T> for Result<T, TokenError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            if e.is_authentication_failure() {
                tracing::debug!("Authentication failed: {e}");
                return (StatusCode::UNAUTHORIZED, "Unauthorized".to_string());
            }
            let status = match e {
                TokenError::InvalidClaims(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}
