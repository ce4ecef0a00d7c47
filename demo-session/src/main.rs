use axum::{Router, middleware::from_fn_with_state, routing::get};
use session_token_axum::{SessionState, require_session};

mod handlers;
mod server;

use crate::{
    handlers::{index, logout, read, whoami},
    server::{init_tracing, spawn_http_server},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("demo_session");

    // Serving without a signing key would disable authentication, so refuse to start
    let state = SessionState::from_env().map_err(|e| {
        tracing::error!("Failed to load session configuration: {e}");
        e
    })?;

    let private = Router::new()
        .route("/whoami", get(whoami))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let app = Router::new()
        .merge(private)
        .route("/", get(index))
        .route("/read", get(read))
        .route("/logout", get(logout))
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    spawn_http_server(port, app).await??;
    Ok(())
}
