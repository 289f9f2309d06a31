//! HTTP API: Axum server for players and the admin panel.
//!
//! Thin pass-through over the sportsbook. CORS is configurable so the
//! front-end can be served from another origin during development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState, cors_allow_origin: &str) -> Router {
    Router::new()
        .route("/api/admin/login", post(routes::admin_login))
        .route("/api/games", get(routes::list_games).post(routes::create_game))
        .route("/api/games/:id", delete(routes::delete_game))
        .route("/api/bets", get(routes::list_bets).post(routes::create_bet))
        .route("/api/bets/summary", get(routes::bets_summary))
        .route("/api/bets/:id/status", patch(routes::update_bet_status))
        .route("/health", get(routes::health))
        .layer(cors_layer(cors_allow_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!(origin, "Unparseable CORS origin, allowing any");
                AllowOrigin::any()
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve(
    state: AppState,
    addr: SocketAddr,
    cors_allow_origin: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = build_router(state, cors_allow_origin);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("API server error")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
